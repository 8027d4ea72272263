// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! FBGL is a small graphics library for the Linux framebuffer.
//!
//! A [`Surface`](render::Surface) is a grid of 32-bit pixels backed by one
//! of three things: a real fbdev device (`/dev/fb0`, queried with ioctl and
//! mapped with mmap), a System V shared memory segment that a separate
//! viewer process can display (handy without hardware, see `fbgl-snap`),
//! or a plain heap buffer.
//!
//! On top of the surface there are lines, rectangles and circles, PSF1/PSF2
//! text, TGA textures, and a non-blocking keyboard for simple control loops.
//!
//! ```ignore
//! use fbgl::{context::Context, render::*, util::Point};
//!
//! let mut ctx = Context::open(SurfaceSource::from_path(None), 60)?;
//! ctx.run(|ctx, _key| {
//!     ctx.surface.fill(BLACK);
//!     draw_circle_filled(&mut ctx.surface, Point::new(100, 100), 40, RED);
//!     true
//! })?;
//! ```
//!
//! Modules config, context, error, event, log, render and util are offered.
//! Without the `crossterm` feature only the scripted keyboard is available.

/// library name
pub const NAME: &str = "FBGL";

/// library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// framebuffer opened when no path is given
pub const DEFAULT_FB: &str = "/dev/fb0";

/// path that selects the shared memory surface
pub const EMULATED_DEVICE: &str = "/dev/fbgl-emu";

/// SysV key of the emulation segment
pub const DEFAULT_SHM_KEY: i32 = 0x1234FBCD;

pub fn name_info() -> &'static str {
    NAME
}

pub fn version_info() -> &'static str {
    VERSION
}

/// TOML file and environment overrides
pub mod config;

/// per session state and the run loop
pub mod context;

/// FbglError and the Result alias
pub mod error;

/// keyboard polling, raw terminal mode
pub mod event;

/// log4rs file logger
pub mod log;

/// surface, backends and drawing
pub mod render;

/// Point, frame clock, path helpers
pub mod util;

pub use error::{FbglError, Result};
