// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! # Render module
//!
//! Everything ends up as 32-bit pixels in one linear surface.
//!
//! ## Submodules
//! - `backend`: where the pixels live (fbdev, shared memory, heap)
//! - `surface`: bounds-checked pixel access over a backend
//! - `color`: packed pixel helpers
//! - `draw`: lines, rectangles, circles
//! - `font`: PSF1/PSF2 fonts and text
//! - `texture`: TGA textures

pub mod backend;
pub mod color;
pub mod draw;
pub mod font;
pub mod surface;
pub mod texture;

pub use backend::{Backend, BackendKind, ScreenInfo};
pub use color::*;
pub use draw::{
    draw_circle_filled, draw_circle_outline, draw_hline, draw_line, draw_rectangle_filled,
    draw_rectangle_outline,
};
pub use font::{render_text, Font};
pub use surface::{FrameStats, Surface, SurfaceSource};
pub use texture::{draw_texture, Texture};
