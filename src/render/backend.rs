// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! # Surface Backends
//!
//! A backend owns the memory behind a [`Surface`](super::surface::Surface)
//! and reports its geometry. Which one is used is decided once, at open
//! time; afterwards every backend looks the same to the drawing code: a
//! linear `&mut [u32]` of `pitch * height` pixels.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │             Surface (bounds, fill, set_pixel, ...)          │
//! └─────────────────────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Backend Interface                        │
//! │  ┌─────────────────┬─────────────────┬─────────────────┐    │
//! │  │     Device      │    Emulated     │     Memory      │    │
//! │  │ ioctl + mmap of │ SysV shm, fixed │  heap Vec<u32>  │    │
//! │  │    /dev/fbN     │  800x600x32     │ (headless/test) │    │
//! │  └─────────────────┴─────────────────┴─────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼  (emulated only)
//!              ┌───────────────────────────┐
//!              │  viewer process attaches  │
//!              │  the same key read-only   │
//!              └───────────────────────────┘
//! ```
//!
//! The emulated segment has no writer/reader synchronization. A viewer may
//! see a frame that is only partly drawn; that is accepted.

use crate::error::{FbglError, Result};
use std::any::Any;
use std::fmt;

/// Device backend - /dev/fbN through FBIOGET_*SCREENINFO and mmap
#[cfg(linux_fb)]
pub mod device;

/// Emulated backend - SysV shared memory segment plus the viewer side
#[cfg(linux_fb)]
pub mod shm;

/// Memory backend - plain heap buffer
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Device,
    Emulated,
    Memory,
}

/// Position of one color channel inside a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bitfield {
    pub offset: u32,
    pub length: u32,
}

/// Geometry reported by a backend, the union of what the fixed and variable
/// screen info ioctls return.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenInfo {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    /// bytes per row
    pub line_length: u32,
    /// size of the whole pixel memory, may exceed line_length * height
    pub smem_len: u32,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub transp: Bitfield,
}

impl ScreenInfo {
    /// Packed 32-bit truecolor geometry with no row padding, as the emulated
    /// and memory backends report it. Sizes whose byte counts do not fit
    /// the u32 fields of the screen info are a `GeometryQuery` error.
    pub fn packed32(id: &str, width: u32, height: u32) -> Result<Self> {
        let line_length = width.checked_mul(4);
        let smem_len = line_length.and_then(|l| l.checked_mul(height));
        let (Some(line_length), Some(smem_len)) = (line_length, smem_len) else {
            return Err(FbglError::GeometryQuery(format!(
                "{}x{} at 32 bpp exceeds the addressable size",
                width, height
            )));
        };
        Ok(Self {
            id: id.to_string(),
            width,
            height,
            bits_per_pixel: 32,
            line_length,
            smem_len,
            red: Bitfield { offset: 16, length: 8 },
            green: Bitfield { offset: 8, length: 8 },
            blue: Bitfield { offset: 0, length: 8 },
            transp: Bitfield { offset: 24, length: 8 },
        })
    }

    /// Bytes the surface addresses: line_length * height.
    pub fn frame_len(&self) -> usize {
        self.line_length as usize * self.height as usize
    }

    /// Row pitch in pixels.
    pub fn pitch(&self) -> usize {
        self.line_length as usize / 4
    }

    /// Checks the geometry is something a Surface can address safely.
    pub fn validate(&self) -> Result<()> {
        if self.bits_per_pixel != 32 {
            return Err(FbglError::UnsupportedPixelFormat(self.bits_per_pixel));
        }
        if self.width == 0 || self.height == 0 {
            return Err(FbglError::GeometryQuery(format!(
                "empty resolution {}x{}",
                self.width, self.height
            )));
        }
        if self.line_length % 4 != 0 || (self.line_length as u64) < self.width as u64 * 4 {
            return Err(FbglError::GeometryQuery(format!(
                "line length {} too short for width {}",
                self.line_length, self.width
            )));
        }
        if (self.smem_len as u64) < self.line_length as u64 * self.height as u64 {
            return Err(FbglError::GeometryQuery(format!(
                "memory length {} smaller than {}x{} rows",
                self.smem_len, self.line_length, self.height
            )));
        }
        Ok(())
    }
}

impl fmt::Display for ScreenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id:           {}", self.id)?;
        writeln!(f, "resolution:   {}x{}", self.width, self.height)?;
        writeln!(f, "bpp:          {}", self.bits_per_pixel)?;
        writeln!(f, "line length:  {}", self.line_length)?;
        writeln!(f, "memory:       {}", self.smem_len)?;
        write!(
            f,
            "rgba offsets: {}/{}/{}/{}",
            self.red.offset, self.green.offset, self.blue.offset, self.transp.offset
        )
    }
}

/// Backend interface. A backend hands out its pixels until `release`,
/// after which both views are empty.
pub trait Backend: Send {
    fn kind(&self) -> BackendKind;

    fn info(&self) -> &ScreenInfo;

    fn pixels(&self) -> &[u32];

    fn pixels_mut(&mut self) -> &mut [u32];

    /// Gives the underlying resource back. Called once by Surface::close.
    fn release(&mut self) -> Result<()>;

    fn as_any(&mut self) -> &mut dyn Any;
}
