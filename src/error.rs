// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Error types shared by surfaces, asset loaders and the input poller.
//!
//! Out-of-range pixel coordinates are never reported here, drawing
//! primitives drop them silently.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FbglError>;

#[derive(Debug, Error)]
pub enum FbglError {
    /// The framebuffer device node could not be opened.
    #[error("cannot open framebuffer device {path:?}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Fixed or variable screen info could not be read, or is inconsistent.
    #[error("framebuffer geometry query failed: {0}")]
    GeometryQuery(String),

    /// Only 32 bits per pixel is supported.
    #[error("unsupported pixel format: {0} bits per pixel")]
    UnsupportedPixelFormat(u32),

    /// mmap of the pixel memory failed.
    #[error("cannot map framebuffer memory: {0}")]
    Mapping(#[source] io::Error),

    /// Shared memory segment cannot be created or attached.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// close() on a surface that was already closed.
    #[error("surface already closed")]
    AlreadyClosed,

    /// Bad magic number or inconsistent header in a loaded asset.
    #[error("format error: {0}")]
    Format(String),

    /// Asset is well formed but uses a variant we do not decode.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("log init error: {0}")]
    Log(String),
}

impl FbglError {
    /// Shortcut for a truncated asset, reported as an IO error.
    pub fn truncated(what: &str) -> Self {
        FbglError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("{} truncated", what),
        ))
    }
}
