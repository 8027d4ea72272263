// FBGL
// copyright zipxing@hotmail.com 2022～2025

use crate::{
    error::{FbglError, Result},
    render::backend::{Backend, BackendKind, ScreenInfo},
};
use std::any::Any;

pub struct MemoryBackend {
    info: ScreenInfo,
    pixels: Vec<u32>,
}

impl MemoryBackend {
    /// Zeroed `width x height` buffer. Fails with `GeometryQuery` when the
    /// size overflows and `ResourceUnavailable` when it cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let info = ScreenInfo::packed32("FBGL_MEM", width, height)?;
        let len = info.pitch() * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len).map_err(|e| {
            FbglError::ResourceUnavailable(format!("{}x{} buffer: {}", width, height, e))
        })?;
        pixels.resize(len, 0);
        Ok(Self { info, pixels })
    }
}

impl Backend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn info(&self) -> &ScreenInfo {
        &self.info
    }

    fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn release(&mut self) -> Result<()> {
        self.pixels = Vec::new();
        Ok(())
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}
