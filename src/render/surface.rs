// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Surface is the drawing target: a `width x height` grid of packed 32-bit
//! pixels stored row by row, `pitch` pixels apart, in memory owned by a
//! [`Backend`].
//!
//! ```ignore
//! let mut s = Surface::open(SurfaceSource::from_path(None))?;
//! s.fill(BLACK);
//! s.set_pixel(10, 10, RED);
//! s.close()?;
//! ```
//!
//! All writes go through bounds checks except `set_pixel_unchecked`. Once
//! closed, the pixel view is empty and drawing does nothing.

#[cfg(linux_fb)]
use crate::render::backend::{device::DeviceBackend, shm::ShmBackend};
use crate::{
    config::{get_config, FbglConfig},
    error::{FbglError, Result},
    render::backend::{memory::MemoryBackend, Backend, BackendKind, ScreenInfo},
    EMULATED_DEVICE,
};
use log::{info, warn};
use std::path::PathBuf;

/// Where a surface gets its pixels from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceSource {
    /// The configured device, /dev/fb0 unless overridden
    DefaultDevice,
    Device(PathBuf),
    /// Shared memory segment with the given SysV key
    Emulated { key: i32 },
    /// Heap buffer, for headless rendering
    Memory { width: u32, height: u32 },
}

impl SurfaceSource {
    /// Maps an open path to a source using the global configuration.
    pub fn from_path(path: Option<&str>) -> Self {
        Self::from_path_with(path, get_config())
    }

    /// `None`, `""` and `"default"` select the default device,
    /// [`EMULATED_DEVICE`] selects the emulated surface, anything else is a
    /// device path. Emulation mode then redirects framebuffer paths.
    pub fn from_path_with(path: Option<&str>, cfg: &FbglConfig) -> Self {
        let src = match path {
            None | Some("") | Some("default") => SurfaceSource::DefaultDevice,
            Some(p) if p == EMULATED_DEVICE => SurfaceSource::Emulated { key: cfg.shm_key },
            Some(p) => SurfaceSource::Device(PathBuf::from(p)),
        };
        src.resolve(cfg)
    }

    /// Replaces DefaultDevice by the configured path and, in emulation mode,
    /// any `/dev/fb*` device by the emulated segment.
    pub fn resolve(self, cfg: &FbglConfig) -> Self {
        let src = match self {
            SurfaceSource::DefaultDevice => SurfaceSource::Device(PathBuf::from(&cfg.device)),
            other => other,
        };
        match src {
            SurfaceSource::Device(p) if cfg.emulate && p.to_string_lossy().starts_with("/dev/fb") => {
                SurfaceSource::Emulated { key: cfg.shm_key }
            }
            other => other,
        }
    }
}

/// Counters for whole-frame copies through write_frame / read_frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub writes: usize,
    pub bytes_written: usize,
    pub reads: usize,
}

pub struct Surface {
    backend: Option<Box<dyn Backend>>,
    info: ScreenInfo,
    width: u32,
    height: u32,
    pitch: usize,
    stats: FrameStats,
}

impl Surface {
    pub fn open(source: SurfaceSource) -> Result<Self> {
        let cfg = get_config();
        let backend: Box<dyn Backend> = match source.resolve(cfg) {
            SurfaceSource::Memory { width, height } => {
                Box::new(MemoryBackend::new(width, height)?)
            }
            #[cfg(linux_fb)]
            SurfaceSource::DefaultDevice => {
                Box::new(DeviceBackend::open(std::path::Path::new(&cfg.device))?)
            }
            #[cfg(linux_fb)]
            SurfaceSource::Device(path) => Box::new(DeviceBackend::open(&path)?),
            #[cfg(linux_fb)]
            SurfaceSource::Emulated { key } => Box::new(ShmBackend::open(key)?),
            #[cfg(headless)]
            other => {
                return Err(FbglError::ResourceUnavailable(format!(
                    "{:?} needs Linux framebuffer support",
                    other
                )))
            }
        };
        Self::with_backend(backend)
    }

    /// Wraps an already opened backend.
    pub fn with_backend(mut backend: Box<dyn Backend>) -> Result<Self> {
        let info = backend.info().clone();
        if let Err(e) = info.validate() {
            let _ = backend.release();
            return Err(e);
        }
        let pitch = info.pitch();
        if backend.pixels().len() < pitch * info.height as usize {
            let _ = backend.release();
            return Err(FbglError::GeometryQuery(format!(
                "backend exposes {} pixels, geometry needs {}",
                backend.pixels().len(),
                pitch * info.height as usize
            )));
        }
        Ok(Self {
            width: info.width,
            height: info.height,
            pitch,
            info,
            backend: Some(backend),
            stats: FrameStats::default(),
        })
    }

    /// Releases the backend. Only the first call does anything; later calls
    /// report `AlreadyClosed`.
    pub fn close(&mut self) -> Result<()> {
        match self.backend.take() {
            Some(mut b) => {
                info!(
                    "surface {} closed, frame writes {} ({} bytes), reads {}",
                    self.info.id, self.stats.writes, self.stats.bytes_written, self.stats.reads
                );
                b.release()
            }
            None => {
                warn!("surface {} already closed", self.info.id);
                Err(FbglError::AlreadyClosed)
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    pub fn kind(&self) -> Option<BackendKind> {
        self.backend.as_ref().map(|b| b.kind())
    }

    /// The backend, for callers that need its concrete type through
    /// `as_any`.
    pub fn backend_mut(&mut self) -> Option<&mut (dyn Backend + 'static)> {
        self.backend.as_deref_mut()
    }

    pub fn info(&self) -> &ScreenInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.pitch * 4
    }

    /// Pixels per row, at least `width`.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Buffer length in bytes: stride * height.
    pub fn len(&self) -> usize {
        self.stride() * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn pixels(&self) -> &[u32] {
        match self.backend.as_ref() {
            Some(b) => b.pixels(),
            None => &[],
        }
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        match self.backend.as_mut() {
            Some(b) => b.pixels_mut(),
            None => &mut [],
        }
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.pitch + x as usize
    }

    pub fn fill(&mut self, color: u32) {
        let (w, pitch) = (self.width as usize, self.pitch);
        if pitch == w {
            self.pixels_mut().fill(color);
        } else {
            for row in self.pixels_mut().chunks_mut(pitch) {
                row[..w].fill(color);
            }
        }
    }

    /// Writes one pixel; coordinates outside the surface are dropped.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        if let Some(p) = self.pixels_mut().get_mut(idx) {
            *p = color;
        }
    }

    /// Writes one pixel without any check.
    ///
    /// # Safety
    /// The surface must be open and `0 <= x < width`, `0 <= y < height`.
    #[inline]
    pub unsafe fn set_pixel_unchecked(&mut self, x: i32, y: i32, color: u32) {
        let idx = self.index(x, y);
        unsafe {
            *self.pixels_mut().get_unchecked_mut(idx) = color;
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.pixels().get(self.index(x, y)).copied()
    }

    /// The visible part of row `y` (`width` pixels).
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [u32]> {
        if y < 0 || y as u32 >= self.height {
            return None;
        }
        let start = y as usize * self.pitch;
        let w = self.width as usize;
        self.pixels_mut().get_mut(start..start + w)
    }

    /// Copies a whole frame in, clamped to the surface size. Returns the
    /// number of pixels copied.
    pub fn write_frame(&mut self, src: &[u32]) -> usize {
        let dst = self.pixels_mut();
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        if n > 0 {
            self.stats.writes += 1;
            self.stats.bytes_written += n * 4;
        }
        n
    }

    /// Copies the current frame out, clamped to `dst`. Returns the number of
    /// pixels copied.
    pub fn read_frame(&mut self, dst: &mut [u32]) -> usize {
        let src = self.pixels();
        let n = src.len().min(dst.len());
        dst[..n].copy_from_slice(&src[..n]);
        self.stats.reads += 1;
        n
    }

    /// Saves the visible area as an RGB PNG.
    #[cfg(feature = "image")]
    pub fn save_png(&self, path: &str) -> Result<()> {
        save_png(self.pixels(), self.width, self.height, self.pitch, path)
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        if self.backend.is_some() {
            if let Err(e) = self.close() {
                warn!("surface close on drop failed: {}", e);
            }
        }
    }
}

/// Encodes `width x height` packed pixels, rows `pitch` apart, as PNG.
#[cfg(feature = "image")]
pub fn save_png(pixels: &[u32], width: u32, height: u32, pitch: usize, path: &str) -> Result<()> {
    use crate::render::color::channels;
    let mut img = image::RgbImage::new(width, height);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let c = pixels
            .get(y as usize * pitch + x as usize)
            .copied()
            .unwrap_or(0);
        let (r, g, b) = channels(c);
        *px = image::Rgb([r, g, b]);
    }
    img.save(path)
        .map_err(|e| FbglError::Io(std::io::Error::other(e.to_string())))?;
    info!("snapshot {}x{} saved to {}", width, height, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem(w: u32, h: u32) -> Surface {
        Surface::open(SurfaceSource::Memory { width: w, height: h }).unwrap()
    }

    #[test]
    fn test_geometry_invariants() {
        let s = mem(16, 8);
        assert_eq!(s.dimensions(), (16, 8));
        assert_eq!(s.stride(), 64);
        assert_eq!(s.len(), 64 * 8);
        assert_eq!(s.pixels().len() * 4, s.len());
        assert_eq!(s.kind(), Some(BackendKind::Memory));
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut s = mem(4, 3);
        s.set_pixel(3, 2, 0x112233);
        assert_eq!(s.get_pixel(3, 2), Some(0x112233));
        assert_eq!(s.pixels()[2 * 4 + 3], 0x112233);
        assert_eq!(s.get_pixel(4, 2), None);
        assert_eq!(s.get_pixel(-1, 0), None);
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut s = mem(4, 4);
        s.fill(7);
        for (x, y) in [(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MIN, i32::MAX)] {
            s.set_pixel(x, y, 9);
        }
        assert!(s.pixels().iter().all(|&p| p == 7));
    }

    #[test]
    fn test_unchecked_matches_checked() {
        let mut s = mem(5, 5);
        unsafe { s.set_pixel_unchecked(2, 3, 0xABCDEF) };
        assert_eq!(s.get_pixel(2, 3), Some(0xABCDEF));
    }

    #[test]
    fn test_surface_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Surface>();
    }

    #[test]
    fn test_backend_downcast() {
        let mut s = mem(2, 2);
        let b = s.backend_mut().unwrap();
        assert!(b.as_any().downcast_ref::<MemoryBackend>().is_some());
    }

    #[test]
    fn test_close_twice() {
        let mut s = mem(2, 2);
        assert!(s.close().is_ok());
        assert!(!s.is_open());
        assert!(matches!(s.close(), Err(FbglError::AlreadyClosed)));
        // drawing after close is a no-op
        s.set_pixel(0, 0, 1);
        s.fill(1);
        assert!(s.pixels().is_empty());
        assert_eq!(s.get_pixel(0, 0), None);
    }

    #[test]
    fn test_zero_sized_memory_surface_rejected() {
        let r = Surface::open(SurfaceSource::Memory { width: 0, height: 10 });
        assert!(matches!(r, Err(FbglError::GeometryQuery(_))));
    }

    #[test]
    fn test_oversized_memory_surface_rejected() {
        let r = Surface::open(SurfaceSource::Memory {
            width: 1 << 30,
            height: 1,
        });
        assert!(matches!(r, Err(FbglError::GeometryQuery(_))));
    }

    #[test]
    fn test_frame_copy_clamps_and_counts() {
        let mut s = mem(2, 2);
        let n = s.write_frame(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(n, 4);
        assert_eq!(s.pixels(), &[1, 2, 3, 4]);
        let mut out = [0u32; 3];
        assert_eq!(s.read_frame(&mut out), 3);
        assert_eq!(out, [1, 2, 3]);
        assert_eq!(
            s.stats(),
            FrameStats {
                writes: 1,
                bytes_written: 16,
                reads: 1
            }
        );
    }

    #[test]
    fn test_row_mut() {
        let mut s = mem(3, 2);
        s.row_mut(1).unwrap().fill(5);
        assert_eq!(s.pixels(), &[0, 0, 0, 5, 5, 5]);
        assert!(s.row_mut(2).is_none());
        assert!(s.row_mut(-1).is_none());
    }

    #[test]
    fn test_source_from_path() {
        let cfg = FbglConfig::default();
        assert_eq!(
            SurfaceSource::from_path_with(None, &cfg),
            SurfaceSource::Device(PathBuf::from("/dev/fb0"))
        );
        assert_eq!(
            SurfaceSource::from_path_with(Some("/dev/fb1"), &cfg),
            SurfaceSource::Device(PathBuf::from("/dev/fb1"))
        );
        assert_eq!(
            SurfaceSource::from_path_with(Some(EMULATED_DEVICE), &cfg),
            SurfaceSource::Emulated { key: cfg.shm_key }
        );
    }

    #[test]
    fn test_emulate_redirects_fb_paths() {
        let cfg = FbglConfig {
            emulate: true,
            shm_key: 77,
            ..FbglConfig::default()
        };
        assert_eq!(
            SurfaceSource::from_path_with(Some("default"), &cfg),
            SurfaceSource::Emulated { key: 77 }
        );
        assert_eq!(
            SurfaceSource::from_path_with(Some("/dev/fb3"), &cfg),
            SurfaceSource::Emulated { key: 77 }
        );
        assert_eq!(
            SurfaceSource::from_path_with(Some("/tmp/fake"), &cfg),
            SurfaceSource::Device(PathBuf::from("/tmp/fake"))
        );
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.png");
        let mut s = mem(3, 2);
        s.set_pixel(1, 1, 0xFF8000);
        s.save_png(path.to_str().unwrap()).unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(1, 1).0, [0xFF, 0x80, 0x00]);
    }
}
