// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Linux fbdev backend.
//!
//! Geometry comes from two ioctls on the device node, then the first
//! `line_length * yres` bytes of pixel memory are mapped shared read/write.
//! Layouts below mirror `struct fb_fix_screeninfo` and
//! `struct fb_var_screeninfo` from `<linux/fb.h>`.

use crate::{
    error::{FbglError, Result},
    render::backend::{Backend, BackendKind, Bitfield, ScreenInfo},
};
use log::{debug, info};
use memmap2::{MmapMut, MmapOptions};
use std::any::Any;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

pub const FBIOGET_VSCREENINFO: u32 = 0x4600;
pub const FBIOGET_FSCREENINFO: u32 = 0x4602;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FbFixScreeninfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FbVarScreeninfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

impl From<FbBitfield> for Bitfield {
    fn from(b: FbBitfield) -> Self {
        Bitfield {
            offset: b.offset,
            length: b.length,
        }
    }
}

impl ScreenInfo {
    pub fn from_device(finfo: &FbFixScreeninfo, vinfo: &FbVarScreeninfo) -> Self {
        let id_end = finfo.id.iter().position(|&c| c == 0).unwrap_or(finfo.id.len());
        Self {
            id: String::from_utf8_lossy(&finfo.id[..id_end]).into_owned(),
            width: vinfo.xres,
            height: vinfo.yres,
            bits_per_pixel: vinfo.bits_per_pixel,
            line_length: finfo.line_length,
            smem_len: finfo.smem_len,
            red: vinfo.red.into(),
            green: vinfo.green.into(),
            blue: vinfo.blue.into(),
            transp: vinfo.transp.into(),
        }
    }
}

fn query<T: Default>(file: &File, request: u32, what: &str) -> Result<T> {
    let mut out = T::default();
    // SAFETY: `out` is a #[repr(C)] mirror of the struct the kernel fills
    // for this request and lives across the call.
    let rc = unsafe { libc::ioctl(file.as_raw_fd(), request as _, &mut out as *mut T) };
    if rc == -1 {
        return Err(FbglError::GeometryQuery(format!(
            "{}: {}",
            what,
            io::Error::last_os_error()
        )));
    }
    Ok(out)
}

pub struct DeviceBackend {
    path: PathBuf,
    info: ScreenInfo,
    map: Option<MmapMut>,
    file: Option<File>,
}

impl DeviceBackend {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| FbglError::DeviceOpen {
                path: path.to_path_buf(),
                source,
            })?;

        let finfo: FbFixScreeninfo = query(&file, FBIOGET_FSCREENINFO, "fixed screen info")?;
        let vinfo: FbVarScreeninfo = query(&file, FBIOGET_VSCREENINFO, "variable screen info")?;
        let info = ScreenInfo::from_device(&finfo, &vinfo);
        debug!("fb {:?} geometry:\n{}", path, info);
        info.validate()?;

        // SAFETY: the mapping is shared device memory; the Surface is its
        // only user inside this process.
        let map = unsafe { MmapOptions::new().len(info.frame_len()).map_mut(&file) }
            .map_err(FbglError::Mapping)?;
        bytemuck::try_cast_slice::<u8, u32>(&map[..]).map_err(|e| {
            FbglError::Mapping(io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", e)))
        })?;

        info!(
            "fb device {:?} opened: {}x{} line {}",
            path, info.width, info.height, info.line_length
        );
        Ok(Self {
            path: path.to_path_buf(),
            info,
            map: Some(map),
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Backend for DeviceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Device
    }

    fn info(&self) -> &ScreenInfo {
        &self.info
    }

    fn pixels(&self) -> &[u32] {
        match &self.map {
            Some(m) => bytemuck::cast_slice(&m[..]),
            None => &[],
        }
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        match &mut self.map {
            Some(m) => bytemuck::cast_slice_mut(&mut m[..]),
            None => &mut [],
        }
    }

    fn release(&mut self) -> Result<()> {
        // unmap before the descriptor goes away
        drop(self.map.take());
        drop(self.file.take());
        info!("fb device {:?} closed", self.path);
        Ok(())
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}
