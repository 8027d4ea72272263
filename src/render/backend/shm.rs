// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Emulated framebuffer on a System V shared memory segment.
//!
//! The writer side ([`ShmBackend`]) creates or attaches the segment, clears
//! it and draws into it. A viewer ([`ShmViewer`]) attaches the same key
//! read-only and presents it at its own pace. Closing the writer only
//! detaches: the segment stays alive for viewers until someone calls
//! [`remove_segment`].

use crate::{
    error::{FbglError, Result},
    render::backend::{Backend, BackendKind, ScreenInfo},
};
use log::{debug, info, warn};
use std::any::Any;
use std::io;
use std::ptr;
use std::slice;

pub const EMU_WIDTH: u32 = 800;
pub const EMU_HEIGHT: u32 = 600;
pub const EMU_BPP: u32 = 32;
pub const EMU_PITCH: u32 = EMU_WIDTH * EMU_BPP / 8;
pub const EMU_SIZE: usize = (EMU_PITCH * EMU_HEIGHT) as usize;

/// Attached segment: id, base address and size in bytes.
struct Attachment {
    shm_id: i32,
    addr: *mut u32,
    size: usize,
}

// SAFETY: the address stays valid until detach, which needs &mut self.
unsafe impl Send for Attachment {}

impl Attachment {
    fn attach(key: i32, create: bool, readonly: bool) -> Result<Self> {
        // SAFETY: plain syscalls; results are checked below.
        let mut shm_id = unsafe { libc::shmget(key, EMU_SIZE, 0o666) };
        if shm_id < 0 && create {
            shm_id = unsafe { libc::shmget(key, EMU_SIZE, libc::IPC_CREAT | 0o666) };
        }
        if shm_id < 0 {
            return Err(FbglError::ResourceUnavailable(format!(
                "shmget key {:#010x} ({} bytes): {}",
                key,
                EMU_SIZE,
                io::Error::last_os_error()
            )));
        }
        let flags = if readonly { libc::SHM_RDONLY } else { 0 };
        let addr = unsafe { libc::shmat(shm_id, ptr::null(), flags) };
        if addr as isize == -1 {
            return Err(FbglError::ResourceUnavailable(format!(
                "shmat id {}: {}",
                shm_id,
                io::Error::last_os_error()
            )));
        }
        debug!("shm key {:#010x} attached id {} at {:p}", key, shm_id, addr);
        Ok(Self {
            shm_id,
            addr: addr as *mut u32,
            size: EMU_SIZE,
        })
    }

    fn len(&self) -> usize {
        self.size / 4
    }

    fn detach(&mut self) -> Result<()> {
        // SAFETY: addr came from a successful shmat and is detached once.
        let rc = unsafe { libc::shmdt(self.addr as *const libc::c_void) };
        if rc == -1 {
            return Err(FbglError::Io(io::Error::last_os_error()));
        }
        Ok(())
    }
}

pub struct ShmBackend {
    key: i32,
    info: ScreenInfo,
    seg: Option<Attachment>,
}

impl ShmBackend {
    /// Creates the segment if needed, attaches it and clears it to black.
    pub fn open(key: i32) -> Result<Self> {
        let info = ScreenInfo::packed32("FBGL_EMU", EMU_WIDTH, EMU_HEIGHT)?;
        let seg = Attachment::attach(key, true, false)?;
        // SAFETY: the segment is EMU_SIZE bytes and attached read/write.
        unsafe { ptr::write_bytes(seg.addr as *mut u8, 0, seg.size) };
        info!(
            "emulated fb: {}x{} @ {} bpp, shm key {:#010x} id {}",
            EMU_WIDTH, EMU_HEIGHT, EMU_BPP, key, seg.shm_id
        );
        Ok(Self {
            key,
            info,
            seg: Some(seg),
        })
    }

    pub fn key(&self) -> i32 {
        self.key
    }
}

impl Backend for ShmBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Emulated
    }

    fn info(&self) -> &ScreenInfo {
        &self.info
    }

    fn pixels(&self) -> &[u32] {
        match &self.seg {
            // SAFETY: attached, page aligned, len() u32s long.
            Some(s) => unsafe { slice::from_raw_parts(s.addr, s.len()) },
            None => &[],
        }
    }

    fn pixels_mut(&mut self) -> &mut [u32] {
        match &mut self.seg {
            // SAFETY: as above; &mut self keeps the view unique in-process.
            Some(s) => unsafe { slice::from_raw_parts_mut(s.addr, s.len()) },
            None => &mut [],
        }
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut seg) = self.seg.take() {
            seg.detach()?;
            info!(
                "emulated fb detached, shm key {:#010x} kept alive for viewers",
                self.key
            );
        }
        Ok(())
    }

    fn as_any(&mut self) -> &mut dyn Any {
        self
    }
}

impl Drop for ShmBackend {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("shm detach failed: {}", e);
        }
    }
}

/// Read-only attachment used by viewer processes. Never creates the
/// segment: the drawing program has to be running first.
pub struct ShmViewer {
    seg: Attachment,
}

impl ShmViewer {
    pub fn attach(key: i32) -> Result<Self> {
        let seg = Attachment::attach(key, false, true)?;
        Ok(Self { seg })
    }

    pub fn width(&self) -> u32 {
        EMU_WIDTH
    }

    pub fn height(&self) -> u32 {
        EMU_HEIGHT
    }

    /// Current frame. The writer may be mid-frame.
    pub fn frame(&self) -> &[u32] {
        // SAFETY: attached for the lifetime of self.
        unsafe { slice::from_raw_parts(self.seg.addr, self.seg.len()) }
    }
}

impl Drop for ShmViewer {
    fn drop(&mut self) {
        if let Err(e) = self.seg.detach() {
            warn!("shm viewer detach failed: {}", e);
        }
    }
}

/// Marks the segment for removal; it disappears once the last process
/// detaches. Missing segments are not an error.
pub fn remove_segment(key: i32) -> Result<()> {
    // SAFETY: plain syscalls.
    let shm_id = unsafe { libc::shmget(key, 0, 0) };
    if shm_id < 0 {
        return Ok(());
    }
    let rc = unsafe { libc::shmctl(shm_id, libc::IPC_RMID, ptr::null_mut()) };
    if rc == -1 {
        return Err(FbglError::Io(io::Error::last_os_error()));
    }
    info!("shm key {:#010x} removed", key);
    Ok(())
}
