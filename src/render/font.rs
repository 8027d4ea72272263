// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! PC Screen Font (PSF1 / PSF2) loading and text rendering.
//!
//! PSF1 layout:
//!
//! | offset | size | field                         |
//! |--------|------|-------------------------------|
//! | 0      | 2    | magic `36 04`                 |
//! | 2      | 1    | mode, bit 0 = 512 glyphs      |
//! | 3      | 1    | charsize, bytes per glyph     |
//! | 4      | ...  | glyph table, 8 pixels wide    |
//!
//! PSF2 starts with a 32 byte little-endian header (magic `72 B5 4A 86`,
//! version, header size, flags, glyph count, bytes per glyph, height,
//! width) and the glyph table begins at `header size`.
//!
//! Glyph rows are `(width + 7) / 8` bytes, most significant bit leftmost.

use crate::{
    error::{FbglError, Result},
    render::surface::Surface,
};
use bitflags::bitflags;
use log::info;
use std::fs;
use std::path::Path;

pub const PSF1_MAGIC: [u8; 2] = [0x36, 0x04];
pub const PSF2_MAGIC: [u8; 4] = [0x72, 0xB5, 0x4A, 0x86];
pub const PSF1_HEADER_SIZE: usize = 4;
pub const PSF2_HEADER_SIZE: usize = 32;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Psf1Mode: u8 {
        const MODE512  = 0x01;
        const HASTAB   = 0x02;
        const SEQ      = 0x04;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Psf2Flags: u32 {
        const HAS_UNICODE_TABLE = 0x01;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Psf1Font {
    pub mode: Psf1Mode,
    pub charsize: u8,
    glyphs: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Psf2Font {
    pub version: u32,
    pub flags: Psf2Flags,
    pub num_glyphs: u32,
    pub bytes_per_glyph: u32,
    pub height: u32,
    pub width: u32,
    glyphs: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Font {
    Psf1(Psf1Font),
    Psf2(Psf2Font),
}

fn read_u32(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

/// `count * size` bytes starting at `start`, or a truncation error.
fn glyph_table(data: &[u8], start: usize, count: usize, size: usize) -> Result<Vec<u8>> {
    let end = count
        .checked_mul(size)
        .and_then(|n| n.checked_add(start))
        .ok_or_else(|| FbglError::Format("glyph table size overflows".to_string()))?;
    data.get(start..end)
        .map(|t| t.to_vec())
        .ok_or_else(|| FbglError::truncated("glyph table"))
}

impl Font {
    /// Reads a font file, picking the format from its magic number.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let font = Self::from_bytes(&data)?;
        info!(
            "font {:?} loaded: {} glyphs {}x{}",
            path,
            font.glyph_count(),
            font.glyph_width(),
            font.glyph_height()
        );
        Ok(font)
    }

    pub fn load_psf1<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse_psf1(&fs::read(path)?)
    }

    pub fn load_psf2<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::parse_psf2(&fs::read(path)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.starts_with(&PSF2_MAGIC) {
            Self::parse_psf2(data)
        } else if data.starts_with(&PSF1_MAGIC) {
            Self::parse_psf1(data)
        } else if data.len() < PSF1_MAGIC.len() {
            Err(FbglError::truncated("font header"))
        } else {
            Err(FbglError::Format("not a PSF1 or PSF2 font".to_string()))
        }
    }

    pub fn parse_psf1(data: &[u8]) -> Result<Self> {
        if data.len() < PSF1_HEADER_SIZE {
            return Err(FbglError::truncated("PSF1 header"));
        }
        if data[..2] != PSF1_MAGIC {
            return Err(FbglError::Format(format!(
                "bad PSF1 magic {:02x} {:02x}",
                data[0], data[1]
            )));
        }
        let mode = Psf1Mode::from_bits_retain(data[2]);
        let charsize = data[3];
        if charsize == 0 {
            return Err(FbglError::Format("PSF1 charsize is 0".to_string()));
        }
        let count = if mode.contains(Psf1Mode::MODE512) { 512 } else { 256 };
        let glyphs = glyph_table(data, PSF1_HEADER_SIZE, count, charsize as usize)?;
        Ok(Font::Psf1(Psf1Font {
            mode,
            charsize,
            glyphs,
        }))
    }

    pub fn parse_psf2(data: &[u8]) -> Result<Self> {
        if data.len() < PSF2_HEADER_SIZE {
            return Err(FbglError::truncated("PSF2 header"));
        }
        if data[..4] != PSF2_MAGIC {
            return Err(FbglError::Format(format!("bad PSF2 magic {:02x?}", &data[..4])));
        }
        let version = read_u32(data, 4);
        let header_size = read_u32(data, 8);
        let flags = Psf2Flags::from_bits_retain(read_u32(data, 12));
        let num_glyphs = read_u32(data, 16);
        let bytes_per_glyph = read_u32(data, 20);
        let height = read_u32(data, 24);
        let width = read_u32(data, 28);

        if (header_size as usize) < PSF2_HEADER_SIZE {
            return Err(FbglError::Format(format!(
                "PSF2 header size {} below {}",
                header_size, PSF2_HEADER_SIZE
            )));
        }
        if num_glyphs == 0 || width == 0 || height == 0 {
            return Err(FbglError::Format(format!(
                "PSF2 empty font: {} glyphs {}x{}",
                num_glyphs, width, height
            )));
        }
        let needed = (width as u64).div_ceil(8) * height as u64;
        if (bytes_per_glyph as u64) < needed {
            return Err(FbglError::Format(format!(
                "PSF2 glyph size {} too small for {}x{}",
                bytes_per_glyph, width, height
            )));
        }
        let glyphs = glyph_table(
            data,
            header_size as usize,
            num_glyphs as usize,
            bytes_per_glyph as usize,
        )?;
        Ok(Font::Psf2(Psf2Font {
            version,
            flags,
            num_glyphs,
            bytes_per_glyph,
            height,
            width,
            glyphs,
        }))
    }

    pub fn glyph_count(&self) -> usize {
        match self {
            Font::Psf1(f) => {
                if f.mode.contains(Psf1Mode::MODE512) {
                    512
                } else {
                    256
                }
            }
            Font::Psf2(f) => f.num_glyphs as usize,
        }
    }

    pub fn glyph_width(&self) -> u32 {
        match self {
            Font::Psf1(_) => 8,
            Font::Psf2(f) => f.width,
        }
    }

    pub fn glyph_height(&self) -> u32 {
        match self {
            Font::Psf1(f) => f.charsize as u32,
            Font::Psf2(f) => f.height,
        }
    }

    pub fn bytes_per_glyph(&self) -> usize {
        match self {
            Font::Psf1(f) => f.charsize as usize,
            Font::Psf2(f) => f.bytes_per_glyph as usize,
        }
    }

    /// Bytes per glyph row.
    pub fn row_bytes(&self) -> usize {
        self.glyph_width().div_ceil(8) as usize
    }

    /// Bitmap of glyph `idx`, or `None` past the table.
    pub fn glyph(&self, idx: usize) -> Option<&[u8]> {
        let size = self.bytes_per_glyph();
        let table = match self {
            Font::Psf1(f) => &f.glyphs,
            Font::Psf2(f) => &f.glyphs,
        };
        table.get(idx * size..(idx + 1) * size)
    }

    /// Is pixel (gx, gy) of glyph `idx` set.
    pub fn glyph_bit(&self, idx: usize, gx: u32, gy: u32) -> bool {
        if gx >= self.glyph_width() || gy >= self.glyph_height() {
            return false;
        }
        let off = gy as usize * self.row_bytes() + gx as usize / 8;
        match self.glyph(idx).and_then(|g| g.get(off)) {
            Some(b) => b & (0x80 >> (gx % 8)) != 0,
            None => false,
        }
    }
}

/// Draws `text` one byte per glyph starting at (x, y), top-left of the
/// first glyph. Any byte value is a glyph index, so `b"\xB0"` draws glyph
/// 0xB0 while a `&str` contributes its UTF-8 bytes. Bytes past the glyph
/// table use glyph 0. Only set bits are drawn; the background is left alone.
pub fn render_text(
    s: &mut Surface,
    font: &Font,
    text: impl AsRef<[u8]>,
    x: i32,
    y: i32,
    color: u32,
) {
    let (w, h) = (font.glyph_width(), font.glyph_height());
    let mut cx = x as i64;
    for &b in text.as_ref() {
        let mut idx = b as usize;
        if idx >= font.glyph_count() {
            idx = 0;
        }
        for gy in 0..h {
            for gx in 0..w {
                if font.glyph_bit(idx, gx, gy) {
                    let px = cx + gx as i64;
                    let py = y as i64 + gy as i64;
                    if let (Ok(px), Ok(py)) = (i32::try_from(px), i32::try_from(py)) {
                        s.set_pixel(px, py, color);
                    }
                }
            }
        }
        cx += w as i64;
    }
}
