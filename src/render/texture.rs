// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Uncompressed truecolor TGA textures.
//!
//! Header (18 bytes, little endian):
//! id length, color map type, image type, color map spec (5 bytes),
//! x/y origin, width @12, height @14, bits per pixel @16, descriptor @17.
//! Pixel data follows the id field and the color map, stored as B G R (A).
//! Descriptor bit 5 set means the first stored row is the top one.

use crate::{
    error::{FbglError, Result},
    render::surface::Surface,
};
use bitflags::bitflags;
use log::info;
use std::fs;
use std::path::Path;

pub const TGA_HEADER_SIZE: usize = 18;
pub const TGA_TRUECOLOR: u8 = 2;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TgaDescriptor: u8 {
        const ALPHA_BITS   = 0x0F;
        const RIGHT_TO_LEFT = 0x10;
        const TOP_DOWN     = 0x20;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    /// ARGB, row 0 at the top, always `width * height` long
    pixels: Vec<u32>,
}

impl Texture {
    /// Wraps ARGB pixels, row 0 at the top. The buffer must hold exactly
    /// `width * height` pixels.
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let want = (width as usize).checked_mul(height as usize);
        if want != Some(pixels.len()) {
            return Err(FbglError::Format(format!(
                "texture {}x{} needs {} pixels, got {}",
                width,
                height,
                width as u64 * height as u64,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn load_tga<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let tex = Self::from_tga_bytes(&fs::read(path)?)?;
        info!("texture {:?} loaded: {}x{}", path, tex.width, tex.height);
        Ok(tex)
    }

    pub fn from_tga_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < TGA_HEADER_SIZE {
            return Err(FbglError::truncated("TGA header"));
        }
        let id_len = data[0] as usize;
        let cmap_type = data[1];
        let image_type = data[2];
        let cmap_len = u16::from_le_bytes([data[5], data[6]]) as usize;
        let cmap_entry_bits = data[7] as usize;
        let width = u16::from_le_bytes([data[12], data[13]]) as u32;
        let height = u16::from_le_bytes([data[14], data[15]]) as u32;
        let bpp = data[16];
        let desc = TgaDescriptor::from_bits_retain(data[17]);

        if image_type != TGA_TRUECOLOR {
            return Err(FbglError::UnsupportedFormat(format!(
                "TGA image type {}, only uncompressed truecolor (2)",
                image_type
            )));
        }
        if bpp != 24 && bpp != 32 {
            return Err(FbglError::UnsupportedFormat(format!(
                "TGA {} bits per pixel, only 24 or 32",
                bpp
            )));
        }

        let cmap_bytes = if cmap_type != 0 {
            cmap_len * cmap_entry_bits.div_ceil(8)
        } else {
            0
        };
        let start = TGA_HEADER_SIZE + id_len + cmap_bytes;
        let bytes_pp = bpp as usize / 8;
        let (w, h) = (width as usize, height as usize);
        let end = start + w * h * bytes_pp;
        let body = data
            .get(start..end)
            .ok_or_else(|| FbglError::truncated("TGA pixel data"))?;

        let top_down = desc.contains(TgaDescriptor::TOP_DOWN);
        let mut pixels = vec![0u32; w * h];
        for (i, px) in body.chunks_exact(bytes_pp).enumerate() {
            let (sx, sy) = (i % w, i / w);
            let dy = if top_down { sy } else { h - 1 - sy };
            let a = if bytes_pp == 4 { px[3] } else { 0xFF };
            pixels[dy * w + sx] = u32::from_be_bytes([a, px[2], px[1], px[0]]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

/// Copies `tex` with its top-left corner at (x, y). Pixels with alpha 0 are
/// skipped, everything else is written as is.
pub fn draw_texture(s: &mut Surface, tex: &Texture, x: i32, y: i32) {
    let (sw, sh) = (s.width() as i64, s.height() as i64);
    let (x, y) = (x as i64, y as i64);
    let tw = tex.width as i64;
    // overlap of the texture rectangle with the surface, in texture space
    let tx0 = (-x).max(0);
    let ty0 = (-y).max(0);
    let tx1 = tw.min(sw - x);
    let ty1 = (tex.height as i64).min(sh - y);
    if tx0 >= tx1 || ty0 >= ty1 {
        return;
    }
    for ty in ty0..ty1 {
        let Some(src) = tex
            .pixels
            .get((ty * tw + tx0) as usize..(ty * tw + tx1) as usize)
        else {
            break;
        };
        let Some(row) = s.row_mut((y + ty) as i32) else {
            continue;
        };
        let dst = &mut row[(x + tx0) as usize..(x + tx1) as usize];
        for (d, &p) in dst.iter_mut().zip(src) {
            if p >> 24 != 0 {
                *d = p;
            }
        }
    }
}
