// FBGL
// copyright zipxing@hotmail.com 2022～2025

//! Pixel format helpers.
//!
//! Every pixel is a packed `u32`: alpha in bits 24-31, red 16-23, green
//! 8-15, blue 0-7. The framebuffer ignores alpha; textures use it as a
//! binary transparency mask.

pub const BLACK: u32 = 0x000000;
pub const WHITE: u32 = 0xFFFFFF;
pub const RED: u32 = 0xFF0000;
pub const GREEN: u32 = 0x00FF00;
pub const BLUE: u32 = 0x0000FF;

pub const RED_SHIFT: u32 = 16;
pub const GREEN_SHIFT: u32 = 8;
pub const BLUE_SHIFT: u32 = 0;
pub const ALPHA_SHIFT: u32 = 24;

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << RED_SHIFT) | ((g as u32) << GREEN_SHIFT) | ((b as u32) << BLUE_SHIFT)
}

#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << ALPHA_SHIFT) | rgb(r, g, b)
}

/// (r, g, b)
#[inline]
pub const fn channels(c: u32) -> (u8, u8, u8) {
    (
        (c >> RED_SHIFT) as u8,
        (c >> GREEN_SHIFT) as u8,
        (c >> BLUE_SHIFT) as u8,
    )
}

#[inline]
pub const fn alpha(c: u32) -> u8 {
    (c >> ALPHA_SHIFT) as u8
}
