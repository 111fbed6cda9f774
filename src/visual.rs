//! The visible-light photo embedded in legacy files.
use image::{Rgb, RgbImage};

pub const VISUAL_WIDTH: usize = 640;
pub const VISUAL_HEIGHT: usize = 480;

/// Expand a packed RGB565 sample.
///
/// Channels are shifted up without replicating the high bits
/// into the low ones (so full intensity is 248 / 252, not
/// 255). This matches the camera's own viewer.
pub fn expand_rgb565(raw: u16) -> [u8; 3] {
    [
        (((raw >> 11) & 0x1f) * 8) as u8,
        (((raw >> 5) & 0x3f) * 4) as u8,
        ((raw & 0x1f) * 8) as u8,
    ]
}

/// Build an RGB image from row-major RGB565 samples.
///
/// `samples` must hold at least `width * height` values.
pub fn decode_rgb565_frame(samples: &[u16], width: usize, height: usize) -> RgbImage {
    debug_assert!(samples.len() >= width * height);
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        Rgb(expand_rgb565(samples[y as usize * width + x as usize]))
    })
}
