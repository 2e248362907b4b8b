//! Per-pixel layout conversions and white-background compositing.
//!
//! All functions take the unpacked byte buffer of one layout and return a
//! freshly allocated buffer of another. None of them inspect dimensions;
//! pixel count is implied by the input length.

use crate::image::Palette;

/// Background used when flattening transparency.
pub const WHITE: u8 = 255;

/// Blend one channel over white with integer rounding.
///
/// `alpha == 255` returns `color` unchanged and `alpha == 0` returns white.
#[inline]
pub fn blend_over_white(color: u8, alpha: u8) -> u8 {
    let c = color as u32;
    let a = alpha as u32;
    ((c * a + WHITE as u32 * (255 - a) + 127) / 255) as u8
}

/// Composite RGBA pixels over an opaque white canvas, producing RGB.
pub fn rgba_over_white(rgba: &[u8]) -> Vec<u8> {
    if rgba.chunks_exact(4).all(|px| px[3] == 255) {
        return rgba_to_rgb(rgba);
    }
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3];
        match a {
            255 => out.extend_from_slice(&px[..3]),
            0 => out.extend_from_slice(&[WHITE, WHITE, WHITE]),
            _ => out.extend_from_slice(&[
                blend_over_white(px[0], a),
                blend_over_white(px[1], a),
                blend_over_white(px[2], a),
            ]),
        }
    }
    out
}

/// Drop the alpha channel without blending.
pub fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect()
}

pub fn gray_to_rgb(gray: &[u8]) -> Vec<u8> {
    gray.iter().flat_map(|&l| [l, l, l]).collect()
}

pub fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Vec<u8> {
    gray_alpha
        .chunks_exact(2)
        .flat_map(|px| [px[0], px[0], px[0], px[1]])
        .collect()
}

/// Look up every index in the palette, ignoring transparency.
pub fn indexed_to_rgb(indices: &[u8], palette: &Palette) -> Vec<u8> {
    indices.iter().flat_map(|&i| palette.color(i)).collect()
}

/// Look up every index, taking alpha from the palette's transparency table.
pub fn indexed_to_rgba(indices: &[u8], palette: &Palette) -> Vec<u8> {
    indices
        .iter()
        .flat_map(|&i| {
            let [r, g, b] = palette.color(i);
            [r, g, b, palette.alpha(i)]
        })
        .collect()
}
