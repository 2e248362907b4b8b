//! The mode normalization routine.

use crate::composite::{
    gray_alpha_to_rgba, gray_to_rgb, indexed_to_rgb, indexed_to_rgba, rgba_over_white,
};
use crate::image::{Image, PixelData, PixelMode};
use crate::target::TargetFormat;

/// Convert `image` to a pixel mode that `target` can encode directly.
///
/// Consumes the image; layouts that are already acceptable are returned
/// without touching the buffer. Transparency is composited over white only
/// when the target cannot store alpha.
pub fn normalize(image: Image, target: TargetFormat) -> Image {
    match target {
        TargetFormat::Jpeg => normalize_for_jpeg(image),
        TargetFormat::Png => normalize_for_png(image),
    }
}

/// Whether `pixels` can be written to `target` without conversion.
///
/// Indexed images with a transparency table are not considered normalized
/// for PNG; they are expanded to RGBA.
pub fn is_normalized(pixels: &PixelData, target: TargetFormat) -> bool {
    match (target, pixels) {
        (TargetFormat::Jpeg, PixelData::Rgb(_)) => true,
        (TargetFormat::Jpeg, _) => false,
        (TargetFormat::Png, PixelData::Indexed { palette, .. }) => !palette.has_transparency(),
        (TargetFormat::Png, PixelData::GrayAlpha(_)) => false,
        (TargetFormat::Png, _) => true,
    }
}

fn normalize_for_jpeg(image: Image) -> Image {
    image.map_pixels(|pixels| match pixels {
        PixelData::Rgb(rgb) => PixelData::Rgb(rgb),
        PixelData::Rgba(rgba) => PixelData::Rgb(rgba_over_white(&rgba)),
        PixelData::GrayAlpha(la) => PixelData::Rgb(rgba_over_white(&gray_alpha_to_rgba(&la))),
        PixelData::Indexed { indices, palette } if palette.has_transparency() => {
            PixelData::Rgb(rgba_over_white(&indexed_to_rgba(&indices, &palette)))
        }
        PixelData::Indexed { indices, palette } => {
            PixelData::Rgb(indexed_to_rgb(&indices, &palette))
        }
        PixelData::Gray(l) => PixelData::Rgb(gray_to_rgb(&l)),
    })
}

fn normalize_for_png(image: Image) -> Image {
    image.map_pixels(|pixels| match pixels {
        PixelData::GrayAlpha(la) => PixelData::Rgba(gray_alpha_to_rgba(&la)),
        PixelData::Indexed { indices, palette } if palette.has_transparency() => {
            PixelData::Rgba(indexed_to_rgba(&indices, &palette))
        }
        unchanged => unchanged,
    })
}

/// Pixel mode that [`normalize()`] produces for a source mode and target.
///
/// `transparent_palette` only matters for [`PixelMode::Indexed`].
pub fn output_mode(mode: PixelMode, transparent_palette: bool, target: TargetFormat) -> PixelMode {
    match (target, mode) {
        (TargetFormat::Jpeg, _) => PixelMode::Rgb,
        (TargetFormat::Png, PixelMode::GrayAlpha) => PixelMode::Rgba,
        (TargetFormat::Png, PixelMode::Indexed) if transparent_palette => PixelMode::Rgba,
        (TargetFormat::Png, m) => m,
    }
}
