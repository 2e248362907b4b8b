use mode_normalize::{Image, PixelData, TargetFormat};
use std::io::Cursor;

use crate::error::ConvertError;

/// JPEG quality factor used for every conversion.
pub const JPEG_QUALITY: u8 = 95;

/// zlib-style compression level (0-9) for PNG output.
pub const PNG_COMPRESSION_LEVEL: u8 = 6;

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub jpeg_quality: u8,
    /// Progressive JPEG with optimized Huffman tables.
    pub progressive: bool,
    pub png_compression: u8,
    /// Run an oxipng pass over PNG output.
    pub optimize: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: JPEG_QUALITY,
            progressive: true,
            png_compression: PNG_COMPRESSION_LEVEL,
            optimize: true,
        }
    }
}

/// Encode a normalized image into the target container.
///
/// The image must already be in a mode the target accepts; JPEG output
/// rejects anything but RGB.
pub fn encode(
    image: &Image,
    target: TargetFormat,
    options: &EncodeOptions,
) -> Result<Vec<u8>, ConvertError> {
    match target {
        TargetFormat::Jpeg => encode_jpeg(image, options),
        TargetFormat::Png => {
            let png_bytes = encode_png(image, options)?;
            if options.optimize {
                Ok(optimize_png(png_bytes))
            } else {
                Ok(png_bytes)
            }
        }
    }
}

fn encode_jpeg(image: &Image, options: &EncodeOptions) -> Result<Vec<u8>, ConvertError> {
    let PixelData::Rgb(rgb) = image.pixels() else {
        return Err(ConvertError::Encode(format!(
            "JPEG output requires RGB pixels, got {}",
            image.mode()
        )));
    };
    let (width, height) = jpeg_dimensions(image.width(), image.height())?;

    let mut out = Vec::new();
    let mut encoder = jpeg_encoder::Encoder::new(&mut out, options.jpeg_quality);
    encoder.set_progressive(options.progressive);
    encoder.set_optimized_huffman_tables(options.progressive);
    encoder
        .encode(rgb, width, height, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| ConvertError::Encode(format!("JPEG: {e}")))?;
    Ok(out)
}

/// JPEG frame headers store dimensions as 16-bit values.
fn jpeg_dimensions(width: u32, height: u32) -> Result<(u16, u16), ConvertError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ConvertError::Encode(format!(
            "JPEG: {width}x{height} exceeds the 65535 pixel limit"
        ))),
    }
}

fn encode_png(image: &Image, options: &EncodeOptions) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png_compression(options.png_compression));
        match image.pixels() {
            PixelData::Gray(_) => encoder.set_color(png::ColorType::Grayscale),
            PixelData::GrayAlpha(_) => encoder.set_color(png::ColorType::GrayscaleAlpha),
            PixelData::Rgb(_) => encoder.set_color(png::ColorType::Rgb),
            PixelData::Rgba(_) => encoder.set_color(png::ColorType::Rgba),
            PixelData::Indexed { palette, .. } => {
                encoder.set_color(png::ColorType::Indexed);
                encoder.set_palette(palette.to_rgb_bytes());
                if let Some(alpha) = palette.alpha_table() {
                    encoder.set_trns(alpha.to_vec());
                }
            }
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ConvertError::Encode(format!("PNG: {e}")))?;
        writer
            .write_image_data(image.pixels().as_bytes())
            .map_err(|e| ConvertError::Encode(format!("PNG: {e}")))?;
        writer
            .finish()
            .map_err(|e| ConvertError::Encode(format!("PNG: {e}")))?;
    }
    Ok(buf.into_inner())
}

/// Map a 0-9 level onto the presets the `png` crate offers.
fn png_compression(level: u8) -> png::Compression {
    match level {
        0..=2 => png::Compression::Fast,
        3..=6 => png::Compression::Default,
        _ => png::Compression::Best,
    }
}

/// Re-compress with oxipng, keeping color type, bit depth and palette order
/// so the stored mode is exactly what was encoded.
fn optimize_png(png_bytes: Vec<u8>) -> Vec<u8> {
    let options = oxipng::Options {
        strip: oxipng::StripChunks::Safe,
        optimize_alpha: false,
        bit_depth_reduction: false,
        color_type_reduction: false,
        palette_reduction: false,
        grayscale_reduction: false,
        ..Default::default()
    };
    match oxipng::optimize_from_memory(&png_bytes, &options) {
        Ok(optimized) if optimized.len() < png_bytes.len() => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Optimized PNG"
            );
            optimized
        }
        Ok(_) => png_bytes,
        Err(e) => {
            tracing::warn!(%e, "PNG optimization failed, keeping unoptimized output");
            png_bytes
        }
    }
}
