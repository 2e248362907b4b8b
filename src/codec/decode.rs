use image::GenericImageView;
use mode_normalize::{Image, Palette, PixelData, TargetFormat};
use std::io::Cursor;

use super::sniff::sniff_container;
use crate::error::ConvertError;

/// Decode PNG or JPEG bytes into an [`Image`] in its native pixel mode.
///
/// Only the first frame of an animated PNG is read.
pub fn decode(bytes: &[u8]) -> Result<Image, ConvertError> {
    match sniff_container(bytes) {
        Some(TargetFormat::Png) => decode_png(bytes),
        Some(TargetFormat::Jpeg) => decode_jpeg(bytes),
        None => Err(ConvertError::Decode(
            "unrecognized image data (expected PNG or JPEG)".to_string(),
        )),
    }
}

fn map_png_error(err: png::DecodingError) -> ConvertError {
    ConvertError::Decode(format!("PNG: {err}"))
}

fn decode_png(bytes: &[u8]) -> Result<Image, ConvertError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    // Keep palettes as indices; only reduce 16-bit samples to 8 bits.
    decoder.set_transformations(png::Transformations::STRIP_16);

    let mut reader = decoder.read_info().map_err(map_png_error)?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).map_err(map_png_error)?;
    buf.truncate(frame.buffer_size());

    let bits = match frame.bit_depth {
        png::BitDepth::One => 1,
        png::BitDepth::Two => 2,
        png::BitDepth::Four => 4,
        png::BitDepth::Eight => 8,
        png::BitDepth::Sixteen => {
            return Err(ConvertError::Decode(
                "PNG: 16-bit samples were not reduced".to_string(),
            ))
        }
    };

    let pixels = match frame.color_type {
        png::ColorType::Grayscale => {
            let levels = unpack_rows(buf, frame.width, frame.line_size, bits);
            PixelData::Gray(scale_to_8bit(levels, bits))
        }
        png::ColorType::GrayscaleAlpha => PixelData::GrayAlpha(buf),
        png::ColorType::Rgb => PixelData::Rgb(buf),
        png::ColorType::Rgba => PixelData::Rgba(buf),
        png::ColorType::Indexed => {
            let info = reader.info();
            let plte = info.palette.as_deref().ok_or_else(|| {
                ConvertError::Decode("PNG: indexed image without PLTE chunk".to_string())
            })?;
            let palette = Palette::from_rgb_bytes(plte, info.trns.as_deref());
            PixelData::Indexed {
                indices: unpack_rows(buf, frame.width, frame.line_size, bits),
                palette,
            }
        }
    };

    Image::new(frame.width, frame.height, pixels)
        .map_err(|e| ConvertError::Decode(format!("PNG: {e}")))
}

fn decode_jpeg(bytes: &[u8]) -> Result<Image, ConvertError> {
    let dynamic = image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
        .map_err(|e| ConvertError::Decode(format!("JPEG: {e}")))?;
    let (width, height) = dynamic.dimensions();

    let pixels = match dynamic {
        image::DynamicImage::ImageLuma8(gray) => PixelData::Gray(gray.into_raw()),
        other => PixelData::Rgb(other.into_rgb8().into_raw()),
    };

    Image::new(width, height, pixels).map_err(|e| ConvertError::Decode(format!("JPEG: {e}")))
}

/// Unpack 1/2/4-bit PNG rows into one byte per pixel, dropping row padding.
fn unpack_rows(buf: Vec<u8>, width: u32, line_size: usize, bits: u8) -> Vec<u8> {
    if bits == 8 {
        return buf;
    }
    let width = width as usize;
    let pixels_per_byte = 8 / bits as usize;
    let mask = (1u8 << bits) - 1;
    let rows = buf.len() / line_size;
    let mut out = Vec::with_capacity(width * rows);

    for row in buf.chunks_exact(line_size) {
        for x in 0..width {
            let byte = row[x / pixels_per_byte];
            let shift = (8 - bits) - (x % pixels_per_byte) as u8 * bits;
            out.push((byte >> shift) & mask);
        }
    }

    out
}

/// Stretch low-bit grayscale levels to the full 0..=255 range.
fn scale_to_8bit(mut levels: Vec<u8>, bits: u8) -> Vec<u8> {
    if bits < 8 {
        let step = 255 / ((1u8 << bits) - 1);
        for v in &mut levels {
            *v *= step;
        }
    }
    levels
}
