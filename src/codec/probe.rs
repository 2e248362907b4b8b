//! Header-only inspection.
//!
//! Reads just enough of a file to report its container, dimensions and pixel
//! mode. Used for the same-format passthrough, for `inspect`, and to verify
//! freshly encoded output.

use image::ImageDecoder;
use mode_normalize::{PixelMode, TargetFormat};
use std::io::Cursor;

use super::sniff::sniff_container;
use crate::error::ConvertError;

/// What a file header says about the image inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderInfo {
    pub format: TargetFormat,
    pub width: u32,
    pub height: u32,
    pub mode: PixelMode,
    pub has_transparency: bool,
}

/// Parse the header of a PNG or JPEG file.
pub fn probe(bytes: &[u8]) -> Result<HeaderInfo, ConvertError> {
    match sniff_container(bytes) {
        Some(TargetFormat::Png) => probe_png(bytes),
        Some(TargetFormat::Jpeg) => probe_jpeg(bytes),
        None => Err(ConvertError::Decode(
            "unrecognized image data (expected PNG or JPEG)".to_string(),
        )),
    }
}

fn probe_png(bytes: &[u8]) -> Result<HeaderInfo, ConvertError> {
    let reader = png::Decoder::new(Cursor::new(bytes))
        .read_info()
        .map_err(|e| ConvertError::Decode(format!("PNG: {e}")))?;
    let info = reader.info();

    let (mode, has_transparency) = match info.color_type {
        png::ColorType::Grayscale => (PixelMode::Gray, false),
        png::ColorType::GrayscaleAlpha => (PixelMode::GrayAlpha, true),
        png::ColorType::Indexed => (PixelMode::Indexed, info.trns.is_some()),
        png::ColorType::Rgb => (PixelMode::Rgb, false),
        png::ColorType::Rgba => (PixelMode::Rgba, true),
    };

    Ok(HeaderInfo {
        format: TargetFormat::Png,
        width: info.width,
        height: info.height,
        mode,
        has_transparency,
    })
}

fn probe_jpeg(bytes: &[u8]) -> Result<HeaderInfo, ConvertError> {
    let decoder = image::codecs::jpeg::JpegDecoder::new(Cursor::new(bytes))
        .map_err(|e| ConvertError::Decode(format!("JPEG: {e}")))?;
    let (width, height) = decoder.dimensions();
    let mode = match decoder.color_type() {
        image::ColorType::L8 | image::ColorType::L16 => PixelMode::Gray,
        _ => PixelMode::Rgb,
    };

    Ok(HeaderInfo {
        format: TargetFormat::Jpeg,
        width,
        height,
        mode,
        has_transparency: false,
    })
}
