//! The conversion pipeline: decode, normalize, encode.
//!
//! Each call works on its own request value and returns a fresh result; the
//! service holds only immutable encoder settings and can be shared freely
//! between threads.

use mode_normalize::{normalize, PixelMode, TargetFormat};
use std::io::Write;
use std::path::Path;

use crate::codec::{self, EncodeOptions};
use crate::error::ConvertError;
use crate::models::{AppConfig, ImageInfo};
use crate::services::ConvertedFile;

/// A single conversion request.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Encoded source image (PNG or JPEG)
    pub source: Vec<u8>,
    pub target: TargetFormat,
}

impl ConversionRequest {
    pub fn new(source: Vec<u8>, target: TargetFormat) -> Self {
        Self { source, target }
    }

    /// Build a request from a user-supplied format token.
    pub fn parse(source: Vec<u8>, target: &str) -> Result<Self, ConvertError> {
        Ok(Self::new(source, target.parse()?))
    }
}

/// Output of a successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertedImage {
    /// Encoded bytes in the target container
    pub bytes: Vec<u8>,
    pub source_format: TargetFormat,
    pub target: TargetFormat,
    pub width: u32,
    pub height: u32,
    /// Pixel mode stored in the output
    pub mode: PixelMode,
    /// True when the source bytes were returned unchanged
    pub passthrough: bool,
}

impl ConvertedImage {
    pub fn content_type(&self) -> &'static str {
        self.target.mime_type()
    }

    /// Download name derived from the uploaded file name:
    /// `photo.png` becomes `photo_converted.jpg`.
    pub fn download_name(&self, original: Option<&str>) -> String {
        download_name(original, self.target)
    }
}

/// `<stem>_converted.<ext>`, with the stem reduced to filename-safe characters.
pub fn download_name(original: Option<&str>, target: TargetFormat) -> String {
    let stem: String = original
        .and_then(|name| Path::new(name).file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("")
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.trim_matches(['_', '.']).is_empty() {
        "image"
    } else {
        stem.as_str()
    };
    format!("{stem}_converted.{}", target.extension())
}

/// Stateless image converter.
#[derive(Debug, Clone, Default)]
pub struct ConversionService {
    options: EncodeOptions,
}

impl ConversionService {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(EncodeOptions {
            optimize: config.optimize_png,
            ..Default::default()
        })
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Convert an encoded image to the requested container.
    ///
    /// When the source is already in the target container the original
    /// bytes are returned verbatim without decoding the pixels.
    pub fn convert(&self, request: ConversionRequest) -> Result<ConvertedImage, ConvertError> {
        let header = codec::probe(&request.source)?;
        tracing::info!(
            format = %header.format,
            mode = %header.mode,
            width = header.width,
            height = header.height,
            target_format = %request.target,
            "Converting image"
        );

        if header.format == request.target {
            tracing::info!(
                size_bytes = request.source.len(),
                "Source already in target format, reusing original bytes"
            );
            return Ok(ConvertedImage {
                bytes: request.source,
                source_format: header.format,
                target: request.target,
                width: header.width,
                height: header.height,
                mode: header.mode,
                passthrough: true,
            });
        }

        if header.has_transparency && !request.target.supports_alpha() {
            tracing::debug!(
                target_format = %request.target,
                "Target has no alpha channel, compositing over white"
            );
        }

        let image = codec::decode(&request.source)?;
        let normalized = normalize(image, request.target);
        tracing::debug!(mode = %normalized.mode(), "Normalized pixel mode");

        let bytes = codec::encode(&normalized, request.target, &self.options)?;

        // Read the header back to catch encoder output we cannot open again
        let written = codec::probe(&bytes)
            .map_err(|e| ConvertError::Encode(format!("output failed verification: {e}")))?;
        tracing::info!(
            format = %written.format,
            mode = %written.mode,
            size_bytes = bytes.len(),
            "Image converted"
        );

        Ok(ConvertedImage {
            bytes,
            source_format: header.format,
            target: request.target,
            width: written.width,
            height: written.height,
            mode: written.mode,
            passthrough: false,
        })
    }

    /// Report format, mode and dimensions without decoding pixels.
    pub fn inspect(&self, bytes: &[u8]) -> Result<ImageInfo, ConvertError> {
        let header = codec::probe(bytes)?;
        Ok(ImageInfo::from_header(&header, bytes.len()))
    }

    /// Convert a file on disk into a temporary output file.
    ///
    /// The output is removed when the returned [`ConvertedFile`] is dropped
    /// unless it is persisted first.
    pub fn convert_file(
        &self,
        input: &Path,
        target: TargetFormat,
    ) -> Result<ConvertedFile, ConvertError> {
        let source = std::fs::read(input)?;
        if let Some(claimed) = codec::format_from_extension(input) {
            if codec::sniff_container(&source).is_some_and(|actual| actual != claimed) {
                tracing::warn!(
                    path = %input.display(),
                    "File extension does not match its contents"
                );
            }
        }

        let converted = self.convert(ConversionRequest::new(source, target))?;

        let mut file = tempfile::Builder::new()
            .prefix("imgconv-")
            .suffix(&format!(".{}", target.extension()))
            .tempfile()?;
        file.write_all(&converted.bytes)?;
        file.flush()?;

        Ok(ConvertedFile::new(file, converted))
    }
}
