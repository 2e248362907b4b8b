use serde::Serialize;
use utoipa::ToSchema;

use crate::codec::HeaderInfo;

/// Summary of an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ImageInfo {
    /// Container format ("PNG" or "JPEG")
    pub format: String,
    /// Pixel mode ("L", "LA", "P", "RGB", "RGBA")
    pub mode: String,
    pub width: u32,
    pub height: u32,
    /// Whether the image can contain non-opaque pixels
    pub has_transparency: bool,
    /// Encoded size in bytes
    pub size_bytes: usize,
}

impl ImageInfo {
    pub fn from_header(header: &HeaderInfo, size_bytes: usize) -> Self {
        Self {
            format: header.format.name().to_string(),
            mode: header.mode.to_string(),
            width: header.width,
            height: header.height,
            has_transparency: header.has_transparency,
            size_bytes,
        }
    }
}

/// A target format token accepted by the convert endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormatInfo {
    /// Token to pass as `format`
    pub token: String,
    /// Extension used for the converted file
    pub extension: String,
    pub mime_type: String,
}
