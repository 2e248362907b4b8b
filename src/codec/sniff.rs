use mode_normalize::TargetFormat;
use std::path::Path;

const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";
const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Identify the container format from the leading bytes.
pub fn sniff_container(bytes: &[u8]) -> Option<TargetFormat> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        Some(TargetFormat::Png)
    } else if bytes.starts_with(&JPEG_SOI) {
        Some(TargetFormat::Jpeg)
    } else {
        None
    }
}

/// Container format implied by a file extension (`.png`, `.jpg`, `.jpeg`).
pub fn format_from_extension(path: &Path) -> Option<TargetFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
}
