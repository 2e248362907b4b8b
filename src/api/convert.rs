use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
};
use mode_normalize::TargetFormat;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::services::{download_name, ConversionRequest, ConversionService};

/// RFC 5987 `attr-char`: everything but alphanumerics and these marks is escaped.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

pub const X_IMAGE_WIDTH: HeaderName = HeaderName::from_static("x-image-width");
pub const X_IMAGE_HEIGHT: HeaderName = HeaderName::from_static("x-image-height");
pub const X_IMAGE_MODE: HeaderName = HeaderName::from_static("x-image-mode");
pub const X_CONVERSION_PASSTHROUGH: HeaderName =
    HeaderName::from_static("x-conversion-passthrough");

/// Query parameters for /api/convert
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    /// Target format token (JPG, JPEG or PNG)
    pub format: Option<String>,
    /// Original file name, used for the download name
    pub filename: Option<String>,
}

/// `Content-Disposition` for the converted download.
///
/// Header values are not UTF-8, so non-ASCII names get an ASCII `filename`
/// fallback plus an RFC 6266 `filename*` carrying the percent-encoded name.
pub fn content_disposition(original: Option<&str>, target: TargetFormat) -> String {
    let name = download_name(original, target);
    if name.is_ascii() {
        return format!("attachment; filename=\"{name}\"");
    }

    let ascii_original: Option<String> = original.map(|o| {
        o.chars()
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect()
    });
    let fallback = download_name(ascii_original.as_deref(), target);
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(&name, ATTR_CHAR)
    )
}

/// Unwrap the raw request body, mapping extractor failures (such as the
/// upload limit) onto the JSON error format.
pub(crate) fn require_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    let bytes = body.map_err(|rejection| ApiError::InvalidBody {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    if bytes.is_empty() {
        return Err(ApiError::InvalidBody {
            status: StatusCode::BAD_REQUEST,
            message: "request body is empty".to_string(),
        });
    }
    Ok(bytes)
}

/// Convert an uploaded image
///
/// The request body is the raw PNG or JPEG file. Transparency is composited
/// over white when converting to JPEG. If the upload is already in the
/// requested format it is returned unchanged.
#[utoipa::path(
    post,
    path = "/api/convert",
    request_body(content = Vec<u8>, description = "PNG or JPEG file", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Converted image", content_type = "image/jpeg",
            headers(
                ("X-Image-Width" = u32, description = "Output width in pixels"),
                ("X-Image-Height" = u32, description = "Output height in pixels"),
                ("X-Image-Mode" = String, description = "Output pixel mode"),
                ("X-Conversion-Passthrough" = bool, description = "Source bytes returned unchanged"),
            )
        ),
        (status = 400, description = "Missing or unsupported format"),
        (status = 413, description = "Upload too large"),
        (status = 422, description = "Body is not a readable PNG or JPEG"),
        (status = 500, description = "Encoding failed"),
    ),
    params(
        ("format" = String, Query, description = "Target format: JPG, JPEG or PNG (case-insensitive)"),
        ("filename" = Option<String>, Query, description = "Original file name (e.g., 'photo.png')"),
    ),
    tag = "Conversion"
)]
pub async fn handle_convert(
    State(converter): State<Arc<ConversionService>>,
    Query(query): Query<ConvertQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let format = query
        .format
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .ok_or(ApiError::MissingParameter("format"))?;
    let body = require_body(body)?;
    let request = ConversionRequest::parse(body.to_vec(), format)?;

    tracing::info!(
        target_format = %request.target,
        filename = query.filename.as_deref().unwrap_or("-"),
        size_bytes = body.len(),
        "Convert request received"
    );

    // Pixel work is CPU bound; keep it off the async workers
    let service = converter.clone();
    let converted = tokio::task::spawn_blocking(move || service.convert(request))
        .await
        .map_err(|e| ApiError::Internal(format!("Task error: {e}")))??;

    let disposition = content_disposition(query.filename.as_deref(), converted.target);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, converted.content_type().to_string()),
            (header::CONTENT_LENGTH, converted.bytes.len().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (X_IMAGE_WIDTH, converted.width.to_string()),
            (X_IMAGE_HEIGHT, converted.height.to_string()),
            (X_IMAGE_MODE, converted.mode.to_string()),
            (X_CONVERSION_PASSTHROUGH, converted.passthrough.to_string()),
        ],
        Bytes::from(converted.bytes),
    )
        .into_response())
}
