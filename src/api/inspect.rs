use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Json,
};
use mode_normalize::TargetFormat;
use std::sync::Arc;

use super::convert::require_body;
use crate::error::ApiError;
use crate::models::{FormatInfo, ImageInfo};
use crate::services::ConversionService;

/// Describe an uploaded image
///
/// Reads only the file header; pixel data is not decoded.
#[utoipa::path(
    post,
    path = "/api/inspect",
    request_body(content = Vec<u8>, description = "PNG or JPEG file", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image summary", body = ImageInfo),
        (status = 422, description = "Body is not a readable PNG or JPEG"),
    ),
    tag = "Conversion"
)]
pub async fn handle_inspect(
    State(converter): State<Arc<ConversionService>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ImageInfo>, ApiError> {
    let body = require_body(body)?;
    let info = converter.inspect(&body)?;
    tracing::info!(
        format = %info.format,
        mode = %info.mode,
        width = info.width,
        height = info.height,
        "Inspect request handled"
    );
    Ok(Json(info))
}

/// List accepted target formats
#[utoipa::path(
    get,
    path = "/api/formats",
    responses(
        (status = 200, description = "Accepted format tokens", body = Vec<FormatInfo>),
    ),
    tag = "Conversion"
)]
pub async fn handle_formats() -> Json<Vec<FormatInfo>> {
    let formats = TargetFormat::TOKENS
        .iter()
        .filter_map(|token| token.parse::<TargetFormat>().ok().map(|f| (token, f)))
        .map(|(token, format)| FormatInfo {
            token: token.to_string(),
            extension: format.extension().to_string(),
            mime_type: format.mime_type().to_string(),
        })
        .collect();
    Json(formats)
}
