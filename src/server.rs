//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Query, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::error::ApiError;
use crate::models::{AppConfig, ImageInfo};
use crate::services::ConversionService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<ConversionService>,
    pub config: Arc<AppConfig>,
}

/// Create application state from configuration.
pub fn create_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    if config.max_upload_bytes == 0 {
        anyhow::bail!("max_upload_bytes must be greater than zero");
    }
    let converter = Arc::new(ConversionService::from_config(&config));

    Ok(AppState {
        converter,
        config: Arc::new(config),
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// Responses carry `Cache-Control: no-store` since every conversion result
/// is specific to the uploaded body.
pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(api::handle_index))
        .route("/api/convert", post(handle_convert))
        .route("/api/inspect", post(handle_inspect))
        .route("/api/formats", get(api::handle_formats))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_convert(
    State(state): State<AppState>,
    query: Query<api::ConvertQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    api::handle_convert(State(state.converter), query, body).await
}

async fn handle_inspect(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ImageInfo>, ApiError> {
    api::handle_inspect(State(state.converter), body).await
}
