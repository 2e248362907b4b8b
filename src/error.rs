use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mode_normalize::UnsupportedFormatError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable error kind reported alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MissingParameter(_) => "MissingParameter",
            ApiError::InvalidBody { .. } => "InvalidBody",
            ApiError::Convert(e) => e.kind(),
            ApiError::Internal(_) => "Internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::Convert(ConvertError::Decode(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Convert(ConvertError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            ApiError::Convert(ConvertError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Convert(ConvertError::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure of a single conversion request. Never retried.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{0}")]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::Decode(_) => "DecodeError",
            ConvertError::UnsupportedFormat(_) => "UnsupportedFormatError",
            ConvertError::Encode(_) => "EncodeError",
            ConvertError::Io(_) => "IoError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            tracing::info!(kind = self.kind(), error = %self, "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "kind": self.kind(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
