//! API error types with JSON responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use peeker_upstream::{UpstreamError, UpstreamErrorKind};
use serde::Serialize;

/// API error that can be returned from handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Upstream failure, classified by kind.
    #[error("{0}")]
    Upstream(#[from] UpstreamError),
}

impl ApiError {
    /// Get the error code string for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Upstream(e) => match e.kind() {
                UpstreamErrorKind::NotFound => "NOT_FOUND",
                UpstreamErrorKind::Unreachable => "UPSTREAM_UNREACHABLE",
                UpstreamErrorKind::Protocol => "UPSTREAM_PROTOCOL_ERROR",
                UpstreamErrorKind::InvalidInput => "BAD_REQUEST",
                UpstreamErrorKind::Config => "INTERNAL_ERROR",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(e) => match e.kind() {
                UpstreamErrorKind::NotFound => StatusCode::NOT_FOUND,
                UpstreamErrorKind::Unreachable | UpstreamErrorKind::Protocol => {
                    StatusCode::BAD_GATEWAY
                }
                UpstreamErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                UpstreamErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    /// Error code (e.g., "NOT_FOUND", "UPSTREAM_UNREACHABLE").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        } else {
            tracing::warn!(code, error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
