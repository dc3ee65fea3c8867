//! Server-specific error types

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use datfeed_ingest::upstream::{QueryError, UpstreamError};
use datfeed_ingest::IngestError;

use crate::api::response::ErrorResponse;

/// Message shown to callers whenever the ledger cannot be reached
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str =
    "Upstream sales ledger unavailable; check that the upstream service is running and reachable";

/// Result type alias for handlers
pub type AppResult<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{UPSTREAM_UNAVAILABLE_MESSAGE}")]
    UpstreamUnavailable { details: serde_json::Value },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn upstream(err: &UpstreamError) -> Self {
        Self::UpstreamUnavailable {
            details: json!({
                "status": err.status(),
                "message": err.to_string(),
            }),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let body = match self {
            AppError::Validation(message)
            | AppError::BadRequest(message)
            | AppError::PayloadTooLarge(message) => {
                tracing::debug!(code, "Rejected request: {}", message);
                ErrorResponse::new(code, message)
            },
            AppError::UpstreamUnavailable { details } => {
                tracing::warn!(%details, "Upstream ledger unavailable");
                ErrorResponse::with_details(code, UPSTREAM_UNAVAILABLE_MESSAGE, details)
            },
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                ErrorResponse::new(code, "An internal error occurred")
            },
        };

        body.into_response_with(status)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid query parameters: {}", rejection.body_text()))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
        } else {
            AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::upstream(&err)
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Upstream(e) => AppError::upstream(&e),
            other => AppError::Validation(other.to_string()),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::Internal(err.to_string())
    }
}
