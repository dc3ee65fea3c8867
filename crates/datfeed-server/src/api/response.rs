//! API response types
//!
//! Every failure leaves the server as the same flat envelope:
//!
//! ```json
//! { "success": false, "error": "...", "code": "VALIDATION_ERROR", "details": { ... } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create an error response with details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            details: Some(details),
            ..Self::new(code, message)
        }
    }

    /// Pair the envelope with a status code
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_is_flat() {
        let value = serde_json::to_value(ErrorResponse::new("VALIDATION_ERROR", "bad file")).unwrap();
        assert_eq!(
            value,
            json!({ "success": false, "error": "bad file", "code": "VALIDATION_ERROR" })
        );
    }

    #[test]
    fn test_error_response_with_details() {
        let response = ErrorResponse::with_details("UPSTREAM_UNAVAILABLE", "down", json!({"status": 503}));
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(value["details"]["status"], 503);
        assert_eq!(value["success"], false);
    }
}
