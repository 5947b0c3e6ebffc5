//! Unified error response handling for the HTTP host
//!
//! Handlers return `Err` for failures they do not answer themselves
//! (malformed bodies, storage failures). This module turns those into JSON
//! responses with the request ID attached and the CORS origin header set,
//! so browsers can read the failure.

use crate::service::headers::{cors, ACCESS_CONTROL_ALLOW_ORIGIN, X_REQUEST_ID};
use crate::Error;
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Standard error response format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Unique error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Request ID for correlation
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// Add request ID for correlation
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Convert to HTTP response with proper headers
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        let request_id = self.request_id.clone();
        let mut response = (status, Json(self)).into_response();

        response.headers_mut().insert(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(cors::ALLOW_ANY_ORIGIN),
        );
        if let Some(id) = request_id {
            if let Ok(header_value) = HeaderValue::from_str(&id) {
                response.headers_mut().insert(X_REQUEST_ID, header_value);
            }
        }

        response
    }
}

/// Extension trait for consistent error formatting
pub trait ErrorResponseExt {
    /// Convert to standardized error response
    fn to_error_response(&self) -> ErrorResponse;

    /// Get the appropriate HTTP status code
    fn status_code(&self) -> StatusCode;
}

impl ErrorResponseExt for Error {
    fn to_error_response(&self) -> ErrorResponse {
        use Error::*;

        match self {
            Serialization(e) => {
                ErrorResponse::new("INVALID_BODY", format!("Invalid request body: {e}"))
            }
            InvalidInput { field } => {
                ErrorResponse::new("INVALID_INPUT", format!("Invalid value for {field}"))
            }
            InvalidGatewayEvent(msg) => ErrorResponse::new("INVALID_REQUEST", msg.clone()),
            // Driver messages can carry connection details; keep them in the logs.
            Database(_) | Migration(_) => {
                ErrorResponse::new("STORAGE_ERROR", "Storage operation failed")
            }
            Config(_) | Io(_) | Application { .. } => {
                ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Helper to extract request ID from headers
pub fn extract_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_creation() {
        let error = ErrorResponse::new("TEST_ERROR", "Test error message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test error message");
        assert!(error.request_id.is_none());
    }

    #[test]
    fn test_error_response_with_request_id() {
        let error = ErrorResponse::new("TEST_ERROR", "Test error").with_request_id("req-123");
        assert_eq!(error.request_id, Some("req-123".to_string()));
    }

    #[test]
    fn test_malformed_body_maps_to_bad_request() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = Error::from(parse_error);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_error_response().code, "INVALID_BODY");
    }

    #[test]
    fn test_storage_error_hides_driver_message() {
        let error = Error::Database(sqlx::Error::PoolTimedOut);
        let response = error.to_error_response();
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.code, "STORAGE_ERROR");
        assert_eq!(response.message, "Storage operation failed");
    }

    #[test]
    fn test_response_carries_cors_and_request_id() {
        let response = ErrorResponse::new("INTERNAL_ERROR", "Internal server error")
            .with_request_id("req-123")
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        assert_eq!(response.headers().get(X_REQUEST_ID).unwrap(), "req-123");
    }

    #[test]
    fn test_extract_request_id() {
        let mut headers = HeaderMap::new();
        assert!(extract_request_id(&headers).is_none());
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(extract_request_id(&headers).as_deref(), Some("abc"));
    }
}
