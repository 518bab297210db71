//! HTTP error mapping for the API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors a handler surfaces to the HTTP client.
///
/// Degradable extraction failures never reach this type — handlers convert
/// them into a 200 with the canonical default record. What remains is client
/// misuse (400) and configuration or internal faults (500).
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400): wrong upload type, oversized payload, empty input.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500): missing credentials and other faults the
    /// client cannot fix.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
