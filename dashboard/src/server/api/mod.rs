//! REST API handlers grouped by domain.

pub mod frames;
pub mod settings;
pub mod status;
pub mod videos;

use axum::Json;
use axum::http::StatusCode;
use detect_client::DetectError;
use serde_json::{Value, json};

pub type ApiError = (StatusCode, Json<Value>);
pub type ApiResult<T> = Result<T, ApiError>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> ApiError {
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(json!({ "status": "error", "error": message })),
    )
}

/// The device could not be reached or rejected the request.
pub fn device_error(context: &str, e: &DetectError) -> ApiError {
    tracing::warn!("{context}: {e}");
    err_json(502, &format!("{context}: {e}"))
}
