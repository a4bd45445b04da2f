//! Client library for the printer detection service.
//!
//! Provides a typed REST client for the detection appliance
//! (telemetry, captured frames, configuration blob, recorded videos)
//! and the lenient decoders for its string-encoded values.

pub mod api;
pub mod value;

/// Default port the detection service listens on.
pub const DEFAULT_DEVICE_PORT: u16 = 9010;

/// Unified error type for the detect-client crate.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Device API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Device returned an empty configuration")]
    EmptyConfig,
}
