//! Frame API:
//!   GET /api/capture                   – latest capture as JPEG
//!   GET /api/history/{kind}            – number of stored frames
//!   GET /api/history/{kind}/{index}    – one stored frame as JPEG

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use detect_client::api::HistoryKind;
use serde_json::{Value, json};

use super::{ApiResult, err_json};
use crate::app::SharedState;
use crate::services::frames::decode_jpeg;

fn jpeg_response(encoded: &str) -> ApiResult<Response> {
    let bytes = decode_jpeg(encoded).map_err(|e| err_json(502, &format!("Invalid frame data: {e}")))?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response())
}

fn parse_kind(kind: &str) -> ApiResult<HistoryKind> {
    HistoryKind::from_str_param(kind)
        .ok_or_else(|| err_json(400, &format!("Unknown history kind: {kind}")))
}

/// GET /api/capture
pub async fn get_capture(State(state): State<SharedState>) -> ApiResult<Response> {
    let status = state.status().await;
    let Some(frame) = status.capture() else {
        let message = status.capture_error().unwrap_or("No capture yet");
        return Err(err_json(404, message));
    };
    jpeg_response(&frame.image)
}

/// GET /api/history/{kind}
pub async fn get_history(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Value>> {
    let kind = parse_kind(&kind)?;
    let count = state.status().await.history(kind).len();
    Ok(Json(json!({ "kind": kind, "count": count })))
}

/// GET /api/history/{kind}/{index}
pub async fn get_history_frame(
    State(state): State<SharedState>,
    Path((kind, index)): Path<(String, usize)>,
) -> ApiResult<Response> {
    let kind = parse_kind(&kind)?;
    let status = state.status().await;
    let frame = status
        .history(kind)
        .get(index)
        .ok_or_else(|| err_json(404, &format!("No {kind} frame at index {index}")))?;
    jpeg_response(&frame.image)
}
