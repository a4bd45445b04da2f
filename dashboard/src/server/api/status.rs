//! Detection status API:
//!   GET  /api/status         – current status snapshot
//!   GET  /api/notifications  – visible notifications, oldest first
//!   POST /api/version        – query firmware version (also notifies)

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use super::{ApiResult, device_error};
use crate::app::SharedState;
use crate::services::detection;

/// GET /api/status
pub async fn get_status(State(state): State<SharedState>) -> Json<Value> {
    let snapshot = state.status().await.snapshot();
    Json(json!({
        "status": snapshot,
        "poll_in_flight": state.poll_in_flight(),
    }))
}

/// GET /api/notifications
pub async fn get_notifications(State(state): State<SharedState>) -> Json<Value> {
    let queue = state.notifications();
    Json(json!({
        "notifications": queue.snapshot(),
        "capacity": queue.capacity(),
        "ttl_ms": queue.ttl().as_millis() as u64,
    }))
}

/// POST /api/version
pub async fn check_version(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let info = detection::announce_version(&state)
        .await
        .map_err(|e| device_error("Failed to get version", &e))?;
    Ok(Json(json!({ "sw_version": info.sw_version })))
}
