use axum::{Router, routing::get, routing::post};
use tower_http::cors::CorsLayer;

use super::{api, websocket};
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/ws", get(websocket::ws_handler))
        // --- Detection ---
        .route("/api/status", get(api::status::get_status))
        .route("/api/notifications", get(api::status::get_notifications))
        .route("/api/version", post(api::status::check_version))
        // --- Frames ---
        .route("/api/capture", get(api::frames::get_capture))
        .route("/api/history/{kind}", get(api::frames::get_history))
        .route("/api/history/{kind}/{index}", get(api::frames::get_history_frame))
        // --- Settings ---
        .route("/api/settings", get(api::settings::get_settings).put(api::settings::update_settings))
        // --- Videos ---
        .route("/api/videos", get(api::videos::list_videos))
        .route("/api/videos/{name}", get(api::videos::download_video).delete(api::videos::delete_video))
        // --- Middleware ---
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
