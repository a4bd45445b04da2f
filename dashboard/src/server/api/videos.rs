//! Video API:
//!   GET    /api/videos         – list recorded videos
//!   GET    /api/videos/{name}  – download a video
//!   DELETE /api/videos/{name}  – delete a video, returns the new list

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use super::{ApiError, ApiResult, device_error, err_json};
use crate::app::SharedState;
use crate::services::videos::{self, VideoError};

fn map_error(e: VideoError) -> ApiError {
    match e {
        VideoError::InvalidName(_) => err_json(400, &e.to_string()),
        VideoError::Device(e) => device_error("Video request failed", &e),
    }
}

/// GET /api/videos
pub async fn list_videos(State(state): State<SharedState>) -> ApiResult<Json<Value>> {
    let list = videos::list_videos(&state).await.map_err(map_error)?;
    Ok(Json(json!({ "videos": list })))
}

/// GET /api/videos/{name}
pub async fn download_video(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let bytes = videos::download_video(&state, &name)
        .await
        .map_err(map_error)?;
    let disposition = format!("attachment; filename=\"{}\"", name.replace('"', "_"));
    Ok((
        [
            (header::CONTENT_TYPE, "video/mp4".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// DELETE /api/videos/{name}
pub async fn delete_video(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    let list = videos::delete_video(&state, &name)
        .await
        .map_err(map_error)?;
    tracing::info!(name = %name, "Video deleted");
    Ok(Json(json!({ "videos": list })))
}
