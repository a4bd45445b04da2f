//! Recorded video management on the device.

use detect_client::DetectError;

use crate::app::SharedState;
use crate::events;

#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("invalid video name: {0:?}")]
    InvalidName(String),

    #[error(transparent)]
    Device(#[from] DetectError),
}

/// Reject names that could not have come from the device listing.
pub fn validate_video_name(name: &str) -> Result<(), VideoError> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
        || name.chars().any(char::is_control);
    if bad {
        return Err(VideoError::InvalidName(name.to_string()));
    }
    Ok(())
}

pub async fn list_videos(state: &SharedState) -> Result<Vec<String>, VideoError> {
    let videos = state.client().list_videos().await?;
    tracing::debug!(count = videos.len(), "Video list fetched");
    Ok(videos)
}

pub async fn download_video(state: &SharedState, name: &str) -> Result<Vec<u8>, VideoError> {
    validate_video_name(name)?;
    Ok(state.client().download_video(name).await?)
}

/// Delete a video and return the refreshed listing.
pub async fn delete_video(state: &SharedState, name: &str) -> Result<Vec<String>, VideoError> {
    validate_video_name(name)?;
    state.client().delete_video(name).await?;

    let videos = list_videos(state).await?;
    events::broadcast(state.ws_sender(), events::VIDEOS_UPDATED, &videos);
    Ok(videos)
}
