//! One detection poll and the fetches it triggers.

use std::collections::{BTreeMap, HashMap};

use detect_client::DetectError;
use detect_client::api::{HistoryKind, VersionInfo};
use tokio::time::Instant;

use crate::app::SharedState;
use crate::events;
use crate::notification::types::category;

/// Poll `/detection_res` once and act on the result.
///
/// Errors are logged; the poll loop keeps running regardless.
pub async fn poll_once(state: &SharedState) {
    match state.client().get_detection_result().await {
        Ok(result) => {
            let idle_capture = state.config().idle_capture;
            let outcome = state
                .status_mut()
                .await
                .apply(&result, Instant::now(), idle_capture);

            for alert in &outcome.alerts {
                state.notifications().add(alert.message, alert.category);
            }

            if outcome.refresh_history {
                refresh_history(state).await;
            }
            if outcome.refresh_capture {
                refresh_capture(state).await;
            }
        }
        Err(DetectError::ApiError { status, .. }) => {
            state.status_mut().await.mark_disconnected();
            tracing::error!(status, "Detection request failed");
        }
        Err(e) => {
            tracing::error!("Detection request error: {e}");
        }
    }

    let snapshot = state.status().await.snapshot();
    events::broadcast(state.ws_sender(), events::DETECTION_STATUS, snapshot);
}

/// Replace all history frame sets, or none if any kind fails to load.
pub async fn refresh_history(state: &SharedState) {
    let client = state.client();
    let (noodle, has_pei, foreign) = tokio::join!(
        client.get_history_frames(HistoryKind::Noodle),
        client.get_history_frames(HistoryKind::HasPei),
        client.get_history_frames(HistoryKind::Foreign),
    );

    let (noodle, has_pei, foreign) = match (noodle, has_pei, foreign) {
        (Ok(n), Ok(p), Ok(f)) => (n, p, f),
        (n, p, f) => {
            let errors: Vec<String> = [n.err(), p.err(), f.err()]
                .into_iter()
                .flatten()
                .map(|e| e.to_string())
                .collect();
            tracing::error!(?errors, "Failed to fetch history frames");
            return;
        }
    };

    let counts = BTreeMap::from([
        (HistoryKind::Noodle.as_str(), noodle.len()),
        (HistoryKind::HasPei.as_str(), has_pei.len()),
        (HistoryKind::Foreign.as_str(), foreign.len()),
    ]);

    let history = HashMap::from([
        (HistoryKind::Noodle, noodle),
        (HistoryKind::HasPei, has_pei),
        (HistoryKind::Foreign, foreign),
    ]);
    state.status_mut().await.set_history(history);

    events::broadcast(state.ws_sender(), events::HISTORY_UPDATED, counts);
}

/// Fetch the latest camera frame.
pub async fn refresh_capture(state: &SharedState) {
    match state.client().capture().await {
        Ok(frame) => {
            let score = frame.detection_score;
            state.status_mut().await.record_capture(frame);
            events::broadcast(
                state.ws_sender(),
                events::CAPTURE_UPDATED,
                serde_json::json!({ "score": score }),
            );
        }
        Err(e) => {
            let mut status = state.status_mut().await;
            status.record_capture_error(&e.to_string(), Instant::now());
            tracing::warn!(
                error = status.capture_error().unwrap_or_default(),
                "Capture refresh failed"
            );
        }
    }
}

/// Fetch the firmware version and announce the result as a notification.
pub async fn announce_version(state: &SharedState) -> Result<VersionInfo, DetectError> {
    let result = state.client().get_version().await;
    let notifications = state.notifications();

    match &result {
        Ok(info) => {
            notifications.add(format!("Software version: {}", info.sw_version), category::VERSION);
        }
        Err(DetectError::ApiError { status, .. }) => {
            notifications.add(
                format!("Failed to get version, status {status}"),
                category::ERROR,
            );
        }
        Err(e) => {
            notifications.add(format!("Failed to get version: {e}"), category::ERROR);
        }
    }

    result
}
