//! WebSocket event names and the broadcast helper.
//!
//! Every message pushed to dashboard clients is a JSON object of the
//! form `{ "type": <event>, "data": <payload> }`.

use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast;

// -- Event name constants --

pub const CONNECTED: &str = "connected";
pub const NOTIFICATION_SHOW: &str = "notification_show";
pub const NOTIFICATION_REMOVE: &str = "notification_remove";
pub const NOTIFICATION_SNAPSHOT: &str = "notification_snapshot";
pub const DETECTION_STATUS: &str = "detection_status";
pub const CAPTURE_UPDATED: &str = "capture_updated";
pub const HISTORY_UPDATED: &str = "history_updated";
pub const SETTINGS_UPDATED: &str = "settings_updated";
pub const VIDEOS_UPDATED: &str = "videos_updated";
pub const PONG: &str = "pong";

/// Serialize `data` under `event` and send it to every connected client.
pub fn broadcast(ws_tx: &broadcast::Sender<String>, event: &str, data: impl Serialize) {
    let msg = json!({
        "type": event,
        "data": data,
    });
    let _ = ws_tx.send(msg.to_string());
}
