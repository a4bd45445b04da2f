//! Where visible notifications are rendered.

use serde_json::json;
use tokio::sync::broadcast;

use crate::events;

use super::types::NotificationEntry;

/// Display region for notifications.
///
/// `show` is called once per entry when it is added and `remove` once
/// when it leaves the queue.
pub trait NotificationSurface: Send + Sync {
    fn show(&self, entry: &NotificationEntry);
    fn remove(&self, entry: &NotificationEntry);
}

/// Pushes notification changes to WebSocket clients.
pub struct BroadcastSurface {
    ws_tx: broadcast::Sender<String>,
}

impl BroadcastSurface {
    pub fn new(ws_tx: broadcast::Sender<String>) -> Self {
        Self { ws_tx }
    }
}

impl NotificationSurface for BroadcastSurface {
    fn show(&self, entry: &NotificationEntry) {
        let payload = json!({
            "type": events::NOTIFICATION_SHOW,
            "data": entry,
        });
        // Err only means no client is connected.
        let _ = self.ws_tx.send(payload.to_string());
    }

    fn remove(&self, entry: &NotificationEntry) {
        let payload = json!({
            "type": events::NOTIFICATION_REMOVE,
            "data": { "id": entry.id },
        });
        let _ = self.ws_tx.send(payload.to_string());
    }
}
