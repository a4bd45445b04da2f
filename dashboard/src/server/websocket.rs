use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde_json::json;

use crate::app::SharedState;
use crate::events;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe_ws();

    let client_id = uuid::Uuid::new_v4().to_string();
    let snapshot = state.status().await.snapshot();
    let initial = [
        json!({ "type": events::CONNECTED, "data": { "clientId": client_id } }),
        json!({ "type": events::NOTIFICATION_SNAPSHOT, "data": state.notifications().snapshot() }),
        json!({ "type": events::DETECTION_STATUS, "data": snapshot }),
    ];
    for msg in initial {
        if sender
            .send(Message::Text(msg.to_string().into()))
            .await
            .is_err()
        {
            return;
        }
    }

    tracing::info!("WebSocket client connected: {}", client_id);

    // Broadcasts and direct replies share the sink.
    let (reply_tx, mut reply_rx) = tokio::sync::mpsc::channel::<String>(16);

    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = rx.recv() => match msg {
                    Ok(msg) => msg,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!("WebSocket client lagged, {n} messages dropped");
                        continue;
                    }
                    Err(_) => break,
                },
                Some(reply) = reply_rx.recv() => reply,
            };
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    let cid = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(reply) = handle_client_message(&text) {
                        if reply_tx.send(reply).await.is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        tracing::info!("WebSocket client disconnected: {}", cid);
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Reply to a client message, if it needs one.
fn handle_client_message(text: &str) -> Option<String> {
    let msg = serde_json::from_str::<serde_json::Value>(text).ok()?;
    match msg.get("type").and_then(|t| t.as_str()) {
        Some("ping") => Some(json!({ "type": events::PONG }).to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_gets_pong() {
        let reply = handle_client_message(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(reply, r#"{"type":"pong"}"#);
    }

    #[test]
    fn other_messages_are_ignored() {
        assert!(handle_client_message(r#"{"type":"hello"}"#).is_none());
        assert!(handle_client_message("not json").is_none());
    }
}
