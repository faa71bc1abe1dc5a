//! WebSocket handler for real-time updates.
//!
//! Each client gets an `initial_state` message right away and then a
//! `snapshot` message whenever the snapshot cell changes. Intermediate
//! states are skipped for slow clients; they always get the latest one.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;

use crate::server::state::AppState;
use crate::store::SnapshotState;

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a SnapshotState,
    timestamp: String,
}

/// Encodes a state update in the `{type, data, timestamp}` envelope.
pub fn encode(kind: &'static str, state: &SnapshotState) -> Option<String> {
    let envelope = Envelope {
        kind,
        data: state,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    match serde_json::to_string(&envelope) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode WebSocket message");
            None
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handles an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.subscribe();

    // The receiver starts at the current value; send it before waiting.
    let initial = rx.borrow_and_update().clone();
    if let Some(text) = encode("initial_state", &initial) {
        if sender.send(Message::Text(text)).await.is_err() {
            return;
        }
    }

    let send_task = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().clone();
            let Some(text) = encode("snapshot", &current) else {
                continue;
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Incoming messages are ignored apart from close.
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    tracing::debug!("WebSocket connection closed");
}
