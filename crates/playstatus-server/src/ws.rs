//! `WebSocket` push of status snapshots.
//!
//! Clients connect to `GET /socket`. The first text frame is the current
//! snapshot; each later frame is a newer one. Frames carry the same JSON
//! document as `GET /status.json`. A client that reads slowly may skip
//! intermediate revisions but never sees an older revision after a newer
//! one.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::debug;

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin pushing
/// snapshots.
///
/// # Route
///
/// `GET /socket`
pub async fn ws_status(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Subscribe to the hub and forward each snapshot as a text frame until
/// either side goes away, then unsubscribe.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    let mut subscription = state.hub.subscribe();
    let id = subscription.id();
    debug!(%id, "WebSocket client connected");

    loop {
        tokio::select! {
            snapshot = subscription.recv() => {
                let Some(snapshot) = snapshot else {
                    debug!(%id, "Subscriber dropped by hub, closing WebSocket");
                    break;
                };
                let msg = Message::Text(snapshot.body().to_owned().into());
                if socket.send(msg).await.is_err() {
                    debug!(%id, "WebSocket client disconnected (send failed)");
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%id, "WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%id, "WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!(%id, "WebSocket error: {e}");
                        break;
                    }
                    // Clients have nothing to say; text and binary frames are ignored.
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.hub.unsubscribe(id);
}
