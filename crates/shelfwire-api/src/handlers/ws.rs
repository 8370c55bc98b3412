//! WebSocket upgrade handler and per-connection socket loop.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use shelfwire_realtime::connection::handle::ConnectionHandle;
use shelfwire_realtime::message::{ClientMessage, ServerMessage};

use crate::state::AppState;

/// GET /ws, the WebSocket upgrade.
///
/// The connection starts anonymous; the client binds it to a user with an
/// in-band `IDENTIFY_USER` message.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(state, socket))
}

/// Runs an established WebSocket connection until it closes.
async fn handle_socket(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.registry.register();
    let conn_id = handle.id;

    info!(conn_id = %conn_id, "WebSocket connection established");

    handle.send(ServerMessage::ConnectionEstablished {
        data: "Connected to Shelfwire notifications".to_string(),
    });

    // Drain the outbound channel onto the wire.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let Ok(text) = serde_json::to_string(&msg) else {
                continue;
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_inbound(&state, &handle, text.as_str());
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound_task.abort();
    state.registry.unregister(&conn_id);

    info!(conn_id = %conn_id, "WebSocket connection closed");
}

/// Processes one inbound text frame.
fn handle_inbound(state: &AppState, handle: &Arc<ConnectionHandle>, text: &str) {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::IdentifyUser { user_id }) => {
            if state.registry.identify(&handle.id, user_id) {
                handle.send(ServerMessage::UserIdentified { user_id });
            }
        }
        Err(e) => {
            warn!(conn_id = %handle.id, error = %e, "unparseable client message");
            handle.send(ServerMessage::Error {
                code: "BAD_MESSAGE".to_string(),
                message: "Could not parse message".to_string(),
            });
        }
    }
}
