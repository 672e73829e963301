use axum::{
    extract::{State, ws::{Message, WebSocket, WebSocketUpgrade}},
    response::Response,
};
use tracing::{info, error, warn};
use futures_util::{StreamExt, SinkExt};
use uuid::Uuid;

use crate::models::ReceivedMessage;
use crate::state::AppState;
use crate::utils::DropGuard;
use crate::websocket::msg_edit_handler::handle_edit_message;
use crate::websocket::msg_join_handler::handle_join_message;
use crate::websocket::msg_leave_handler::handle_leave_message;
use crate::websocket::msg_ping_handler::handle_ping_message;


/// WebSocket handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: AppState) {

    // Generate unique connection ID to identify this client
    let connection_id = Uuid::new_v4().to_string();
    info!("WebSocket connection established with connection_id: {}", connection_id);

    let mut outbound = app_state.connections.register(&connection_id);

    // However this function ends, leave the room and drop the connection
    let _cleanup = {
        let app_state = app_state.clone();
        let connection_id = connection_id.clone();
        DropGuard::new(move || release_connection(&app_state, &connection_id))
    };

    // Split the socket into sender and receiver
    let (mut sender, mut receiver) = socket.split();

    // Drain the outbound queue into the socket; this is the only writer
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = outbound.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize outbound message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Listen to the websocket for incoming messages
    let recv_state = app_state.clone();
    let recv_connection_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            let text = match msg {
                Message::Text(text) => text,
                Message::Close(_) => break,
                // Binary frames are not part of the protocol, ping/pong is handled by axum
                _ => continue,
            };

            // Parse the incoming message as JSON
            let json_msg: ReceivedMessage = match serde_json::from_str(&text) {
                Ok(json_msg) => json_msg,
                Err(e) => {
                    warn!("Failed to parse message from {}: {}", recv_connection_id, e);
                    continue;
                }
            };

            // Handle different message types
            match json_msg {
                ReceivedMessage::Join(join_msg) => {
                    handle_join_message(&join_msg, &recv_connection_id, &recv_state.sessions);
                }
                ReceivedMessage::Leave(leave_msg) => {
                    handle_leave_message(&leave_msg, &recv_connection_id, &recv_state.sessions);
                }
                ReceivedMessage::Edit(edit_msg) => {
                    handle_edit_message(edit_msg, &recv_connection_id, &recv_state.sessions);
                }
                ReceivedMessage::Ping(_) => {
                    handle_ping_message(&recv_connection_id, recv_state.connections.as_ref());
                }
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
    info!("WebSocket connection {} terminated", connection_id);
}

/// Take a closed connection out of its room, then out of the registry.
///
/// Must stay in this order: a connection counts as alive while registered, so the room
/// handles the disconnect before any join or sweep can prune it as a ghost.
pub(crate) fn release_connection(app_state: &AppState, connection_id: &str) {
    if let Some(departure) = app_state.sessions.disconnect(connection_id) {
        info!("Connection {} cleaned up: {:?}", connection_id, departure);
    }
    app_state.connections.unregister(connection_id);
}
