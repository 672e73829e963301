use tracing::debug;
use chrono::Utc;
use crate::models::{PongMessage, SendMessage};
use crate::rooms::Notifier;

/// Handle PingMessage
pub fn handle_ping_message(connection_id: &str, notifier: &dyn Notifier) {
    // Handle ping message - send a pong message back.
    debug!("Ping message received from {}", connection_id);

    let pong = SendMessage::Pong(PongMessage { date: Utc::now().to_rfc3339() });
    notifier.send(connection_id, pong);
}
