use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::debug;

use crate::models::SendMessage;
use crate::rooms::{ConnectionRegistry, Notifier};

/// Live WebSocket connections and their outbound queues.
///
/// Each connection's writer task drains its queue into the socket, so queueing a
/// message never blocks the room core. A connection counts as alive while it is
/// registered, even after its writer has gone away.
#[derive(Debug, Default)]
pub struct Connections {
    senders: RwLock<HashMap<String, mpsc::UnboundedSender<SendMessage>>>,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and hand back the receiving end of its queue.
    pub fn register(&self, conn_id: &str) -> mpsc::UnboundedReceiver<SendMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(conn_id.to_string(), tx);
        rx
    }

    pub fn unregister(&self, conn_id: &str) {
        self.senders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(conn_id);
    }

    pub fn count(&self) -> usize {
        self.senders.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl ConnectionRegistry for Connections {
    fn is_alive(&self, conn_id: &str) -> bool {
        self.senders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(conn_id)
    }
}

impl Notifier for Connections {
    fn send(&self, conn_id: &str, msg: SendMessage) {
        let senders = self.senders.read().unwrap_or_else(PoisonError::into_inner);
        match senders.get(conn_id) {
            Some(tx) => {
                if tx.send(msg).is_err() {
                    debug!("Dropped message for closed connection {}", conn_id);
                }
            }
            None => debug!("Dropped message for unknown connection {}", conn_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PongMessage;

    #[test]
    fn test_register_send_unregister() {
        let connections = Connections::new();
        let mut rx = connections.register("conn-1");
        assert!(connections.is_alive("conn-1"));
        assert_eq!(connections.count(), 1);

        let pong = SendMessage::Pong(PongMessage { date: "now".to_string() });
        connections.send("conn-1", pong.clone());
        assert_eq!(rx.try_recv().unwrap(), pong);

        connections.unregister("conn-1");
        assert!(!connections.is_alive("conn-1"));
        assert_eq!(connections.count(), 0);

        // Unknown connections are a silent no-op.
        connections.send("conn-1", SendMessage::OwnerLeft);
    }

    #[test]
    fn test_alive_until_unregistered() {
        let connections = Connections::new();
        let rx = connections.register("conn-1");

        // The writer task is gone but the room core has not seen the disconnect yet.
        drop(rx);
        assert!(connections.is_alive("conn-1"));
        connections.send("conn-1", SendMessage::OwnerLeft);

        connections.unregister("conn-1");
        assert!(!connections.is_alive("conn-1"));
    }
}
