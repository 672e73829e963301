use crate::models::SendMessage;

/// Liveness lookup for transport-level connections.
///
/// The room core never trusts a connection id it has stored: before electing an
/// owner it asks the registry whether the referenced connections are still alive.
pub trait ConnectionRegistry: Send + Sync {
    fn is_alive(&self, conn_id: &str) -> bool;
}

/// Outbound side of the transport.
///
/// Delivery is fire-and-forget: sending to a connection that is already gone is a no-op.
pub trait Notifier: Send + Sync {
    fn send(&self, conn_id: &str, msg: SendMessage);
}
