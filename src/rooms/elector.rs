use tracing::{debug, info};

use super::registry::ConnectionRegistry;
use super::store::RoomTxn;
use crate::models::Role;

/// Result of running the elector for one join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Election {
    pub role: Role,
    /// Ghost connections removed from the room before the decision.
    pub pruned: Vec<String>,
    /// False when the connection was already a member (double join).
    pub joined: bool,
}

/// Repair the room's membership and owner slot, then decide the role of `conn_id`.
///
/// Must run under the room's lock (the store's get-or-create already created the room).
pub fn reconcile_and_assign(
    txn: &mut RoomTxn<'_>,
    registry: &dyn ConnectionRegistry,
    conn_id: &str,
) -> Election {
    let pruned = prune_ghosts(txn, registry);

    let joined = txn.add_member(conn_id);

    let is_owner = txn.room().owner().map(|owner| owner == conn_id);
    let role = match is_owner {
        None => {
            txn.set_owner(conn_id);
            info!("Connection {} elected owner of room {}", conn_id, txn.key());
            Role::Owner
        }
        Some(true) => Role::Owner,
        Some(false) => Role::Participant,
    };

    Election { role, pruned, joined }
}

/// Drop members that are no longer alive and clear a dead or absent owner.
///
/// Never evicts the room: a room left without an owner promotes its next live joiner.
pub fn prune_ghosts(txn: &mut RoomTxn<'_>, registry: &dyn ConnectionRegistry) -> Vec<String> {
    let pruned = txn.retain_members(|member| registry.is_alive(member));
    if !pruned.is_empty() {
        debug!("Pruned {} stale connections from room {}: {:?}", pruned.len(), txn.key(), pruned);
    }

    let stale_owner = match txn.room().owner() {
        Some(owner) => !registry.is_alive(owner) || !txn.room().is_member(owner),
        None => false,
    };
    if stale_owner {
        if let Some(owner) = txn.clear_owner() {
            info!("Cleared stale owner {} of room {}", owner, txn.key());
        }
    }

    pruned
}
