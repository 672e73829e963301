use std::sync::Arc;
use tracing::{debug, info};

use super::broadcast::Broadcaster;
use super::elector::{self, Election};
use super::registry::{ConnectionRegistry, Notifier};
use super::store::{RoomStats, RoomStore};
use crate::models::Role;

/// How a connection left its room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Departure {
    /// The connection was not a member of that room (or the room does not exist).
    NotMember,
    /// A participant left; `room_closed` is true if it was the last member.
    Left { room_closed: bool },
    /// The owner left and the room was destroyed, evicting `evicted` members.
    OwnerLeft { evicted: usize },
}

/// Outcome of a ghost sweep across all rooms
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub pruned: usize,
    pub rooms_closed: usize,
}

/// Drives join, leave, disconnect and edit for every room.
///
/// All methods are synchronous and never suspend: each one runs to completion
/// under the lock of the single room it touches.
pub struct SessionManager {
    store: RoomStore,
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Broadcaster,
}

impl SessionManager {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: RoomStore::new(),
            registry,
            broadcaster: Broadcaster::new(notifier),
        }
    }

    /// Join `room_key`, electing an owner if the room has none.
    ///
    /// A connection holds at most one room: joining a different room first departs
    /// the previous one.
    pub fn join(&self, conn_id: &str, room_key: &str) -> Role {
        if let Some(previous) = self.store.room_of(conn_id) {
            if previous != room_key {
                info!("Connection {} moves from room {} to {}", conn_id, previous, room_key);
                self.leave(conn_id, &previous);
            }
        }

        self.store.with_room_or_create(room_key, |txn| {
            let Election { role, pruned, joined } =
                elector::reconcile_and_assign(txn, self.registry.as_ref(), conn_id);
            if joined {
                info!("Connection {} joined room {} as {:?}", conn_id, room_key, role);
            } else {
                debug!("Connection {} joined room {} again", conn_id, room_key);
            }
            if !pruned.is_empty() {
                debug!("Join into room {} pruned {:?}", room_key, pruned);
            }

            self.broadcaster.notify_role(conn_id, role);
            if let Some(document) = txn.room().document() {
                self.broadcaster.notify_document(conn_id, document);
            }
            self.broadcaster.notify_participant_count(txn.room());
            role
        })
    }

    /// Explicitly leave `room_key`.
    pub fn leave(&self, conn_id: &str, room_key: &str) -> Departure {
        let departure = self.store.with_room(room_key, |txn| {
            let was_owner = txn.room().is_owner(conn_id);
            if !txn.remove_member(conn_id) {
                return Departure::NotMember;
            }

            if was_owner {
                let evicted = txn.room().members().len();
                info!("Owner {} left room {}, evicting {} members", conn_id, room_key, evicted);
                self.broadcaster.notify_owner_left(txn.room());
                txn.destroy();
                return Departure::OwnerLeft { evicted };
            }

            info!("Connection {} left room {}", conn_id, room_key);
            let room_closed = txn.room().members().is_empty();
            if !room_closed {
                self.broadcaster.notify_participant_count(txn.room());
            }
            Departure::Left { room_closed }
        });

        match departure {
            Some(departure) => {
                if departure == Departure::NotMember {
                    self.store.forget_membership(conn_id, room_key);
                }
                departure
            }
            None => {
                debug!("Leave for unknown room {} ignored", room_key);
                self.store.forget_membership(conn_id, room_key);
                Departure::NotMember
            }
        }
    }

    /// Transport-level loss of `conn_id`. Uses the reverse index to find its room.
    pub fn disconnect(&self, conn_id: &str) -> Option<Departure> {
        let Some(room_key) = self.store.room_of(conn_id) else {
            debug!("Connection {} disconnected without a room", conn_id);
            return None;
        };
        info!("Connection {} disconnected from room {}", conn_id, room_key);
        Some(self.leave(conn_id, &room_key))
    }

    /// Overwrite the room's document and fan it out to everyone but the editor.
    ///
    /// Last writer wins. Returns false if the room does not exist.
    pub fn apply_edit(&self, conn_id: &str, room_key: &str, content: String) -> bool {
        let applied = self.store.with_room(room_key, |txn| {
            self.broadcaster.notify_document_change(txn.room(), &content, conn_id);
            txn.set_document(content);
        });
        if applied.is_none() {
            debug!("Edit for unknown room {} ignored", room_key);
        }
        applied.is_some()
    }

    /// Prune ghost members and dead owners in every room.
    pub fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();
        for room_key in self.store.keys() {
            let outcome = self.store.with_room(&room_key, |txn| {
                let pruned = elector::prune_ghosts(txn, self.registry.as_ref());
                let closed = txn.room().members().is_empty();
                if !pruned.is_empty() && !closed {
                    self.broadcaster.notify_participant_count(txn.room());
                }
                (pruned.len(), closed)
            });
            if let Some((pruned, closed)) = outcome {
                report.pruned += pruned;
                report.rooms_closed += usize::from(closed);
            }
        }
        if report.pruned > 0 {
            info!("Sweep pruned {} stale connections, closed {} rooms", report.pruned, report.rooms_closed);
        }
        report
    }

    pub fn room_of(&self, conn_id: &str) -> Option<String> {
        self.store.room_of(conn_id)
    }

    pub fn has_room(&self, room_key: &str) -> bool {
        self.store.contains(room_key)
    }

    pub fn stats(&self) -> RoomStats {
        self.store.stats()
    }

    #[cfg(test)]
    pub(crate) fn inspect<R>(&self, room_key: &str, f: impl FnOnce(&super::store::Room) -> R) -> Option<R> {
        self.store.with_room(room_key, |txn| f(txn.room()))
    }
}
