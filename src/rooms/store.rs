use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Transient state of a single room.
///
/// Only reachable through [`RoomStore`], which hands it out under the room's lock.
#[derive(Debug, Default)]
pub struct Room {
    members: Vec<String>,
    owner: Option<String>,
    document: Option<String>,
    closed: bool,
}

impl Room {
    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn is_member(&self, conn_id: &str) -> bool {
        self.members.iter().any(|m| m == conn_id)
    }

    pub fn is_owner(&self, conn_id: &str) -> bool {
        self.owner.as_deref() == Some(conn_id)
    }

    /// Number of members that are not the owner.
    pub fn participant_count(&self) -> usize {
        self.members.len() - usize::from(self.owner.is_some())
    }
}

/// Aggregate figures over every live room
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoomStats {
    pub rooms: usize,
    pub members: usize,
    pub owners: usize,
    pub documents: usize,
}

/// Mutable view of one room, valid while its lock is held.
///
/// Membership changes go through here so the connection -> room index never
/// drifts from the member lists.
pub struct RoomTxn<'a> {
    key: &'a str,
    room: &'a mut Room,
    memberships: &'a Mutex<HashMap<String, String>>,
    destroy: bool,
}

impl RoomTxn<'_> {
    pub fn key(&self) -> &str {
        self.key
    }

    pub fn room(&self) -> &Room {
        &*self.room
    }

    /// Returns false if the connection already was a member.
    pub fn add_member(&mut self, conn_id: &str) -> bool {
        if self.room.is_member(conn_id) {
            return false;
        }
        self.room.members.push(conn_id.to_string());
        lock(self.memberships).insert(conn_id.to_string(), self.key.to_string());
        true
    }

    /// Removes a member, clearing the owner slot if it pointed at it.
    pub fn remove_member(&mut self, conn_id: &str) -> bool {
        let Some(pos) = self.room.members.iter().position(|m| m == conn_id) else {
            return false;
        };
        self.room.members.remove(pos);
        if self.room.is_owner(conn_id) {
            self.room.owner = None;
        }
        forget(self.memberships, conn_id, self.key);
        true
    }

    /// Drops every member for which `keep` is false and returns them.
    pub fn retain_members(&mut self, keep: impl Fn(&str) -> bool) -> Vec<String> {
        let (kept, dropped): (Vec<String>, Vec<String>) =
            self.room.members.drain(..).partition(|m| keep(m.as_str()));
        self.room.members = kept;
        for conn_id in &dropped {
            if self.room.is_owner(conn_id) {
                self.room.owner = None;
            }
            forget(self.memberships, conn_id, self.key);
        }
        dropped
    }

    /// The new owner must already be a member.
    pub fn set_owner(&mut self, conn_id: &str) {
        debug_assert!(self.room.is_member(conn_id));
        self.room.owner = Some(conn_id.to_string());
    }

    pub fn clear_owner(&mut self) -> Option<String> {
        self.room.owner.take()
    }

    pub fn set_document(&mut self, content: String) {
        self.room.document = Some(content);
    }

    /// Discard the room once the current operation returns.
    pub fn destroy(&mut self) {
        self.destroy = true;
    }
}

/// Process-wide map of room key -> room state.
///
/// Each room carries its own mutex; the map lock is only held for lookups,
/// inserts and removals. Lock order is map -> room, never the reverse: a destroyed
/// room is flagged `closed` under its own lock and unlinked from the map afterwards.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: Mutex<HashMap<String, Arc<Mutex<Room>>>>,
    memberships: Mutex<HashMap<String, String>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on the room, creating it first if needed.
    pub fn with_room_or_create<R>(&self, key: &str, f: impl FnOnce(&mut RoomTxn<'_>) -> R) -> R {
        loop {
            let entry = self.entry_or_insert(key);
            let room = lock(&entry);
            if room.closed {
                // Destroyed between lookup and lock; the next lookup replaces it.
                continue;
            }
            return self.apply(key, &entry, room, f);
        }
    }

    /// Run `f` on an existing room. Returns `None` when the room does not exist.
    pub fn with_room<R>(&self, key: &str, f: impl FnOnce(&mut RoomTxn<'_>) -> R) -> Option<R> {
        loop {
            let entry = self.entry(key)?;
            let room = lock(&entry);
            if room.closed {
                continue;
            }
            return Some(self.apply(key, &entry, room, f));
        }
    }

    /// Room the connection currently belongs to.
    pub fn room_of(&self, conn_id: &str) -> Option<String> {
        lock(&self.memberships).get(conn_id).cloned()
    }

    /// Drop a reverse index entry, but only if it still points at `key`.
    pub fn forget_membership(&self, conn_id: &str, key: &str) {
        forget(&self.memberships, conn_id, key);
    }

    pub fn contains(&self, key: &str) -> bool {
        let rooms = lock(&self.rooms);
        rooms.get(key).is_some_and(|entry| !lock(entry).closed)
    }

    pub fn keys(&self) -> Vec<String> {
        lock(&self.rooms).keys().cloned().collect()
    }

    pub fn stats(&self) -> RoomStats {
        let entries: Vec<Arc<Mutex<Room>>> = lock(&self.rooms).values().cloned().collect();
        let mut stats = RoomStats::default();
        for entry in entries {
            let room = lock(&entry);
            if room.closed {
                continue;
            }
            stats.rooms += 1;
            stats.members += room.members.len();
            stats.owners += usize::from(room.owner.is_some());
            stats.documents += usize::from(room.document.is_some());
        }
        stats
    }

    fn apply<R>(
        &self,
        key: &str,
        entry: &Arc<Mutex<Room>>,
        mut room: MutexGuard<'_, Room>,
        f: impl FnOnce(&mut RoomTxn<'_>) -> R,
    ) -> R {
        let (out, destroy) = {
            let mut txn = RoomTxn {
                key,
                room: &mut *room,
                memberships: &self.memberships,
                destroy: false,
            };
            let out = f(&mut txn);
            (out, txn.destroy)
        };

        if destroy || room.members.is_empty() {
            for conn_id in room.members.drain(..) {
                forget(&self.memberships, &conn_id, key);
            }
            room.owner = None;
            room.document = None;
            room.closed = true;
            drop(room);
            self.unlink(key, entry);
            debug!("Room {} destroyed", key);
        }
        out
    }

    /// Open room under `key`, if any.
    fn entry(&self, key: &str) -> Option<Arc<Mutex<Room>>> {
        let rooms = lock(&self.rooms);
        rooms.get(key).filter(|entry| !lock(entry).closed).cloned()
    }

    /// Open room under `key`, replacing a missing or closed one with a fresh room.
    fn entry_or_insert(&self, key: &str) -> Arc<Mutex<Room>> {
        let mut rooms = lock(&self.rooms);
        if let Some(entry) = rooms.get(key) {
            if !lock(entry).closed {
                return entry.clone();
            }
        }
        debug!("Room {} created", key);
        let entry = Arc::new(Mutex::new(Room::default()));
        rooms.insert(key.to_string(), entry.clone());
        entry
    }

    fn unlink(&self, key: &str, entry: &Arc<Mutex<Room>>) {
        let mut rooms = lock(&self.rooms);
        if rooms.get(key).is_some_and(|current| Arc::ptr_eq(current, entry)) {
            rooms.remove(key);
        }
    }
}

fn forget(memberships: &Mutex<HashMap<String, String>>, conn_id: &str, key: &str) {
    let mut memberships = lock(memberships);
    if memberships.get(conn_id).is_some_and(|k| k == key) {
        memberships.remove(conn_id);
    }
}

/// Lock a std mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_created_on_demand_and_destroyed_when_empty() {
        let store = RoomStore::new();
        assert!(!store.contains("r1"));

        store.with_room_or_create("r1", |txn| {
            assert!(txn.add_member("a"));
        });
        assert!(store.contains("r1"));
        assert_eq!(store.room_of("a").as_deref(), Some("r1"));

        store.with_room("r1", |txn| {
            assert!(txn.remove_member("a"));
        });
        assert!(!store.contains("r1"));
        assert_eq!(store.room_of("a"), None);
    }

    #[test]
    fn test_with_room_on_unknown_room_is_none() {
        let store = RoomStore::new();
        assert!(store.with_room("missing", |_| ()).is_none());
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_destroy_discards_members_and_document() {
        let store = RoomStore::new();
        store.with_room_or_create("r1", |txn| {
            txn.add_member("a");
            txn.add_member("b");
            txn.set_owner("a");
            txn.set_document("fn main() {}".to_string());
        });

        store.with_room("r1", |txn| txn.destroy());
        assert!(!store.contains("r1"));
        assert_eq!(store.room_of("a"), None);
        assert_eq!(store.room_of("b"), None);

        // A fresh room under the same key starts blank.
        store.with_room_or_create("r1", |txn| {
            assert!(txn.room().document().is_none());
            assert!(txn.room().owner().is_none());
            txn.add_member("c");
        });
        assert_eq!(store.stats(), RoomStats { rooms: 1, members: 1, owners: 0, documents: 0 });
    }

    #[test]
    fn test_remove_member_clears_owner() {
        let store = RoomStore::new();
        store.with_room_or_create("r1", |txn| {
            txn.add_member("a");
            txn.add_member("b");
            txn.set_owner("a");
            txn.remove_member("a");
            assert!(txn.room().owner().is_none());
            assert_eq!(txn.room().participant_count(), 1);
        });
    }

    #[test]
    fn test_retain_members_updates_index() {
        let store = RoomStore::new();
        store.with_room_or_create("r1", |txn| {
            txn.add_member("a");
            txn.add_member("b");
            txn.set_owner("a");
            let dropped = txn.retain_members(|m| m != "a");
            assert_eq!(dropped, vec!["a".to_string()]);
            assert!(txn.room().owner().is_none());
        });
        assert_eq!(store.room_of("a"), None);
        assert_eq!(store.room_of("b").as_deref(), Some("r1"));
    }

    #[test]
    fn test_forget_membership_ignores_other_rooms() {
        let store = RoomStore::new();
        store.with_room_or_create("r1", |txn| {
            txn.add_member("a");
        });
        store.forget_membership("a", "r2");
        assert_eq!(store.room_of("a").as_deref(), Some("r1"));
        store.forget_membership("a", "r1");
        assert_eq!(store.room_of("a"), None);
    }
}
