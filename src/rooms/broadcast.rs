use std::sync::Arc;
use tracing::debug;

use super::registry::Notifier;
use super::store::Room;
use crate::models::{
    DocumentMessage, ParticipantCountMessage, Role, RoleAssignedMessage, SendMessage,
};

/// Turns room events into targeted or room-wide transport messages.
///
/// Room-wide notifications go to the member list of the room they are called with,
/// so callers invoke them while still holding the room's lock.
#[derive(Clone)]
pub struct Broadcaster {
    notifier: Arc<dyn Notifier>,
}

impl Broadcaster {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    pub fn notify_role(&self, conn_id: &str, role: Role) {
        self.notifier.send(conn_id, SendMessage::RoleAssigned(RoleAssignedMessage { role }));
    }

    pub fn notify_document(&self, conn_id: &str, content: &str) {
        self.notifier.send(
            conn_id,
            SendMessage::DocumentSync(DocumentMessage { content: content.to_string() }),
        );
    }

    pub fn notify_participant_count(&self, room: &Room) {
        let count = room.participant_count();
        debug!("Participant count now {} across {} members", count, room.members().len());
        self.broadcast(room, None, SendMessage::ParticipantCount(ParticipantCountMessage { count }));
    }

    pub fn notify_document_change(&self, room: &Room, content: &str, editor: &str) {
        self.broadcast(
            room,
            Some(editor),
            SendMessage::DocumentChanged(DocumentMessage { content: content.to_string() }),
        );
    }

    pub fn notify_owner_left(&self, room: &Room) {
        self.broadcast(room, None, SendMessage::OwnerLeft);
    }

    fn broadcast(&self, room: &Room, exclude: Option<&str>, msg: SendMessage) {
        for member in room.members() {
            if exclude == Some(member.as_str()) {
                continue;
            }
            self.notifier.send(member, msg.clone());
        }
    }
}
