use tracing::{debug, warn};
use crate::models::EditMessage;
use crate::rooms::SessionManager;

/// Handle EditMessage
pub fn handle_edit_message(edit_msg: EditMessage, connection_id: &str, sessions: &SessionManager) {
    debug!("Edit received for room {}: connection={}, {} bytes", edit_msg.room_id, connection_id, edit_msg.content.len());

    // Last writer wins, the content replaces the room document as is
    if !sessions.apply_edit(connection_id, &edit_msg.room_id, edit_msg.content) {
        warn!("Edit from {} for unknown room {} dropped", connection_id, edit_msg.room_id);
    }
}
