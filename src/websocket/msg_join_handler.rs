use tracing::{info, warn};
use crate::models::RoomMessage;
use crate::rooms::SessionManager;

/// Handle JoinMessage
pub fn handle_join_message(join_msg: &RoomMessage, connection_id: &str, sessions: &SessionManager) {
    if join_msg.room_id.trim().is_empty() {
        warn!("Join with empty room id from connection {} ignored", connection_id);
        return;
    }

    let role = sessions.join(connection_id, &join_msg.room_id);
    info!("Join handled for room {}: connection={}, role={:?}", join_msg.room_id, connection_id, role);
}
