use tracing::info;
use crate::models::RoomMessage;
use crate::rooms::SessionManager;

/// Handle LeaveMessage
pub fn handle_leave_message(leave_msg: &RoomMessage, connection_id: &str, sessions: &SessionManager) {
    let departure = sessions.leave(connection_id, &leave_msg.room_id);
    info!("Leave handled for room {}: connection={}, outcome={:?}", leave_msg.room_id, connection_id, departure);
}
