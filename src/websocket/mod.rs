pub mod connections;
pub mod handler;
pub mod msg_edit_handler;
pub mod msg_join_handler;
pub mod msg_leave_handler;
pub mod msg_ping_handler;

#[cfg(test)]
mod tests;

pub use connections::Connections;
pub use handler::websocket_handler;
