//! Room coordination core
//!
//! Tracks room membership, elects the single owner (mentor) of each room, keeps the
//! shared document and reacts to leaves and dropped connections. Everything here is
//! in-memory and synchronous; the WebSocket layer feeds it events and supplies the
//! [`ConnectionRegistry`] and [`Notifier`] it runs against.

pub mod broadcast;
pub mod elector;
pub mod lifecycle;
pub mod registry;
pub mod store;


pub use lifecycle::{Departure, SessionManager, SweepReport};
pub use registry::{ConnectionRegistry, Notifier};
pub use store::RoomStats;
