pub mod code_block_service;
pub mod room_sweep;

pub use code_block_service::CodeBlockService;
pub use room_sweep::spawn_room_sweep;
