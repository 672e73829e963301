pub mod drop_guard;

pub use drop_guard::DropGuard;
