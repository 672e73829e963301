pub mod dbcodeblocks;
pub mod memory;
pub mod seed;

use std::future::Future;
use std::pin::Pin;
use uuid::Uuid;

use crate::models::{CodeBlock, CodeBlockSummary};

pub use dbcodeblocks::DbCodeBlocks;
pub use memory::MemoryCodeBlocks;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Persistent storage for code block templates
pub trait CodeBlockStore: Send + Sync {
    /// Every block, ordered by creation time
    fn list(&self) -> StoreFuture<'_, Vec<CodeBlockSummary>>;

    fn get(&self, id: Uuid) -> StoreFuture<'_, Option<CodeBlock>>;

    /// Insert a new block. Titles are unique.
    fn insert(&self, block: CodeBlock) -> StoreFuture<'_, CodeBlock>;
}

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    DuplicateTitle(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::DuplicateTitle(title) => write!(f, "A code block titled '{}' already exists", title),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}
