use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{CodeBlockStore, StoreError};
use crate::models::{CodeBlock, CodeBlockSummary, CreateCodeBlockRequest};

/// Code block templates with a read-through cache in front of the store
pub struct CodeBlockService {
    store: Arc<dyn CodeBlockStore>,
    cache: Cache<Uuid, CodeBlock>,
}

impl CodeBlockService {
    pub fn new(store: Arc<dyn CodeBlockStore>, time_to_idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(time_to_idle)
            .build();
        Self { store, cache }
    }

    pub async fn list(&self) -> Result<Vec<CodeBlockSummary>, StoreError> {
        self.store.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<CodeBlock>, StoreError> {
        if let Some(block) = self.cache.get(&id).await {
            return Ok(Some(block));
        }

        debug!("Code block cache miss for {}", id);
        let block = self.store.get(id).await?;
        if let Some(block) = &block {
            self.cache.insert(id, block.clone()).await;
        }
        Ok(block)
    }

    pub async fn create(&self, request: CreateCodeBlockRequest) -> Result<CodeBlock, StoreError> {
        let block = self.store.insert(request.into_code_block()).await?;
        info!("Code block '{}' created with id {}", block.title, block.id);
        self.cache.insert(block.id, block.clone()).await;
        Ok(block)
    }

    /// Starter code used to seed an editor before the room's first edit.
    pub async fn initial_content(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        Ok(self.get(id).await?.map(|block| block.initial_code))
    }

    pub fn cached_entries(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCodeBlocks;

    fn service() -> CodeBlockService {
        CodeBlockService::new(Arc::new(MemoryCodeBlocks::seeded()), Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_initial_content_comes_from_the_template() {
        let service = service();
        let first = service.list().await.unwrap().remove(0);

        let content = service.initial_content(first.id).await.unwrap();
        assert_eq!(content.as_deref(), Some("function factorial(n) {\n  // your code here\n}"));
        assert_eq!(service.initial_content(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service
            .create(CreateCodeBlockRequest {
                title: "  Array Sum ".to_string(),
                initial_code: "function sumArray(arr) {}".to_string(),
                solution: "function sumArray(arr) { return arr.reduce((a, b) => a + b, 0); }".to_string(),
                description: Some("   ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(created.title, "Array Sum");
        assert_eq!(created.description, None);
        assert_eq!(service.get(created.id).await.unwrap(), Some(created));
        assert_eq!(service.list().await.unwrap().len(), 5);
    }
}
