use tokio::sync::RwLock;
use uuid::Uuid;

use super::{seed, CodeBlockStore, StoreError, StoreFuture};
use crate::models::{CodeBlock, CodeBlockSummary};

/// Code blocks kept in process memory, used when no database is configured
#[derive(Debug, Default)]
pub struct MemoryCodeBlocks {
    blocks: RwLock<Vec<CodeBlock>>,
}

impl MemoryCodeBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the starter exercises
    pub fn seeded() -> Self {
        let blocks = seed::initial_code_blocks()
            .into_iter()
            .map(|request| request.into_code_block())
            .collect();
        Self { blocks: RwLock::new(blocks) }
    }
}

impl CodeBlockStore for MemoryCodeBlocks {
    fn list(&self) -> StoreFuture<'_, Vec<CodeBlockSummary>> {
        Box::pin(async move {
            let blocks = self.blocks.read().await;
            Ok(blocks.iter().map(CodeBlockSummary::from).collect())
        })
    }

    fn get(&self, id: Uuid) -> StoreFuture<'_, Option<CodeBlock>> {
        Box::pin(async move {
            let blocks = self.blocks.read().await;
            Ok(blocks.iter().find(|b| b.id == id).cloned())
        })
    }

    fn insert(&self, block: CodeBlock) -> StoreFuture<'_, CodeBlock> {
        Box::pin(async move {
            let mut blocks = self.blocks.write().await;
            if blocks.iter().any(|b| b.title == block.title) {
                return Err(StoreError::DuplicateTitle(block.title));
            }
            blocks.push(block.clone());
            Ok(block)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateCodeBlockRequest;

    fn request(title: &str) -> CreateCodeBlockRequest {
        CreateCodeBlockRequest {
            title: title.to_string(),
            initial_code: "function f() {}".to_string(),
            solution: "function f() { return 1; }".to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_seeded_store_lists_starter_blocks() {
        let store = MemoryCodeBlocks::seeded();
        let titles: Vec<String> = store.list().await.unwrap().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Factorial Function", "Find Maximum", "Reverse String", "Check Prime"]);
    }

    #[tokio::test]
    async fn test_insert_get_and_reject_duplicate_title() {
        let store = MemoryCodeBlocks::new();
        let created = store.insert(request("Sum").into_code_block()).await.unwrap();

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);

        let duplicate = store.insert(request("Sum").into_code_block()).await;
        assert!(matches!(duplicate, Err(StoreError::DuplicateTitle(ref t)) if t == "Sum"));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
