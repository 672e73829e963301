use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored exercise template that seeds a room's editor
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub id: Uuid,
    pub title: String,
    pub initial_code: String,
    pub solution: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lobby listing entry
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct CodeBlockSummary {
    pub id: Uuid,
    pub title: String,
}

impl From<&CodeBlock> for CodeBlockSummary {
    fn from(block: &CodeBlock) -> Self {
        Self { id: block.id, title: block.title.clone() }
    }
}

/// Request body for creating a code block
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateCodeBlockRequest {
    pub title: String,
    pub initial_code: String,
    pub solution: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateCodeBlockRequest {
    /// Check required fields, returning the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Field 'title' is required".to_string());
        }
        if self.initial_code.trim().is_empty() {
            return Err("Field 'initialCode' is required".to_string());
        }
        if self.solution.trim().is_empty() {
            return Err("Field 'solution' is required".to_string());
        }
        Ok(())
    }

    pub fn into_code_block(self) -> CodeBlock {
        CodeBlock {
            id: Uuid::new_v4(),
            title: self.title.trim().to_string(),
            initial_code: self.initial_code,
            solution: self.solution,
            description: self.description.filter(|d| !d.trim().is_empty()),
            created_at: Utc::now(),
        }
    }
}

/// Starter content of a code block
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct InitialContentResponse {
    pub id: Uuid,
    pub content: String,
}
