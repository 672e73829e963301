use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Error as SqlxError;
use std::time::Duration;
use tracing::{error, info};
use uuid::Uuid;

use super::{CodeBlockStore, StoreError, StoreFuture};
use crate::models::{CodeBlock, CodeBlockSummary, CreateCodeBlockRequest};

/// Code Block Row from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CodeBlockRow {
    pub id: Uuid,
    pub title: String,
    pub initial_code: String,
    pub solution: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<CodeBlockRow> for CodeBlock {
    fn from(row: CodeBlockRow) -> Self {
        CodeBlock {
            id: row.id,
            title: row.title,
            initial_code: row.initial_code,
            solution: row.solution,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

/// Code block summary row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CodeBlockSummaryRow {
    pub id: Uuid,
    pub title: String,
}

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS code_blocks (
        id UUID PRIMARY KEY,
        title TEXT NOT NULL UNIQUE,
        initial_code TEXT NOT NULL,
        solution TEXT NOT NULL,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// PostgreSQL backed code block storage
#[derive(Debug, Clone)]
pub struct DbCodeBlocks {
    pool: PgPool,
}

impl DbCodeBlocks {
    /// Create a new database connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Returns
    /// * `Result<Self, SqlxError>` - Database connection pool or error
    pub async fn new(database_url: &str) -> Result<Self, SqlxError> {
        info!("Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600)) // Close idle connections after 10 minutes
            .max_lifetime(Duration::from_secs(1800)) // Recycle connections after 30 minutes
            .connect(database_url)
            .await?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Create the code_blocks table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), SqlxError> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert the given blocks if the table is empty
    ///
    /// # Returns
    /// * `Result<usize, StoreError>` - Number of inserted blocks
    pub async fn seed_if_empty(&self, blocks: Vec<CreateCodeBlockRequest>) -> Result<usize, StoreError> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM code_blocks")
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            info!("Database already holds {} code blocks, skipping seed", existing);
            return Ok(0);
        }

        let mut inserted = 0;
        for request in blocks {
            self.insert_row(request.into_code_block()).await?;
            inserted += 1;
        }
        info!("Seeded {} code blocks", inserted);
        Ok(inserted)
    }

    async fn insert_row(&self, block: CodeBlock) -> Result<CodeBlock, StoreError> {
        let query_sql = r#"
            INSERT INTO code_blocks (id, title, initial_code, solution, description, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, initial_code, solution, description, created_at
        "#;

        let result = sqlx::query_as::<_, CodeBlockRow>(query_sql)
            .bind(block.id)
            .bind(&block.title)
            .bind(&block.initial_code)
            .bind(&block.solution)
            .bind(&block.description)
            .bind(block.created_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(e) => {
                let duplicate = matches!(&e, SqlxError::Database(db_err) if db_err.is_unique_violation());
                if duplicate {
                    Err(StoreError::DuplicateTitle(block.title))
                } else {
                    error!("Failed to insert code block '{}': {}", block.title, e);
                    Err(StoreError::Database(e))
                }
            }
        }
    }
}

impl CodeBlockStore for DbCodeBlocks {
    fn list(&self) -> StoreFuture<'_, Vec<CodeBlockSummary>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, CodeBlockSummaryRow>(
                "SELECT id, title FROM code_blocks ORDER BY created_at, title",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(rows
                .into_iter()
                .map(|row| CodeBlockSummary { id: row.id, title: row.title })
                .collect())
        })
    }

    fn get(&self, id: Uuid) -> StoreFuture<'_, Option<CodeBlock>> {
        Box::pin(async move {
            let row = sqlx::query_as::<_, CodeBlockRow>(
                "SELECT id, title, initial_code, solution, description, created_at FROM code_blocks WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row.map(CodeBlock::from))
        })
    }

    fn insert(&self, block: CodeBlock) -> StoreFuture<'_, CodeBlock> {
        Box::pin(self.insert_row(block))
    }
}
