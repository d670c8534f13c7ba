//! SQLite-backed [`KnowledgeStore`] implementation.
//!
//! A corpus replace runs as a single transaction (delete everything, then
//! insert the new document), so concurrent readers on the WAL-mode pool
//! see a consistent snapshot on either side of the commit.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::Document;

use super::KnowledgeStore;

/// SQLite implementation over a shared [`SqlitePool`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document> {
    Ok(Document {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl KnowledgeStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT id, content, created_at, updated_at FROM documents ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }

    async fn replace_all(&self, content: &str) -> Result<Document> {
        let now = chrono::Utc::now().timestamp();
        let doc = Document {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM documents").execute(&mut *tx).await?;

        sqlx::query(
            "INSERT INTO documents (id, content, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&doc.id)
        .bind(&doc.content)
        .bind(doc.created_at)
        .bind(doc.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(doc)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, content, created_at, updated_at FROM documents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn update(&self, id: &str, content: &str) -> Result<Option<Document>> {
        let now = chrono::Utc::now().timestamp();
        let result = sqlx::query("UPDATE documents SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM documents")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
