//! In-memory [`KnowledgeStore`] for tests and embedded use.
//!
//! Documents live in a `Vec` behind a `std::sync::RwLock`; a corpus
//! replace happens under a single write guard, so readers observe either
//! the old corpus or the new one.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::Document;

use super::KnowledgeStore;

/// In-memory store. Cheap to construct, nothing persisted.
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_document(content: &str) -> Document {
    let now = chrono::Utc::now().timestamp();
    Document {
        id: Uuid::new_v4().to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl KnowledgeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Document>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        Ok(docs.clone())
    }

    async fn replace_all(&self, content: &str) -> Result<Document> {
        let doc = new_document(content);
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        docs.clear();
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        Ok(docs.iter().find(|d| d.id == id).cloned())
    }

    async fn update(&self, id: &str, content: &str) -> Result<Option<Document>> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => {
                doc.content = content.to_string();
                doc.updated_at = chrono::Utc::now().timestamp();
                Ok(Some(doc.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() < before)
    }

    async fn delete_all(&self) -> Result<u64> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        let removed = docs.len() as u64;
        docs.clear();
        Ok(removed)
    }
}
