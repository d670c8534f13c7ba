//! Storage abstraction for the knowledge corpus.
//!
//! The [`KnowledgeStore`] trait defines the operations the pipeline and
//! the admin commands need, enabling pluggable backends (SQLite,
//! in-memory). Implementations must be `Send + Sync`.
//!
//! The one semantically loaded operation is [`replace_all`]: an upload is
//! a hard replace of the whole corpus, applied atomically with respect to
//! concurrent readers. A query running during a replace sees either the
//! fully-old or fully-new corpus, never a partially-deleted one.
//!
//! [`replace_all`]: KnowledgeStore::replace_all

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Document;

/// Abstract storage backend for the knowledge corpus.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list`](KnowledgeStore::list) | All documents, oldest first |
/// | [`replace_all`](KnowledgeStore::replace_all) | Clear the corpus and insert one document |
/// | [`get`](KnowledgeStore::get) | Fetch a document by id |
/// | [`update`](KnowledgeStore::update) | Replace a document's content in place |
/// | [`delete`](KnowledgeStore::delete) | Remove a document by id |
/// | [`delete_all`](KnowledgeStore::delete_all) | Remove every document |
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Return snapshots of all stored documents, oldest first.
    async fn list(&self) -> Result<Vec<Document>>;

    /// Atomically clear the corpus and insert `content` as its sole
    /// document. Returns the new document.
    async fn replace_all(&self, content: &str) -> Result<Document>;

    /// Fetch a document by id; `None` when it does not exist.
    async fn get(&self, id: &str) -> Result<Option<Document>>;

    /// Replace the content of document `id` in place, bumping its
    /// `updated_at`. Returns the updated document, or `None` when the id
    /// does not exist.
    async fn update(&self, id: &str, content: &str) -> Result<Option<Document>>;

    /// Delete document `id`. Returns `false` when the id does not exist.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Delete every document, returning how many were removed.
    async fn delete_all(&self) -> Result<u64>;
}
