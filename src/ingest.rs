//! Admin flows over the knowledge store: upload, list, get, update, delete.
//!
//! An upload is a hard replace: the store is cleared and the new content
//! becomes the sole corpus document. Content is extracted by file
//! extension (plain text or DOCX) and validated non-empty before any
//! store mutation happens.

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::AskError;
use crate::extract::{extract_text, SourceFormat};
use crate::store::KnowledgeStore;

/// Read and extract upload content from a file on disk.
///
/// Dispatches on the file extension; unsupported types and unextractable
/// content are rejected before the store is touched.
pub fn extract_upload(path: &Path) -> Result<String> {
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        AskError::InvalidFileType(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("none")
                .to_string(),
        )
    })?;

    let bytes = std::fs::read(path)?;
    let content = extract_text(&bytes, format)?;

    if content.trim().is_empty() {
        bail!(AskError::EmptyContent);
    }

    Ok(content)
}

/// Upload a file, replacing the entire corpus with its content.
pub async fn run_upload(store: Arc<dyn KnowledgeStore>, path: &Path) -> Result<()> {
    let content = extract_upload(path)?;
    let doc = store.replace_all(&content).await?;

    info!(document_id = %doc.id, chars = content.len(), "knowledge base replaced");
    println!("Knowledge base uploaded successfully!");
    println!("  document id: {}", doc.id);
    println!("  characters: {}", content.len());
    Ok(())
}

/// List stored documents with a short content preview.
pub async fn run_list(store: Arc<dyn KnowledgeStore>) -> Result<()> {
    let docs = store.list().await?;
    if docs.is_empty() {
        println!("No knowledge base documents found.");
        return Ok(());
    }

    for doc in docs {
        let preview: String = doc.content.chars().take(100).collect();
        println!("{}  {}", doc.id, preview);
    }
    Ok(())
}

/// Print one document in full.
pub async fn run_get(store: Arc<dyn KnowledgeStore>, id: &str) -> Result<()> {
    match store.get(id).await? {
        Some(doc) => {
            println!("id: {}", doc.id);
            println!("created_at: {}", doc.created_at);
            println!("updated_at: {}", doc.updated_at);
            println!();
            println!("{}", doc.content);
            Ok(())
        }
        None => bail!(AskError::DocumentNotFound(id.to_string())),
    }
}

/// Replace one document's content in place, keeping its id.
pub async fn run_update(store: Arc<dyn KnowledgeStore>, id: &str, path: &Path) -> Result<()> {
    let content = extract_upload(path)?;
    match store.update(id, &content).await? {
        Some(doc) => {
            info!(document_id = %doc.id, "knowledge base document updated");
            println!("Knowledge base document {} updated successfully.", doc.id);
            Ok(())
        }
        None => bail!(AskError::DocumentNotFound(id.to_string())),
    }
}

/// Delete one document, or the whole corpus with `all`.
pub async fn run_delete(store: Arc<dyn KnowledgeStore>, id: Option<&str>, all: bool) -> Result<()> {
    match (id, all) {
        (_, true) => {
            let removed = store.delete_all().await?;
            println!("Deleted {} document(s).", removed);
            Ok(())
        }
        (Some(id), false) => {
            if store.delete(id).await? {
                println!("Knowledge base document {} deleted successfully.", id);
                Ok(())
            } else {
                bail!(AskError::DocumentNotFound(id.to_string()))
            }
        }
        (None, false) => bail!("Provide a document id or --all."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn unsupported_extension_rejected() {
        let err = extract_upload(Path::new("/tmp/upload.png")).unwrap_err();
        assert!(err.to_string().contains("invalid file type"));
    }

    #[tokio::test]
    async fn upload_replaces_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("kb.txt");
        std::fs::write(&file, "The knowledge base content for the test.").unwrap();

        let store = Arc::new(MemoryStore::new());
        store.replace_all("old corpus").await.unwrap();

        run_upload(store.clone(), &file).await.unwrap();

        let docs = store.list().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.contains("knowledge base content"));
    }

    #[tokio::test]
    async fn empty_upload_rejected_before_store_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("empty.txt");
        std::fs::write(&file, "   \n  ").unwrap();

        let store = Arc::new(MemoryStore::new());
        store.replace_all("existing corpus").await.unwrap();

        assert!(run_upload(store.clone(), &file).await.is_err());

        // The old corpus must survive a rejected upload.
        let docs = store.list().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "existing corpus");
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("kb.txt");
        std::fs::write(&file, "replacement content").unwrap();

        let store = Arc::new(MemoryStore::new());
        let err = run_update(store, "missing-id", &file).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn delete_missing_id_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let err = run_delete(store, Some("missing-id"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
