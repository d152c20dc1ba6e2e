//! Document store: persistence for the single portfolio document.
//!
//! Backends implement raw `load`/`write`. The read policy (seed when absent,
//! fall back when unreadable) lives in the provided `read` method so every
//! backend degrades the same way.

mod file;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::profile::models::Document;

pub use file::FileStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads the stored document. `Ok(None)` means nothing has been stored yet.
    async fn load(&self) -> Result<Option<Document>, StoreError>;

    /// Overwrites the stored document with `doc`.
    async fn write(&self, doc: &Document) -> Result<(), StoreError>;

    /// Best-effort read. Never fails: an absent document is seeded and
    /// written, an unreadable one yields `Document::fallback()`.
    ///
    /// Seeding writes, so a caller that also mutates the document must hold
    /// its writer lock around this call.
    async fn read(&self) -> Document {
        match self.load().await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                let seed = Document::seed();
                match self.write(&seed).await {
                    Ok(()) => {
                        info!("No data file found, seeded default document");
                        seed
                    }
                    Err(e) => {
                        error!("Failed to seed data file: {e}");
                        Document::fallback()
                    }
                }
            }
            Err(e) => {
                error!("Failed to read data file: {e}");
                Document::fallback()
            }
        }
    }
}

/// Parses stored text. Blank content reads as an all-default document.
pub(crate) fn parse_document(raw: &str) -> Result<Document, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Document::default());
    }
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryStore;
    use super::*;

    #[tokio::test]
    async fn test_read_seeds_absent_document() {
        let store = MemoryStore::new();
        let doc = store.read().await;

        assert_eq!(doc, Document::seed());
        assert!(store.raw().is_some(), "seed must be written back");
    }

    #[tokio::test]
    async fn test_read_falls_back_on_invalid_content() {
        let store = MemoryStore::with_raw("{ not json");
        let doc = store.read().await;

        assert_eq!(doc, Document::fallback());
        assert_eq!(store.raw().as_deref(), Some("{ not json"));
    }

    #[tokio::test]
    async fn test_read_falls_back_when_seed_write_fails() {
        let store = MemoryStore::new().failing_writes();
        let doc = store.read().await;

        assert_eq!(doc, Document::fallback());
    }

    #[tokio::test]
    async fn test_blank_content_reads_as_default() {
        let store = MemoryStore::with_raw("  \n");
        let doc = store.read().await;

        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_parse_document_defaults_only_mistyped_keys() {
        let doc = parse_document(r#"{"education": "nope", "languages": ["pt-BR"]}"#).unwrap();
        assert!(doc.education.is_empty());
        assert_eq!(doc.languages, vec!["pt-BR"]);
    }

    #[test]
    fn test_parse_document_rejects_invalid_json() {
        assert!(parse_document("{\"education\": ").is_err());
    }
}
