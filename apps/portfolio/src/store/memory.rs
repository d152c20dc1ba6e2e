use std::sync::Mutex;

use async_trait::async_trait;

use super::{parse_document, DocumentStore, StoreError};
use crate::profile::models::Document;

/// In-memory stand-in for `FileStore`. Holds the serialized text so tests
/// can plant corrupt content.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
            fail_writes: false,
        }
    }

    pub fn with_document(doc: &Document) -> Self {
        let raw = serde_json::to_string_pretty(doc).expect("document serializes");
        Self::with_raw(&raw)
    }

    /// Every subsequent `write` fails with an I/O error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().expect("memory store lock").clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Option<Document>, StoreError> {
        match self.raw() {
            Some(raw) => parse_document(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        if self.fail_writes {
            let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
            return Err(err.into());
        }
        let text = serde_json::to_string_pretty(doc)?;
        *self.raw.lock().expect("memory store lock") = Some(text);
        Ok(())
    }
}
