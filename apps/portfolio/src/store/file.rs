use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::fs;

use super::{parse_document, DocumentStore, StoreError};
use crate::profile::models::Document;

/// Stores the document as pretty-printed JSON in a single file.
///
/// Each write goes to its own uniquely named temp file in the target's
/// directory and is then renamed over the target, so concurrent writers never
/// share a partially written file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn load(&self) -> Result<Option<Document>, StoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        parse_document(&raw).map(Some)
    }

    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(doc)?;

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).await?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(text.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(io::Error::other)??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::models::{Project, Record};

    #[tokio::test]
    async fn test_first_read_creates_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data.json"));

        let doc = store.read().await;
        assert_eq!(doc.presentation["fullName"], "Seu Nome");

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        let parsed: Document = serde_json::from_str(&on_disk).unwrap();
        assert_eq!(parsed, Document::seed());
    }

    #[tokio::test]
    async fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("data.json"));

        let mut doc = Document::seed();
        doc.technical_skills = vec!["Rust".into()];
        doc.projects.push(Project::new(1, Record::new()));
        store.write(&doc).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, doc);
        let entries: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("data.json")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_leave_a_parseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(FileStore::new(dir.path().join("data.json")));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut doc = Document::seed();
                    doc.technical_skills = vec!["x".repeat(i * 64); i];
                    store.write(&doc).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = store.load().await.unwrap().unwrap();
        let len = loaded.technical_skills.len();
        assert!(loaded.technical_skills.iter().all(|s| s.len() == len * 64));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = FileStore::new(&path);

        assert!(store.load().await.is_err());
        assert_eq!(store.read().await, Document::fallback());
        // The corrupt file is left untouched for inspection.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2");
    }

    #[tokio::test]
    async fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("missing.json"));
        assert!(store.load().await.unwrap().is_none());
    }
}
