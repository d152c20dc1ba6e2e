//! Record repository: typed accessors and mutators over the portfolio document.
//!
//! Every mutation is read-modify-write of the whole document. Mutations are
//! serialized through `write_lock` so two requests in this process cannot
//! interleave and drop each other's change. Reads that find no stored
//! document seed it under the same lock.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::profile::models::{
    coerce_text, merge_record, Document, Project, Record, Section, TextList,
};
use crate::store::{DocumentStore, StoreError};

pub struct Repository {
    store: Arc<dyn DocumentStore>,
    write_lock: Mutex<()>,
}

/// Parses a positional index. Negative, fractional and non-numeric input
/// never address an element.
fn parse_index(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok()
}

fn parse_project_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Runs `patch` against a fresh copy of the document and persists it.
    async fn apply<T>(&self, patch: impl FnOnce(&mut Document) -> T) -> Result<T, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.read().await;
        let out = patch(&mut doc);
        self.store.write(&doc).await?;
        Ok(out)
    }

    /// Like `apply`, but only persists when `patch` finds its target.
    async fn apply_if<T>(
        &self,
        patch: impl FnOnce(&mut Document) -> Option<T>,
    ) -> Result<Option<T>, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.store.read().await;
        let Some(out) = patch(&mut doc) else {
            return Ok(None);
        };
        self.store.write(&doc).await?;
        Ok(Some(out))
    }

    /// Current document for read-only callers. A read that would seed or
    /// fall back takes the write lock first.
    async fn snapshot(&self) -> Document {
        if let Ok(Some(doc)) = self.store.load().await {
            return doc;
        }
        let _guard = self.write_lock.lock().await;
        self.store.read().await
    }

    pub async fn document(&self) -> Document {
        self.snapshot().await
    }

    // ── Projects ────────────────────────────────────────────────────────────

    pub async fn projects(&self) -> Vec<Project> {
        self.snapshot().await.projects
    }

    pub async fn project(&self, id: &str) -> Option<Project> {
        let id = parse_project_id(id)?;
        self.snapshot()
            .await
            .projects
            .into_iter()
            .find(|p| p.id == id)
    }

    /// Returns `None` without writing when no id is left above the current
    /// maximum.
    pub async fn add_project(&self, fields: Record) -> Result<Option<Project>, StoreError> {
        let created = self
            .apply_if(|doc| {
                let project = Project::new(doc.next_project_id()?, fields);
                doc.projects.push(project.clone());
                Some(project)
            })
            .await?;
        match &created {
            Some(project) => info!(id = project.id, "Project created"),
            None => warn!("Project id space exhausted"),
        }
        Ok(created)
    }

    pub async fn update_project(
        &self,
        id: &str,
        partial: Record,
    ) -> Result<Option<Project>, StoreError> {
        let Some(id) = parse_project_id(id) else {
            return Ok(None);
        };
        let updated = self
            .apply_if(|doc| {
                let project = doc.projects.iter_mut().find(|p| p.id == id)?;
                project.merge(partial);
                Some(project.clone())
            })
            .await?;
        if updated.is_some() {
            info!(id, "Project updated");
        }
        Ok(updated)
    }

    pub async fn delete_project(&self, id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_project_id(id) else {
            return Ok(false);
        };
        let removed = self
            .apply_if(|doc| {
                let pos = doc.projects.iter().position(|p| p.id == id)?;
                Some(doc.projects.remove(pos))
            })
            .await?;
        if removed.is_some() {
            info!(id, "Project deleted");
        }
        Ok(removed.is_some())
    }

    // ── Presentation ────────────────────────────────────────────────────────

    pub async fn presentation(&self) -> Record {
        self.snapshot().await.presentation
    }

    pub async fn update_presentation(&self, partial: Record) -> Result<Record, StoreError> {
        let updated = self
            .apply(|doc| {
                merge_record(&mut doc.presentation, partial);
                doc.presentation.clone()
            })
            .await?;
        info!("Presentation updated");
        Ok(updated)
    }

    // ── Position-addressed records ──────────────────────────────────────────

    pub async fn records(&self, section: Section) -> Vec<Value> {
        self.snapshot().await.records(section).clone()
    }

    pub async fn record(&self, section: Section, index: &str) -> Option<Value> {
        let index = parse_index(index)?;
        self.snapshot().await.records(section).get(index).cloned()
    }

    pub async fn add_record(&self, section: Section, item: Record) -> Result<Record, StoreError> {
        let created = self
            .apply(|doc| {
                let mut record = section.default_record();
                merge_record(&mut record, item);
                doc.records_mut(section).push(Value::Object(record.clone()));
                record
            })
            .await?;
        info!(section = section.label(), "Record added");
        Ok(created)
    }

    pub async fn update_record(
        &self,
        section: Section,
        index: &str,
        partial: Record,
    ) -> Result<Option<Value>, StoreError> {
        let Some(index) = parse_index(index) else {
            return Ok(None);
        };
        let updated = self
            .apply_if(|doc| {
                let entry = doc.records_mut(section).get_mut(index)?;
                // A non-object entry is replaced by the partial alone.
                let mut record = match entry.take() {
                    Value::Object(map) => map,
                    _ => Record::new(),
                };
                merge_record(&mut record, partial);
                *entry = Value::Object(record);
                Some(entry.clone())
            })
            .await?;
        if updated.is_some() {
            info!(section = section.label(), index, "Record updated");
        }
        Ok(updated)
    }

    pub async fn delete_record(&self, section: Section, index: &str) -> Result<bool, StoreError> {
        let Some(index) = parse_index(index) else {
            return Ok(false);
        };
        let removed = self
            .apply_if(|doc| {
                let list = doc.records_mut(section);
                (index < list.len()).then(|| list.remove(index))
            })
            .await?;
        if removed.is_some() {
            info!(section = section.label(), index, "Record deleted");
        }
        Ok(removed.is_some())
    }

    // ── Text lists ──────────────────────────────────────────────────────────

    pub async fn texts(&self, list: TextList) -> Vec<String> {
        self.snapshot().await.texts(list).clone()
    }

    /// Replaces the whole list. Non-array input clears it.
    pub async fn replace_texts(
        &self,
        list: TextList,
        items: Value,
    ) -> Result<Vec<String>, StoreError> {
        let items: Vec<String> = match items {
            Value::Array(values) => values.iter().map(coerce_text).collect(),
            _ => Vec::new(),
        };
        let stored = self
            .apply(|doc| {
                *doc.texts_mut(list) = items;
                doc.texts(list).clone()
            })
            .await?;
        info!(list = list.label(), len = stored.len(), "List replaced");
        Ok(stored)
    }

    /// Appends one item and returns the whole list. A null item appends
    /// nothing, but the document is still rewritten.
    pub async fn push_text(
        &self,
        list: TextList,
        item: Option<Value>,
    ) -> Result<Vec<String>, StoreError> {
        let item = item.filter(|v| !v.is_null()).map(|v| coerce_text(&v));
        let stored = self
            .apply(|doc| {
                let texts = doc.texts_mut(list);
                texts.extend(item);
                texts.clone()
            })
            .await?;
        info!(list = list.label(), len = stored.len(), "List item appended");
        Ok(stored)
    }

    pub async fn delete_text(&self, list: TextList, index: &str) -> Result<bool, StoreError> {
        let Some(index) = parse_index(index) else {
            return Ok(false);
        };
        let removed = self
            .apply_if(|doc| {
                let texts = doc.texts_mut(list);
                (index < texts.len()).then(|| texts.remove(index))
            })
            .await?;
        if removed.is_some() {
            info!(list = list.label(), index, "List item deleted");
        }
        Ok(removed.is_some())
    }
}
