//! Document storage.
//!
//! Documents are write-once: after ingestion they are never modified, so the
//! store hands out shared [`Arc`] handles and readers never need a lock on a
//! document itself.

use crate::error::{Error, Result};
use crate::model::{Document, DocumentId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A write-once store of ingested documents.
pub trait DocumentStore: Send + Sync {
    /// Store a document. Fails if a document with the same id exists.
    fn insert(&self, document: Document) -> Result<Arc<Document>>;

    /// Look up a document by id.
    fn get(&self, id: &DocumentId) -> Result<Option<Arc<Document>>>;

    /// All documents in insertion order.
    fn documents(&self) -> Result<Vec<Arc<Document>>>;

    /// Remove a document, returning it if it was stored.
    fn remove(&self, id: &DocumentId) -> Result<Option<Arc<Document>>>;

    /// Number of stored documents.
    fn len(&self) -> Result<usize> {
        Ok(self.documents()?.len())
    }

    /// Check if the store is empty.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug, Default)]
struct Entries {
    by_id: HashMap<DocumentId, Arc<Document>>,
    order: Vec<DocumentId>,
}

/// Thread-safe in-memory document store.
///
/// Cloning the store shares the underlying entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<Entries>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Persistence("document store lock poisoned".into())
}

impl DocumentStore for MemoryStore {
    fn insert(&self, document: Document) -> Result<Arc<Document>> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let id = document.id().clone();
        if entries.by_id.contains_key(&id) {
            return Err(Error::DuplicateDocument(id.to_string()));
        }

        let document = Arc::new(document);
        entries.by_id.insert(id.clone(), Arc::clone(&document));
        entries.order.push(id);
        log::debug!("Stored document {} ({})", document.id(), document.title());
        Ok(document)
    }

    fn get(&self, id: &DocumentId) -> Result<Option<Arc<Document>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.by_id.get(id).cloned())
    }

    fn documents(&self) -> Result<Vec<Arc<Document>>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id).cloned())
            .collect())
    }

    fn remove(&self, id: &DocumentId) -> Result<Option<Arc<Document>>> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let removed = entries.by_id.remove(id);
        if removed.is_some() {
            entries.order.retain(|stored| stored != id);
        }
        Ok(removed)
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries.read().map_err(poisoned)?.order.len())
    }
}
