//! Content store trait and the in-memory implementation

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use super::document_id::DocumentId;
use super::errors::{ContentError, ContentResult};

/// Content-addressed text storage.
///
/// A pure key/value contract: no reveal logic lives here. `get` returns
/// `None` for an identifier that was never written or has been removed,
/// so an empty document is distinguishable from a missing one.
pub trait ContentStore: Send + Sync + fmt::Debug {
    /// Insert or overwrite the text stored under `id`
    fn put(&self, id: &DocumentId, text: &str) -> ContentResult<()>;

    /// Read the text stored under `id`
    fn get(&self, id: &DocumentId) -> ContentResult<Option<String>>;

    /// Delete the text stored under `id`; absent ids are not an error
    fn remove(&self, id: &DocumentId) -> ContentResult<()>;

    /// List stored identifiers in ascending order
    fn ids(&self) -> ContentResult<Vec<DocumentId>>;

    /// Whether `id` has stored text
    fn contains(&self, id: &DocumentId) -> ContentResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Identifier under which `text` is addressed
    fn hash(&self, text: &str) -> DocumentId {
        DocumentId::from_text(text)
    }
}

/// In-memory content store for testing and embedding
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    blobs: RwLock<HashMap<DocumentId, String>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ContentStore for InMemoryContentStore {
    fn put(&self, id: &DocumentId, text: &str) -> ContentResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| ContentError::lock_poisoned())?;
        blobs.insert(id.clone(), text.to_string());
        Ok(())
    }

    fn get(&self, id: &DocumentId) -> ContentResult<Option<String>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| ContentError::lock_poisoned())?;
        Ok(blobs.get(id).cloned())
    }

    fn remove(&self, id: &DocumentId) -> ContentResult<()> {
        let mut blobs = self
            .blobs
            .write()
            .map_err(|_| ContentError::lock_poisoned())?;
        blobs.remove(id);
        Ok(())
    }

    fn ids(&self) -> ContentResult<Vec<DocumentId>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|_| ContentError::lock_poisoned())?;
        let mut ids: Vec<_> = blobs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
