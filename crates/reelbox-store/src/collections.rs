use reelbox_core::config::DEFAULT_STORAGE_KEY;
use reelbox_core::error::ReelboxError;
use reelbox_core::models::collection::Collection;

use crate::kv::KvStore;

/// Maps the in-memory collection list to a single blob in a [`KvStore`].
pub struct CollectionStore {
    backend: Box<dyn KvStore>,
    key: String,
}

impl CollectionStore {
    pub fn new(backend: Box<dyn KvStore>) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: Box<dyn KvStore>, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored collections.
    ///
    /// Never fails: a missing key, an unreadable backend, or a blob that does
    /// not parse all yield an empty list.
    pub fn load(&self) -> Vec<Collection> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "collection store unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Option<Vec<Collection>>>(&raw) {
            Ok(collections) => {
                let collections = collections.unwrap_or_default();
                tracing::debug!(count = collections.len(), "loaded collections");
                collections
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "collection blob is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Persist `collections`, replacing whatever was stored.
    pub fn save(&self, collections: &[Collection]) -> Result<(), ReelboxError> {
        let blob = Self::serialize(collections)?;
        self.backend.set(&self.key, &blob)
    }

    /// The exact text `save` writes for `collections`.
    pub fn serialize(collections: &[Collection]) -> Result<String, ReelboxError> {
        Ok(serde_json::to_string(collections)?)
    }

    /// The raw stored blob, if any.
    pub fn raw(&self) -> Result<Option<String>, ReelboxError> {
        self.backend.get(&self.key)
    }
}
