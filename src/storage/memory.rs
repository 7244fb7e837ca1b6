//! In-memory blob store

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;

use super::BlobStore;

/// Blob store kept in a process-local map
///
/// `Bytes` clones are reference counted, so reads never copy the payload.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `blob` already stored under `key`
    pub fn with_blob(key: impl Into<String>, blob: impl Into<Bytes>) -> Self {
        let store = Self::new();
        store.blobs.write().insert(key.into(), blob.into());
        store
    }

    /// Raw access for inspection (bypasses the async port)
    pub fn snapshot(&self, key: &str) -> Option<Bytes> {
        self.blobs.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.blobs.read().get(key).cloned())
    }

    async fn set(&self, key: &str, blob: Bytes) -> Result<()> {
        self.blobs.write().insert(key.to_string(), blob);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
