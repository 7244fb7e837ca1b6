//! Storage Module
//!
//! The persistence port behind the record store: opaque blobs by key.
//!
//! ## Responsibilities
//! - Get/set a whole blob under a logical key
//! - Nothing else: no partial writes, no listing, no schema knowledge
//!
//! ## Backends
//! - `MemoryBlobStore`: process-local map, the in-memory fake for tests
//! - `FileBlobStore`: one checksummed file per key, replaced atomically
//!
//! ## File Format
//! ```text
//! ┌──────────┬─────────┬─────────┬──────────────────┐
//! │Magic (4) │ CRC (4) │ Len (4) │ Payload (JSON)   │
//! └──────────┴─────────┴─────────┴──────────────────┘
//! ```

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::{Config, StorageBackend};
use crate::error::Result;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;

/// Key/blob persistence port
///
/// `set` replaces the whole blob: a later `get` returns either the previous
/// blob or the new one, never a mix.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Replace the blob stored under `key`
    async fn set(&self, key: &str, blob: Bytes) -> Result<()>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Build the backend selected by `config`
pub fn open_backend(config: &Config) -> Result<Arc<dyn BlobStore>> {
    config.validate()?;

    let store: Arc<dyn BlobStore> = match config.backend {
        StorageBackend::Memory => Arc::new(MemoryBlobStore::new()),
        StorageBackend::File => Arc::new(FileBlobStore::new(&config.data_dir)),
    };
    Ok(store)
}
