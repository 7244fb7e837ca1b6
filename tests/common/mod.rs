//! Shared helpers for the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use crossbeam::channel::Receiver;
use samplebook::notify::{ChannelNotifier, Notification};
use samplebook::storage::{BlobStore, MemoryBlobStore};
use samplebook::{Config, Record, RecordStore, StoreError};

// =============================================================================
// Failure Injection
// =============================================================================

/// Memory blob store whose reads and writes can be switched to fail
#[derive(Default)]
pub struct FlakyBlobStore {
    inner: MemoryBlobStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self, key: &str) -> Option<Bytes> {
        self.inner.snapshot(key)
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn get(&self, key: &str) -> samplebook::Result<Option<Bytes>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::StoreRead("injected read failure".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, blob: Bytes) -> samplebook::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::StoreWrite("injected write failure".to_string()));
        }
        self.inner.set(key, blob).await
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

// =============================================================================
// Setup Functions
// =============================================================================

/// A store over `blobs` with a channel notifier
pub fn store_over(
    config: Config,
    blobs: Arc<dyn BlobStore>,
) -> (Arc<RecordStore>, Receiver<Notification>) {
    let (notifier, notifications) = ChannelNotifier::new();
    let store = RecordStore::new(config, blobs, Arc::new(notifier));
    (Arc::new(store), notifications)
}

/// Default-config store over a fresh in-memory blob store
pub fn memory_store() -> (Arc<RecordStore>, Arc<MemoryBlobStore>, Receiver<Notification>) {
    let blobs = Arc::new(MemoryBlobStore::new());
    let (store, notifications) = store_over(Config::default(), blobs.clone());
    (store, blobs, notifications)
}

/// Default-config store over a failure-injecting blob store
pub fn flaky_store() -> (Arc<RecordStore>, Arc<FlakyBlobStore>, Receiver<Notification>) {
    let blobs = Arc::new(FlakyBlobStore::new());
    let (store, notifications) = store_over(Config::default(), blobs.clone());
    (store, blobs, notifications)
}

pub fn drain(notifications: &Receiver<Notification>) -> Vec<Notification> {
    notifications.try_iter().collect()
}

pub fn ids(records: &[Record]) -> Vec<u64> {
    records.iter().filter_map(Record::id).collect()
}

pub fn sample(name: &str, description: &str) -> Record {
    Record::new()
        .with("name", name)
        .with("description", description)
}
