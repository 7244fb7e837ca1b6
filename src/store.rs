//! Record Store
//!
//! Owns the persisted collection and the column schema.
//!
//! ## Responsibilities
//! - Serve the fixed column list and the current collection
//! - Seed the collection with sample rows on first read
//! - Assign ids and persist create/update/delete as full rewrites
//! - Report every mutation attempt and every read failure on the
//!   notification channel
//!
//! ## Error Policy
//! Reads degrade: a failed `get_columns`/`get_records` is logged, notified
//! and answered with an empty result. Mutations are logged, notified and
//! the error is returned so the caller can keep its form open.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::notify::{Notification, Notifier};
use crate::record::{
    decode_collection, encode_collection, validate_collection, Collection, Record, RecordId,
    Schema,
};
use crate::storage::{self, BlobStore};

/// The record store
///
/// ## Concurrency Model: Single Writer
///
/// - **Mutations** (create/update/delete/seed): serialized by `write_lock`.
///   Each one reads the full collection, computes the new one and writes it
///   back while holding the lock, so in-process writers never lose updates.
/// - **Reads**: go straight to the blob store, which replaces blobs
///   atomically, so a read sees the collection before or after a mutation.
pub struct RecordStore {
    /// Store configuration (schema, keys, latency)
    config: Config,

    /// Persistence port
    blobs: Arc<dyn BlobStore>,

    /// User-visible success/failure messages
    notifier: Arc<dyn Notifier>,

    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Create a store over an explicit blob store
    pub fn new(config: Config, blobs: Arc<dyn BlobStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            blobs,
            notifier,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store over the backend selected in `config`
    pub fn open(config: Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let blobs = storage::open_backend(&config)?;
        tracing::debug!(
            backend = blobs.name(),
            key = %config.collection_key,
            "record store opened"
        );
        Ok(Self::new(config, blobs, notifier))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Return the fixed column list
    ///
    /// On failure the error is notified and an empty schema is returned.
    pub async fn get_columns(&self) -> Schema {
        Self::simulate(self.config.latency.schema).await;

        match self.schema() {
            Ok(schema) => schema,
            Err(e) => {
                tracing::error!(error = %e, "failed to load columns");
                self.notifier
                    .notify(Notification::error("Failed to load table structure"));
                Schema::empty()
            }
        }
    }

    /// Return the current collection, seeding it on first access
    ///
    /// On failure the error is notified and an empty collection is returned.
    pub async fn get_records(&self) -> Collection {
        Self::simulate(self.config.latency.read).await;

        match self.load_or_seed().await {
            Ok(records) => {
                tracing::debug!(count = records.len(), "records loaded");
                records
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load records");
                self.notifier.notify(Notification::error("Failed to load data"));
                Collection::new()
            }
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a new record and return it with its assigned id
    ///
    /// The new id is the largest existing id plus one (1 for an empty
    /// collection). Any id on `record` is ignored.
    pub async fn create(&self, record: Record) -> Result<Record> {
        Self::simulate(self.config.latency.write).await;

        let result = self.create_internal(record).await;
        self.report("create", result, "added", "Failed to add new record")
    }

    /// Merge `patch` into the record with `id`
    ///
    /// Fields present in `patch` overwrite, others are kept; the id is
    /// always `id` whatever `patch` carries.
    pub async fn update(&self, id: RecordId, patch: Record) -> Result<Record> {
        Self::simulate(self.config.latency.write).await;

        let result = self.update_internal(id, patch).await;
        self.report("update", result, "updated", "Failed to update record")
    }

    /// Remove the record with `id`; a missing id is not an error
    pub async fn delete(&self, id: RecordId) -> Result<()> {
        Self::simulate(self.config.latency.write).await;

        let result = self.delete_internal(id).await;
        self.report("delete", result, "deleted", "Failed to delete record")
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the blob backend in use
    pub fn backend_name(&self) -> &'static str {
        self.blobs.name()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn schema(&self) -> Result<Schema> {
        Schema::new(self.config.columns.clone())
    }

    async fn create_internal(&self, record: Record) -> Result<Record> {
        let record = record.without_id();
        self.schema()?.validate_fields(&record)?;

        let _write_guard = self.write_lock.lock().await;
        let mut records = self.load_locked().await?;

        let next_id = records
            .iter()
            .filter_map(Record::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| StoreError::StoreWrite("record id space exhausted".to_string()))?;
        let mut stored = record;
        stored.set_id(next_id);

        records.push(stored.clone());
        self.persist(&records).await?;

        Ok(stored)
    }

    async fn update_internal(&self, id: RecordId, patch: Record) -> Result<Record> {
        self.schema()?.validate_fields(&patch)?;

        let _write_guard = self.write_lock.lock().await;
        let mut records = self.load_locked().await?;

        let target = records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or(StoreError::NotFound { id })?;
        target.merge_from(&patch);
        let updated = target.clone();

        self.persist(&records).await?;

        Ok(updated)
    }

    async fn delete_internal(&self, id: RecordId) -> Result<()> {
        let _write_guard = self.write_lock.lock().await;
        let mut records = self.load_locked().await?;

        let before = records.len();
        records.retain(|r| r.id() != Some(id));

        if records.len() == before {
            tracing::debug!(id, "delete of absent record, nothing to write");
            return Ok(());
        }

        self.persist(&records).await
    }

    /// Read the collection, seeding it under the write lock if absent
    async fn load_or_seed(&self) -> Result<Collection> {
        if let Some(records) = self.read_collection().await? {
            return Ok(records);
        }

        // Re-check under the lock: a concurrent caller may have seeded already
        let _write_guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    /// Read the collection; the caller holds `write_lock`
    async fn load_locked(&self) -> Result<Collection> {
        match self.read_collection().await? {
            Some(records) => Ok(records),
            None => self.seed().await,
        }
    }

    async fn read_collection(&self) -> Result<Option<Collection>> {
        let blob = self.blobs.get(&self.config.collection_key).await?;
        blob.map(|b| decode_collection(&b)).transpose()
    }

    /// Write the configured sample rows; the caller holds `write_lock`
    async fn seed(&self) -> Result<Collection> {
        let records = self.config.seed_records.clone();
        validate_collection(&records)?;

        self.persist(&records).await?;
        tracing::info!(
            count = records.len(),
            key = %self.config.collection_key,
            "seeded empty collection"
        );

        Ok(records)
    }

    async fn persist(&self, records: &[Record]) -> Result<()> {
        let blob = encode_collection(records)?;
        self.blobs.set(&self.config.collection_key, blob).await
    }

    /// Log and notify the outcome of a mutation, passing the result through
    fn report<T>(&self, op: &'static str, result: Result<T>, verb: &str, failure: &str) -> Result<T> {
        match &result {
            Ok(_) => {
                tracing::info!(op, "mutation committed");
                self.notifier.notify(Notification::success(format!(
                    "{} {} successfully",
                    self.config.entity_name, verb
                )));
            }
            Err(e) => {
                tracing::error!(op, error = %e, "mutation failed");
                self.notifier.notify(Notification::error(failure));
            }
        }
        result
    }

    async fn simulate(delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
