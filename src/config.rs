//! Configuration for samplebook
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, StoreError};
use crate::record::{Record, Value};

/// Main configuration for a samplebook instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for blob files (file backend only)
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {collection_key}.blob
    pub data_dir: PathBuf,

    /// Which blob store backs the record store
    pub backend: StorageBackend,

    /// Logical name of the persisted collection blob
    pub collection_key: String,

    // -------------------------------------------------------------------------
    // Schema Configuration
    // -------------------------------------------------------------------------
    /// Ordered column names, fixed for the session. Must contain `id`.
    pub columns: Vec<String>,

    /// Columns never shown in the table nor scanned by search
    pub hidden_columns: Vec<String>,

    /// Columns edited with a multi-line input
    pub multiline_columns: Vec<String>,

    /// Rows written on the first read of a missing collection
    pub seed_records: Vec<Record>,

    // -------------------------------------------------------------------------
    // Presentation / Simulation
    // -------------------------------------------------------------------------
    /// Singular noun used in notification texts ("Sample added successfully")
    pub entity_name: String,

    /// Artificial delay before each store operation
    pub latency: LatencyProfile,
}

/// Blob store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process-local map, lost on exit
    Memory,

    /// One checksummed file per blob under `data_dir`
    File,
}

/// Simulated I/O latency per operation class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Before `get_columns`
    pub schema: Duration,

    /// Before `get_records`
    pub read: Duration,

    /// Before `create` / `update` / `delete`
    pub write: Duration,
}

impl LatencyProfile {
    /// No artificial delay
    pub fn none() -> Self {
        Self::default()
    }

    /// The delays of a slow remote backend (300 ms schema, 500 ms otherwise)
    pub fn simulated() -> Self {
        Self {
            schema: Duration::from_millis(300),
            read: Duration::from_millis(500),
            write: Duration::from_millis(500),
        }
    }
}

/// The three fixed rows a fresh collection starts with
pub fn default_seed_records() -> Vec<Record> {
    [
        (1, "Sample 1", "First sample entry"),
        (2, "Sample 2", "Second sample entry"),
        (3, "Sample 3", "Third sample entry"),
    ]
    .into_iter()
    .map(|(id, name, description)| {
        Record::new()
            .with_id(id)
            .with("name", Value::text(name))
            .with("description", Value::text(description))
    })
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./samplebook_data"),
            backend: StorageBackend::File,
            collection_key: "samples".to_string(),
            columns: vec!["id".into(), "name".into(), "description".into()],
            hidden_columns: vec!["status".into(), "created_at".into()],
            multiline_columns: vec!["description".into()],
            seed_records: default_seed_records(),
            entity_name: "Sample".to_string(),
            latency: LatencyProfile::none(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the settings that would otherwise fail late at the storage layer
    pub fn validate(&self) -> Result<()> {
        let key_ok = !self.collection_key.is_empty()
            && self
                .collection_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !key_ok {
            return Err(StoreError::Config(format!(
                "collection key '{}' must be non-empty [A-Za-z0-9_-]",
                self.collection_key
            )));
        }

        if self.entity_name.trim().is_empty() {
            return Err(StoreError::Config("entity name must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for blob files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the blob store backend
    pub fn backend(mut self, backend: StorageBackend) -> Self {
        self.config.backend = backend;
        self
    }

    /// Set the logical blob key of the collection
    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.config.collection_key = key.into();
        self
    }

    /// Set the ordered column list
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the columns hidden from table and search
    pub fn hidden_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hidden_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the columns rendered as multi-line form inputs
    pub fn multiline_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.multiline_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rows used to seed an absent collection
    pub fn seed_records(mut self, records: Vec<Record>) -> Self {
        self.config.seed_records = records;
        self
    }

    /// Set the noun used in notifications
    pub fn entity_name(mut self, name: impl Into<String>) -> Self {
        self.config.entity_name = name.into();
        self
    }

    /// Set the simulated latency profile
    pub fn latency(mut self, latency: LatencyProfile) -> Self {
        self.config.latency = latency;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
