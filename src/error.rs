//! Error types for samplebook
//!
//! `StoreError` covers everything behind the record store boundary,
//! `ViewError` covers the view state machine on top of it.

use thiserror::Error;

use crate::record::RecordId;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Schema Errors
    // -------------------------------------------------------------------------
    #[error("Schema load error: {0}")]
    SchemaLoad(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    // -------------------------------------------------------------------------
    // Persistence Errors
    // -------------------------------------------------------------------------
    #[error("Store read error: {0}")]
    StoreRead(String),

    #[error("Store write error: {0}")]
    StoreWrite(String),

    #[error("Record {id} not found")]
    NotFound { id: RecordId },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Errors raised by the view controller
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Another operation is still in flight")]
    OperationInFlight,

    #[error("Cannot {action} while {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Record {id} is not in the current list")]
    UnknownRecord { id: RecordId },

    #[error("Column '{0}' is not editable")]
    UnknownColumn(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
