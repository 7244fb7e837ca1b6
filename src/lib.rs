//! # samplebook
//!
//! A small CRUD record book:
//! - JSON collection persisted as one blob behind a storage port
//! - Store-assigned, monotonically increasing record ids
//! - Column-driven table and form models
//! - Case-insensitive search over the displayed columns
//! - A view state machine with an explicit in-flight guard
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Front end (CLI / UI)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ actions / snapshots
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   ViewController                             │
//! │        (Phase machine, ColumnModel, FilterIndex)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ get_columns / get_records / mutations
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    RecordStore  ──────▶  Notifier            │
//! │                 (Single Writer)          (toasts)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ get / set blob
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Memory    │          │    File     │
//!   │ (RwLock)    │          │ (CRC frame) │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod notify;
pub mod store;
pub mod columns;
pub mod filter;
pub mod view;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, StoreError, ViewError};
pub use config::{Config, LatencyProfile, StorageBackend};
pub use record::{Collection, Record, RecordId, Schema, Value};
pub use store::RecordStore;
pub use view::ViewController;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of samplebook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
