//! Column schema
//!
//! An ordered list of column names, fixed for the session and
//! independent of whatever the stored rows happen to contain.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Result, StoreError};

use super::Record;

/// Name of the identifier column
pub const ID_COLUMN: &str = "id";

/// Ordered column list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema, rejecting lists without `id`, with blank or duplicate names
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if !columns.iter().any(|c| c == ID_COLUMN) {
            return Err(StoreError::SchemaLoad(format!(
                "column list {:?} has no '{}' column",
                columns, ID_COLUMN
            )));
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.trim().is_empty() {
                return Err(StoreError::SchemaLoad("blank column name".to_string()));
            }
            if !seen.insert(column.as_str()) {
                return Err(StoreError::SchemaLoad(format!(
                    "duplicate column '{}'",
                    column
                )));
            }
        }

        Ok(Self { columns })
    }

    /// The schema handed out when loading failed
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Every column except `id`, in schema order
    pub fn editable_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != ID_COLUMN)
    }

    /// Reject records carrying fields outside the editable columns
    pub fn validate_fields(&self, record: &Record) -> Result<()> {
        for (column, _) in record.fields() {
            if column == ID_COLUMN || !self.contains(column) {
                return Err(StoreError::SchemaViolation(format!(
                    "'{}' is not an editable column of {:?}",
                    column, self.columns
                )));
            }
        }
        Ok(())
    }
}
