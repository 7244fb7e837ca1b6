//! Render models
//!
//! Plain data describing what a front end should draw: table headers and
//! cells, empty states, and the generated form.

use crate::columns::{label, placeholder, ColumnModel, FieldKind};
use crate::filter::{FilterIndex, FilterOutcome};
use crate::record::{Record, RecordId};

use super::state::{FormState, PhaseKind};

/// Shown instead of the table while loading
pub const LOADING_MESSAGE: &str = "Loading data...";

/// Body of the delete confirmation dialog
pub const DELETE_CONFIRM_MESSAGE: &str =
    "This action cannot be undone. This will permanently delete the record from the database.";

/// Everything a front end needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    pub phase: PhaseKind,

    /// `None` while loading
    pub table: Option<TableView>,

    /// `Some` while the form is open
    pub form: Option<FormView>,

    /// Id awaiting delete confirmation
    pub delete_confirm: Option<RecordId>,

    pub search: String,
    pub last_error: Option<String>,
}

/// Why the table has no rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself is empty
    NoRecords,

    /// The search query filters every record out
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoRecords => "No records found in the samples table.",
            EmptyState::NoMatches => "No records match the current search.",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            EmptyState::NoRecords => "Add a new record to get started.",
            EmptyState::NoMatches => "Try a shorter or different search term.",
        }
    }
}

/// Table of the filtered records
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
    pub empty: Option<EmptyState>,
}

/// One table row
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub id: RecordId,
    pub cells: Vec<String>,
}

impl TableView {
    /// Filter `records` by `search` and lay out the displayable columns
    pub fn build(records: &[Record], columns: &ColumnModel, search: &str) -> Self {
        let index = FilterIndex::new(records, columns.displayable());
        let outcome = index.search(search);

        let empty = match outcome {
            FilterOutcome::EmptyStore => Some(EmptyState::NoRecords),
            FilterOutcome::NoMatches => Some(EmptyState::NoMatches),
            FilterOutcome::Matches(_) => None,
        };

        let rows = outcome
            .records()
            .iter()
            .map(|record| RowView {
                // listed records are persisted, so always carry an id
                id: record.id().unwrap_or_default(),
                cells: columns
                    .displayable()
                    .iter()
                    .map(|c| record.display_value(c))
                    .collect(),
            })
            .collect();

        Self {
            headers: columns.headers(),
            rows,
            empty,
        }
    }
}

/// The generated create/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub fields: Vec<FieldView>,
    pub error: Option<String>,
    pub submitting: bool,
}

/// One form input
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub placeholder: String,
    pub kind: FieldKind,
    pub value: String,
}

impl FormView {
    pub fn build(form: &FormState, columns: &ColumnModel) -> Self {
        let (title, submit_label) = if form.is_edit() {
            ("Edit Record", "Update")
        } else {
            ("Add New Record", "Create")
        };

        let fields = form
            .draft
            .values()
            .map(|(name, value)| FieldView {
                name: name.to_string(),
                label: label(name),
                placeholder: placeholder(name),
                kind: columns.field_kind(name),
                value: value.to_string(),
            })
            .collect();

        Self {
            title,
            submit_label,
            fields,
            error: form.error.clone(),
            submitting: form.submitting,
        }
    }
}
