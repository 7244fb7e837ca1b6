//! View phases and their transitions
//!
//! Transitions here are pure: they inspect the current phase and return the
//! next one, or `InvalidTransition` leaving the caller's state untouched.

use crate::columns::ColumnModel;
use crate::error::ViewError;
use crate::record::{Record, RecordId, Value};

/// Coarse phase, for rendering and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Loading,
    Loaded,
    FormOpen,
    DeleteConfirm,
}

/// What the open form will do on submit
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit { id: RecordId },
}

/// In-progress form values, one entry per editable column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    /// (column, text, touched)
    entries: Vec<(String, String, bool)>,
}

impl FormDraft {
    /// Blank draft for a new record
    pub fn empty(columns: &[String]) -> Self {
        Self {
            entries: columns
                .iter()
                .map(|c| (c.clone(), String::new(), false))
                .collect(),
        }
    }

    /// Draft prefilled from an existing record
    pub fn from_record(record: &Record, columns: &[String]) -> Self {
        Self {
            entries: columns
                .iter()
                .map(|c| (c.clone(), record.display_value(c), false))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, _, _)| c == column)
            .map(|(_, text, _)| text.as_str())
    }

    /// Set a field's text; false if the draft has no such column
    pub fn set(&mut self, column: &str, text: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(c, _, _)| c == column) {
            Some(entry) => {
                entry.1 = text.into();
                entry.2 = true;
                true
            }
            None => false,
        }
    }

    /// Iterate (column, text) in column order
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(c, text, _)| (c.as_str(), text.as_str()))
    }

    /// Record to submit
    ///
    /// Only touched fields are submitted: a create leaves untouched fields
    /// out of the record, an edit keeps their stored values and types.
    pub fn to_record(&self) -> Record {
        self.entries
            .iter()
            .filter(|(_, _, touched)| *touched)
            .fold(Record::new(), |record, (column, text, _)| {
                record.with(column.clone(), Value::text(text.clone()))
            })
    }
}

/// State of an open form
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: FormDraft,

    /// Error of the last failed submit
    pub error: Option<String>,

    /// A submit is waiting on the store
    pub submitting: bool,
}

impl FormState {
    fn new(mode: FormMode, draft: FormDraft) -> Self {
        Self {
            mode,
            draft,
            error: None,
            submitting: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }
}

/// Full view phase
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Loaded,
    FormOpen(FormState),
    DeleteConfirm { id: RecordId },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Loading => PhaseKind::Loading,
            Phase::Loaded => PhaseKind::Loaded,
            Phase::FormOpen(_) => PhaseKind::FormOpen,
            Phase::DeleteConfirm { .. } => PhaseKind::DeleteConfirm,
        }
    }

    /// Phase description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Phase::Loading => "loading",
            Phase::Loaded => "showing the list",
            Phase::FormOpen(_) => "the form is open",
            Phase::DeleteConfirm { .. } => "confirming a delete",
        }
    }

    fn invalid(&self, action: &'static str) -> ViewError {
        ViewError::InvalidTransition {
            action,
            phase: self.describe(),
        }
    }

    /// Fail unless the list is showing
    pub fn ensure_loaded(&self, action: &'static str) -> Result<(), ViewError> {
        match self {
            Phase::Loaded => Ok(()),
            other => Err(other.invalid(action)),
        }
    }

    /// Loading/Loaded → Loading
    pub fn begin_refresh(&self) -> Result<Phase, ViewError> {
        match self {
            Phase::Loading | Phase::Loaded => Ok(Phase::Loading),
            other => Err(other.invalid("refresh")),
        }
    }

    /// Loaded → FormOpen(create)
    pub fn open_create(&self, columns: &ColumnModel) -> Result<Phase, ViewError> {
        match self {
            Phase::Loaded => Ok(Phase::FormOpen(FormState::new(
                FormMode::Create,
                FormDraft::empty(columns.editable()),
            ))),
            other => Err(other.invalid("add a record")),
        }
    }

    /// Loaded → FormOpen(edit, record)
    pub fn open_edit(&self, record: &Record, columns: &ColumnModel) -> Result<Phase, ViewError> {
        match self {
            Phase::Loaded => {
                let id = record.id().ok_or_else(|| self.invalid("edit an unsaved record"))?;
                Ok(Phase::FormOpen(FormState::new(
                    FormMode::Edit { id },
                    FormDraft::from_record(record, columns.editable()),
                )))
            }
            other => Err(other.invalid("edit a record")),
        }
    }

    /// FormOpen → Loaded, discarding the draft
    pub fn cancel_form(&self) -> Result<Phase, ViewError> {
        match self {
            Phase::FormOpen(_) => Ok(Phase::Loaded),
            other => Err(other.invalid("cancel the form")),
        }
    }

    /// Loaded → DeleteConfirm(id)
    pub fn request_delete(&self, id: RecordId) -> Result<Phase, ViewError> {
        match self {
            Phase::Loaded => Ok(Phase::DeleteConfirm { id }),
            other => Err(other.invalid("delete a record")),
        }
    }

    /// DeleteConfirm → Loading, yielding the id to delete
    pub fn confirm_delete(&self) -> Result<(Phase, RecordId), ViewError> {
        match self {
            Phase::DeleteConfirm { id } => Ok((Phase::Loading, *id)),
            other => Err(other.invalid("confirm a delete")),
        }
    }

    /// DeleteConfirm → Loaded
    pub fn cancel_delete(&self) -> Result<Phase, ViewError> {
        match self {
            Phase::DeleteConfirm { .. } => Ok(Phase::Loaded),
            other => Err(other.invalid("cancel a delete")),
        }
    }
}
