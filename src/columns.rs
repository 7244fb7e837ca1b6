//! Column Model
//!
//! Derives the column sets the view works with from the schema:
//! editable columns drive the form, displayable columns drive the table
//! headers, the row cells and the search index.

use crate::record::{Schema, ID_COLUMN};

/// Characters treated as word separators in column names
const WORD_SEPARATORS: [char; 2] = ['_', '-'];

/// How a form field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    SingleLine,
    MultiLine,
}

/// Derived column sets for one schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnModel {
    editable: Vec<String>,
    displayable: Vec<String>,
    multiline: Vec<String>,
}

impl ColumnModel {
    /// Derive both column sets from `schema`
    ///
    /// Editable: schema minus `id`. Displayable: schema minus `hidden`.
    /// Both keep schema order.
    pub fn derive(schema: &Schema, hidden: &[String], multiline: &[String]) -> Self {
        let editable = schema.editable_columns().map(str::to_string).collect();
        let displayable = schema
            .columns()
            .iter()
            .filter(|c| !hidden.contains(*c))
            .cloned()
            .collect();

        Self {
            editable,
            displayable,
            multiline: multiline.to_vec(),
        }
    }

    pub fn editable(&self) -> &[String] {
        &self.editable
    }

    pub fn displayable(&self) -> &[String] {
        &self.displayable
    }

    pub fn is_editable(&self, column: &str) -> bool {
        column != ID_COLUMN && self.editable.iter().any(|c| c == column)
    }

    /// Input kind for an editable column
    pub fn field_kind(&self, column: &str) -> FieldKind {
        if self.multiline.iter().any(|c| c == column) {
            FieldKind::MultiLine
        } else {
            FieldKind::SingleLine
        }
    }

    /// Human-readable headers for the displayable columns
    pub fn headers(&self) -> Vec<String> {
        self.displayable.iter().map(|c| label(c)).collect()
    }
}

/// Turn a column name into a header/label: `created_at` → `created at`
pub fn label(column: &str) -> String {
    column.replace(WORD_SEPARATORS, " ")
}

/// Input placeholder for a column: `Enter created at`
pub fn placeholder(column: &str) -> String {
    format!("Enter {}", label(column))
}
