//! Record Module
//!
//! The data model shared by every other layer.
//!
//! ## Responsibilities
//! - `Value`: the variant cell type (text, number or null)
//! - `Record`: a row, an optional store-assigned id plus named fields
//! - `Schema`: the ordered, session-fixed column list
//! - Blob codec: the JSON array persisted under the collection key
//!
//! ## Persisted Shape
//! ```text
//! [
//!   { "id": 1, "name": "Sample 1", "description": "First sample entry" },
//!   { "id": 2, "name": "Sample 2", "description": "Second sample entry" }
//! ]
//! ```

mod codec;
mod schema;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use codec::{decode_collection, encode_collection, validate_collection};
pub use schema::{Schema, ID_COLUMN};

/// Store-assigned record identifier
pub type RecordId = u64;

/// The full ordered set of persisted records
pub type Collection = Vec<Record>;

/// A single cell value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(serde_json::Number),
    Text(String),
}

impl Value {
    /// Text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Integer value
    pub fn number(n: i64) -> Self {
        Value::Number(n.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    /// Cell text as shown in the table; null renders empty
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::number(n)
    }
}

/// One row of the collection
///
/// Persisted records always carry an `id`; records built by the form for
/// `create` do not, and any `id` they carry is ignored by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,

    #[serde(flatten)]
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create an empty record without an id
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style id setter
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Builder-style field setter
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: RecordId) {
        self.id = Some(id);
    }

    /// Drop the id, turning the record back into an unsaved one
    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Iterate over the named fields (the id is not a field)
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Overwrite the fields present in `patch`, keep the others
    pub fn merge_from(&mut self, patch: &Record) {
        for (column, value) in &patch.fields {
            self.fields.insert(column.clone(), value.clone());
        }
    }

    /// Text shown in the table cell for `column`
    ///
    /// `id` renders as its decimal form; missing fields render empty.
    pub fn display_value(&self, column: &str) -> String {
        if column == ID_COLUMN {
            return self.id.map(|id| id.to_string()).unwrap_or_default();
        }
        self.fields
            .get(column)
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}
