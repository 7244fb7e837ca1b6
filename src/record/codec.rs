//! Collection blob codec
//!
//! Encodes the collection as a JSON array and checks the identifier
//! invariants when reading it back.

use std::collections::HashSet;

use bytes::Bytes;

use crate::error::{Result, StoreError};

use super::{Collection, Record};

/// Serialize a collection into the persisted blob
pub fn encode_collection(records: &[Record]) -> Result<Bytes> {
    let json = serde_json::to_vec(records)?;
    Ok(Bytes::from(json))
}

/// Parse a persisted blob
///
/// Fails with `Serialization` on malformed JSON, a record without `id`,
/// or two records sharing an `id`.
pub fn decode_collection(blob: &[u8]) -> Result<Collection> {
    let records: Collection = serde_json::from_slice(blob)?;
    validate_collection(&records)?;
    Ok(records)
}

/// Check that every record has an id and no id repeats
pub fn validate_collection(records: &[Record]) -> Result<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        let id = record.id().ok_or_else(|| {
            StoreError::Serialization(format!("record at position {} has no id", position))
        })?;
        if !seen.insert(id) {
            return Err(StoreError::Serialization(format!("duplicate id {}", id)));
        }
    }

    Ok(())
}
