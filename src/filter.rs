//! Filter Index
//!
//! Case-insensitive substring search over the displayable columns.
//!
//! The index folds every cell of every record once; each query then only
//! folds the query string and scans the prepared haystacks.

use crate::record::Record;

/// Result of a search over the record list
#[derive(Debug, PartialEq)]
pub enum FilterOutcome<'a> {
    /// The list itself is empty, whatever the query
    EmptyStore,

    /// Records exist but none matches the query
    NoMatches,

    /// Matching records in original order
    Matches(Vec<&'a Record>),
}

impl<'a> FilterOutcome<'a> {
    /// Matching records (empty for the two empty states)
    pub fn records(&self) -> &[&'a Record] {
        match self {
            FilterOutcome::Matches(records) => records.as_slice(),
            FilterOutcome::EmptyStore | FilterOutcome::NoMatches => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// Search index over one record list and one column set
pub struct FilterIndex<'a> {
    /// (record, folded cell text per displayable column)
    entries: Vec<(&'a Record, Vec<String>)>,
}

impl<'a> FilterIndex<'a> {
    /// Prepare folded cell text for every record
    pub fn new(records: &'a [Record], columns: &[String]) -> Self {
        let entries = records
            .iter()
            .map(|record| {
                let cells = columns
                    .iter()
                    .map(|column| fold(&record.display_value(column)))
                    .collect();
                (record, cells)
            })
            .collect();

        Self { entries }
    }

    /// Records whose displayable cells contain `query`, ignoring case
    ///
    /// An empty query matches every record.
    pub fn search(&self, query: &str) -> FilterOutcome<'a> {
        if self.entries.is_empty() {
            return FilterOutcome::EmptyStore;
        }

        // An empty query matches everything, even with no columns to scan
        if query.is_empty() {
            return FilterOutcome::Matches(self.entries.iter().map(|(r, _)| *r).collect());
        }

        let needle = fold(query);
        let matches: Vec<&'a Record> = self
            .entries
            .iter()
            .filter(|(_, cells)| cells.iter().any(|cell| cell.contains(&needle)))
            .map(|(record, _)| *record)
            .collect();

        if matches.is_empty() {
            FilterOutcome::NoMatches
        } else {
            FilterOutcome::Matches(matches)
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-character lowercase
///
/// `str::to_lowercase` is context sensitive (final sigma), which would let a
/// longer query fold to a string that is not an extension of the shorter one.
fn fold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}
