//! Reconciling a record sequence into one rectangular table.
//!
//! Records leaving the pipeline do not all share the same columns: filters
//! never touch columns, but map-append stages only add columns to the rows
//! they apply to. The materializer reconciles them into a single header
//! (first-seen column order) and emits one fixed-width row per record,
//! filling unset columns with the empty string.

use indexmap::IndexSet;

use crate::record::Record;

/// A rectangular table: every row has exactly `header.len()` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Build the output table from the final record sequence.
///
/// `known_columns` is the header accumulated by the engine (original input
/// columns followed by declared annotator fields, in first-seen order). Any
/// column present on a record but absent from it is appended afterwards, in
/// first-seen order across the sequence, so the result is deterministic
/// regardless of how the records were produced.
pub fn materialize(known_columns: &[String], records: &[Record]) -> Table {
    let mut header: IndexSet<String> = known_columns.iter().cloned().collect();
    for record in records {
        for column in record.columns() {
            if !header.contains(column) {
                header.insert(column.to_string());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            header
                .iter()
                .map(|column| record.get(column).unwrap_or("").to_string())
                .collect()
        })
        .collect();

    Table {
        header: header.into_iter().collect(),
        rows,
    }
}
