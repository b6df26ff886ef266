//! Error taxonomy for the annotation pipeline.
//!
//! Every error aborts the whole pipeline run. The source data is a one-shot
//! batch export, so a bad row signals a data-quality problem to be fixed
//! upstream rather than skipped over; nothing is retried or recovered per-row.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, AnnotateError>;

/// Failure kinds raised while loading, annotating, or writing a table.
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// The input table had no rows at all, so no header is available.
    #[error("input table is empty (no header row)")]
    EmptyInput,

    /// CSV-level read or write failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure (e.g. creating the output directory).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A cell that should hold a serialized attribute map could not be parsed.
    #[error("column '{column}' does not contain a valid attribute map: {source}")]
    EmbeddedParse {
        column: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required input field (top-level or embedded) is absent.
    #[error("required field '{field}' is missing")]
    MissingField { field: String },

    /// A list-select annotator matched none of its candidate patterns.
    #[error("no element of '{input}' matched any of [{patterns}]")]
    NoMatch { input: String, patterns: String },

    /// A table-driven lookup received a key outside its fixed domain.
    #[error("no entry for '{code}' in the {table} table")]
    UnknownCode { table: String, code: String },

    /// An annotator returned a field it never declared. This is a bug in the
    /// annotator, not bad data, but it is checked defensively all the same.
    #[error("annotator '{annotator}' produced undeclared field '{field}'")]
    UndeclaredField { annotator: String, field: String },

    /// A regex pattern handed to a combinator failed to compile.
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Wrapper attaching the failing annotator and input row to an error
    /// raised inside a map-append stage.
    #[error("annotator '{annotator}' failed on input row {row}: {source}")]
    RowFailed {
        annotator: String,
        /// 1-based data row number in the original input (header not counted).
        row: usize,
        #[source]
        source: Box<AnnotateError>,
    },
}

impl AnnotateError {
    /// Convenience constructor for [`AnnotateError::MissingField`].
    pub fn missing(field: impl Into<String>) -> Self {
        AnnotateError::MissingField {
            field: field.into(),
        }
    }
}
