//! The annotator contract.
//!
//! An annotator is a named, pure unit of computation: it declares up front
//! which output columns it may produce, and maps one record to a partial
//! field mapping restricted to that set (or to an empty mapping when it does
//! not apply). Declaring fields up front lets the engine extend the eventual
//! output header without inspecting every row, and lets it catch annotators
//! that return columns they never declared.

use crate::error::Result;
use crate::record::{Fields, Record};

/// A pure unit producing zero or more declared output fields from a record.
pub trait Annotator {
    /// Display name, used in stage logs and error context.
    fn name(&self) -> &str;

    /// Columns this annotator may produce. The keys of every mapping
    /// returned by [`annotate`](Self::annotate) must be a subset of these.
    fn output_fields(&self) -> &[String];

    /// Compute the partial fields for one record. Returning an empty mapping
    /// means "not applicable to this record"; returning an error aborts the
    /// whole pipeline run.
    fn annotate(&self, record: &Record) -> Result<Fields>;
}

/// Adapter turning a bare closure into an [`Annotator`].
///
/// Mirrors the contract exactly: the closure gets a read-only record and
/// returns a partial mapping over the declared fields.
pub struct FnAnnotator<F> {
    name: String,
    output_fields: Vec<String>,
    func: F,
}

impl<F> FnAnnotator<F>
where
    F: Fn(&Record) -> Result<Fields>,
{
    pub fn new(
        name: impl Into<String>,
        output_fields: impl IntoIterator<Item = impl Into<String>>,
        func: F,
    ) -> Self {
        Self {
            name: name.into(),
            output_fields: output_fields.into_iter().map(Into::into).collect(),
            func,
        }
    }
}

impl<F> Annotator for FnAnnotator<F>
where
    F: Fn(&Record) -> Result<Fields>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn output_fields(&self) -> &[String] {
        &self.output_fields
    }

    fn annotate(&self, record: &Record) -> Result<Fields> {
        (self.func)(record)
    }
}

/// Build a partial field mapping from (name, value) pairs.
pub fn fields(pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Fields {
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
