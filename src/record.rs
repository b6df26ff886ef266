//! The working row type flowing through the pipeline.
//!
//! A `Record` is an ordered mapping from column name to string value. All
//! values originate as text; typed interpretation (numeric parsing, embedded
//! attribute maps) is up to individual annotators. Records only ever grow:
//! once a column is set it is never removed, only overwritten by a later
//! stage targeting the same name.

use indexmap::IndexMap;

use crate::error::{AnnotateError, Result};

/// Partial field mapping produced by an annotator and merged into a record.
pub type Fields = IndexMap<String, String>;

/// One row of the working table, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Fields,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: Fields) -> Self {
        Self { fields }
    }

    /// Value of a column, if the column exists at all.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a column, treating an empty cell the same as an absent one.
    pub fn get_nonempty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Value of a required column, or [`AnnotateError::MissingField`].
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| AnnotateError::missing(name))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Merge a partial field mapping into this record: scalar overwrite,
    /// last writer wins. This is the single mutation primitive the engine
    /// relies on.
    pub fn merge(&mut self, partial: Fields) {
        for (name, value) in partial {
            self.fields.insert(name, value);
        }
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Decode the serialized attribute map embedded in one cell.
    ///
    /// Certain export columns hold a JSON object of secondary attributes
    /// (e.g. the distributor's parametric data). An absent or empty cell is
    /// a missing field; malformed JSON is an [`AnnotateError::EmbeddedParse`].
    pub fn embedded(&self, column: &str) -> Result<Fields> {
        let raw = self
            .get_nonempty(column)
            .ok_or_else(|| AnnotateError::missing(column))?;
        serde_json::from_str(raw).map_err(|source| AnnotateError::EmbeddedParse {
            column: column.to_string(),
            source,
        })
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
