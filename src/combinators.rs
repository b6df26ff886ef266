//! Reusable annotator building blocks.
//!
//! These recur across catalog shapes: picking the first populated column out
//! of a ranked list, republishing one embedded attribute as a top-level
//! column, and selecting one element of a delimited list by pattern priority.
//! Catalog modules compose them with their own lookup tables and templates.

use regex::Regex;

use crate::annotator::{Annotator, fields};
use crate::error::{AnnotateError, Result};
use crate::record::{Fields, Record};

/// Picks the first candidate column that is present and non-empty, and
/// republishes its value under `output`. Produces nothing when no candidate
/// is populated. This implements "manual override beats automatic value"
/// generically: list the manual column before the automatic one.
pub struct PriorityPick {
    name: String,
    candidates: Vec<String>,
    output_fields: Vec<String>,
}

impl PriorityPick {
    pub fn new(
        candidates: impl IntoIterator<Item = impl Into<String>>,
        output: impl Into<String>,
    ) -> Self {
        let output = output.into();
        Self {
            name: format!("priority-pick({output})"),
            candidates: candidates.into_iter().map(Into::into).collect(),
            output_fields: vec![output],
        }
    }

    fn output(&self) -> &str {
        &self.output_fields[0]
    }
}

impl Annotator for PriorityPick {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_fields(&self) -> &[String] {
        &self.output_fields
    }

    fn annotate(&self, record: &Record) -> Result<Fields> {
        for candidate in &self.candidates {
            if let Some(value) = record.get_nonempty(candidate) {
                return Ok(fields([(self.output(), value)]));
            }
        }
        Ok(Fields::new())
    }
}

/// Republishes one field of an embedded attribute map as a top-level column.
///
/// Fails with `MissingField` when the attribute is absent, since these
/// annotators are only attached where the attribute is mandatory.
pub struct EmbeddedField {
    name: String,
    column: String,
    field: String,
    output_fields: Vec<String>,
}

impl EmbeddedField {
    pub fn new(
        column: impl Into<String>,
        field: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        let output = output.into();
        Self {
            name: format!("embedded-field({output})"),
            column: column.into(),
            field: field.into(),
            output_fields: vec![output],
        }
    }
}

impl Annotator for EmbeddedField {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_fields(&self) -> &[String] {
        &self.output_fields
    }

    fn annotate(&self, record: &Record) -> Result<Fields> {
        let attrs = record.embedded(&self.column)?;
        let value = attrs
            .get(&self.field)
            .ok_or_else(|| AnnotateError::missing(&self.field))?;
        Ok(fields([(self.output_fields[0].as_str(), value.as_str())]))
    }
}

/// Selects one element of a delimited list by pattern priority.
///
/// The input string encodes a list of sub-strings (comma-separated specs,
/// typically). Each piece is trimmed, then patterns are tried in the given
/// order and, within a pattern, pieces in their original order; the first
/// match wins. Patterns are anchored at the start of a piece, and `.*` works
/// as a catch-all fallback. An input matching no pattern is a `NoMatch`
/// error: an unrecognized format must not silently produce a wrong value.
pub struct ListSelect {
    patterns: Vec<Regex>,
    sources: Vec<String>,
    delimiter: char,
}

impl ListSelect {
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Result<Self> {
        Self::with_delimiter(patterns, ',')
    }

    pub fn with_delimiter(
        patterns: impl IntoIterator<Item = impl Into<String>>,
        delimiter: char,
    ) -> Result<Self> {
        let sources: Vec<String> = patterns.into_iter().map(Into::into).collect();
        let patterns = sources
            .iter()
            .map(|p| {
                // Anchor at the start of the piece; a trailing remainder is fine.
                Regex::new(&format!("^(?:{p})")).map_err(|source| AnnotateError::Pattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            sources,
            delimiter,
        })
    }

    /// Pick the highest-priority matching piece of `input`.
    pub fn select<'a>(&self, input: &'a str) -> Result<&'a str> {
        let pieces: Vec<&str> = input.split(self.delimiter).map(str::trim).collect();
        for pattern in &self.patterns {
            for piece in &pieces {
                if pattern.is_match(piece) {
                    return Ok(piece);
                }
            }
        }
        Err(AnnotateError::NoMatch {
            input: input.to_string(),
            patterns: self.sources.join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_priority_pick_prefers_first_populated() {
        let pick = PriorityPick::new(["manual_title", "dist_title"], "title");

        let r = record(&[("manual_title", ""), ("dist_title", "Res 10k")]);
        let out = pick.annotate(&r).unwrap();
        assert_eq!(out.get("title").map(String::as_str), Some("Res 10k"));

        let r = record(&[("manual_title", "Custom"), ("dist_title", "Res 10k")]);
        let out = pick.annotate(&r).unwrap();
        assert_eq!(out.get("title").map(String::as_str), Some("Custom"));
    }

    #[test]
    fn test_priority_pick_empty_when_no_candidate() {
        let pick = PriorityPick::new(["manual_title", "dist_title"], "title");
        let out = pick.annotate(&record(&[("other", "x")])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_embedded_field_republishes_attribute() {
        let a = EmbeddedField::new("parametrics", "Manufacturer Part Number", "mfrpn");
        let r = record(&[(
            "parametrics",
            r#"{"Manufacturer Part Number": "CF14JT10K0"}"#,
        )]);
        let out = a.annotate(&r).unwrap();
        assert_eq!(out.get("mfrpn").map(String::as_str), Some("CF14JT10K0"));
    }

    #[test]
    fn test_embedded_field_missing_attribute() {
        let a = EmbeddedField::new("parametrics", "Description", "desc");
        let r = record(&[("parametrics", r#"{"Family": "X"}"#)]);
        assert!(matches!(
            a.annotate(&r),
            Err(AnnotateError::MissingField { .. })
        ));
    }

    #[test]
    fn test_list_select_pattern_priority() {
        let sel = ListSelect::new([r"\d+/\d+W", r".*"]).unwrap();
        assert_eq!(sel.select("1/4W, 250V, Axial").unwrap(), "1/4W");
        // Wildcard fallback: first remaining piece wins.
        assert_eq!(sel.select("250V, Axial").unwrap(), "250V");
    }

    #[test]
    fn test_list_select_no_match_without_wildcard() {
        let sel = ListSelect::new([r"\d+/\d+W"]).unwrap();
        assert!(matches!(
            sel.select("250V, Axial"),
            Err(AnnotateError::NoMatch { .. })
        ));
    }

    #[test]
    fn test_list_select_bad_pattern() {
        assert!(matches!(
            ListSelect::new([r"("]),
            Err(AnnotateError::Pattern { .. })
        ));
    }
}
