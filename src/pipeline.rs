//! The annotation pipeline engine.
//!
//! A pipeline is an ordered list of stages built up front and executed
//! eagerly, one stage at a time over the whole record sequence (classic
//! batch-per-stage ETL, not streaming). Running stage-by-stage is what makes
//! the output header computable: every annotator's declared fields have been
//! seen before the table is materialized.
//!
//! Two stage kinds exist. A filter drops records (never columns); a
//! map-append applies one annotator to every surviving record and merges the
//! partial result into it, overwriting same-named columns. Record order is
//! preserved throughout.
//!
//! Failure policy is fail-fast: the first annotator error aborts the run,
//! wrapped with the annotator name and the offending input row number. No
//! per-row recovery, no partial output.

use tracing::debug;

use crate::annotator::Annotator;
use crate::error::{AnnotateError, Result};
use crate::record::Record;
use crate::table::{self, Table};

/// Predicate deciding whether a record survives a filter stage.
pub type Predicate = Box<dyn Fn(&Record) -> bool>;

enum Stage {
    Filter { name: String, predicate: Predicate },
    MapAppend { annotator: Box<dyn Annotator> },
}

impl Stage {
    fn name(&self) -> &str {
        match self {
            Stage::Filter { name, .. } => name,
            Stage::MapAppend { annotator } => annotator.name(),
        }
    }
}

/// Ordered composition of filter and map-append stages over a record
/// sequence.
///
/// Built fluently, then executed with [`run`](Pipeline::run):
///
/// ```
/// use labelgen::{Pipeline, PriorityPick, Record};
///
/// let pipeline = Pipeline::new()
///     .filter("has-id", |r: &Record| r.get_nonempty("id").is_some())
///     .map_append(PriorityPick::new(["manual_title", "dist_title"], "title"));
///
/// let header = vec!["id".to_string(), "dist_title".to_string()];
/// let records = vec![
///     [("id".to_string(), "1".to_string()),
///      ("dist_title".to_string(), "Res 10k".to_string())]
///         .into_iter()
///         .collect::<Record>(),
/// ];
/// let table = pipeline.run(header, records).unwrap();
/// assert_eq!(table.header, vec!["id", "dist_title", "title"]);
/// ```
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter stage. Only records for which `predicate` returns
    /// true continue; surviving records are not mutated.
    pub fn filter(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Record) -> bool + 'static,
    ) -> Self {
        self.stages.push(Stage::Filter {
            name: name.into(),
            predicate: Box::new(predicate),
        });
        self
    }

    /// Append a map-append stage applying `annotator` to every surviving
    /// record and merging its output into the record.
    pub fn map_append(mut self, annotator: impl Annotator + 'static) -> Self {
        self.stages.push(Stage::MapAppend {
            annotator: Box::new(annotator),
        });
        self
    }

    /// Number of stages, in declaration order.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over `records` and materialize the output table.
    ///
    /// `header` is the input table's column sequence; each annotator that
    /// executes over at least one record extends it with its declared fields
    /// (first-seen order, duplicates skipped). Records keep their original
    /// 1-based input row numbers for error context even after filtering.
    pub fn run(&self, header: Vec<String>, records: Vec<Record>) -> Result<Table> {
        let mut columns = header;
        // (original input row number, record); identity is positional.
        let mut current: Vec<(usize, Record)> = records
            .into_iter()
            .enumerate()
            .map(|(i, r)| (i + 1, r))
            .collect();

        for stage in &self.stages {
            let before = current.len();
            match stage {
                Stage::Filter { predicate, .. } => {
                    current.retain(|(_, record)| predicate(record));
                }
                Stage::MapAppend { annotator } => {
                    for (row, record) in &mut current {
                        let partial = annotator.annotate(record).map_err(|source| {
                            AnnotateError::RowFailed {
                                annotator: annotator.name().to_string(),
                                row: *row,
                                source: Box::new(source),
                            }
                        })?;
                        for field in partial.keys() {
                            if !annotator.output_fields().contains(field) {
                                return Err(AnnotateError::UndeclaredField {
                                    annotator: annotator.name().to_string(),
                                    field: field.clone(),
                                });
                            }
                        }
                        record.merge(partial);
                    }
                    if !current.is_empty() {
                        for field in annotator.output_fields() {
                            if !columns.contains(field) {
                                columns.push(field.clone());
                            }
                        }
                    }
                }
            }
            debug!(
                stage = stage.name(),
                input = before,
                output = current.len(),
                "stage complete"
            );
        }

        let records: Vec<Record> = current.into_iter().map(|(_, r)| r).collect();
        Ok(table::materialize(&columns, &records))
    }
}
