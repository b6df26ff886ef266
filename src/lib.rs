//! # labelgen
//!
//! An annotation pipeline for enriching part-catalog CSV exports with
//! derived label display fields: human-readable titles, short descriptions,
//! and resistor color-code swatches.
//!
//! The core is a small batch engine: independent annotators declare the
//! output columns they produce, a pipeline applies them in sequence over a
//! record stream (filter stages drop records, map-append stages merge new
//! columns in), and a materializer reconciles rows with differing column
//! sets into one rectangular table. Catalog-specific lookup tables and
//! annotator sequences ([`digikey`], [`supernode`]) are configuration over
//! that engine, not part of it.
//!
//! ## Example
//!
//! ```
//! use labelgen::{Pipeline, PriorityPick, Record};
//!
//! let pipeline = Pipeline::new()
//!     .filter("located", |r: &Record| r.get_nonempty("gridid").is_some())
//!     .map_append(PriorityPick::new(["manual_title", "dist_title"], "title"));
//!
//! let header = vec!["gridid".to_string(), "dist_title".to_string()];
//! let records = vec![
//!     [("gridid".to_string(), "A1".to_string()),
//!      ("dist_title".to_string(), "Res 10k".to_string())]
//!         .into_iter()
//!         .collect::<Record>(),
//! ];
//!
//! let table = pipeline.run(header, records).unwrap();
//! assert_eq!(table.header, vec!["gridid", "dist_title", "title"]);
//! assert_eq!(table.rows[0], vec!["A1", "Res 10k", "Res 10k"]);
//! ```

pub mod annotator;
pub mod combinators;
pub mod csvio;
pub mod digikey;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod resistor;
pub mod supernode;
pub mod table;

pub use annotator::{Annotator, FnAnnotator, fields};
pub use combinators::{EmbeddedField, ListSelect, PriorityPick};
pub use csvio::{LoadedTable, read_table, write_table};
pub use error::{AnnotateError, Result};
pub use pipeline::Pipeline;
pub use record::{Fields, Record};
pub use resistor::{BandCode, decode, lookup};
pub use table::{Table, materialize};
