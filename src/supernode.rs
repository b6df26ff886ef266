//! Inventory-merge annotators.
//!
//! This catalog shape merges a distributor export with manually curated
//! columns: every display field exists as a `manual_*` / `dist_*` pair and
//! the manual value wins when present. Rows without a `gridid` (storage
//! location) are dropped up front. As with the Digi-Key shape, secondary
//! attributes live in the serialized `parametrics` column.

use regex::Regex;

use crate::annotator::{FnAnnotator, fields};
use crate::combinators::PriorityPick;
use crate::error::{AnnotateError, Result};
use crate::pipeline::Pipeline;
use crate::record::{Fields, Record};

/// Highlight color for parts with a recorded cost, and the plain default.
const COSTED_BG: &str = "#FFC0C0";
const DEFAULT_BG: &str = "#FFFFFF";

/// True when the record has a non-empty `gridid` column.
pub fn has_gridid(record: &Record) -> bool {
    record.get_nonempty("gridid").is_some()
}

/// Flags costed parts with a tinted label background.
fn background_color() -> impl Fn(&Record) -> Result<Fields> {
    |record: &Record| {
        let color = if record.get_nonempty("cost").is_some() {
            COSTED_BG
        } else {
            DEFAULT_BG
        };
        Ok(fields([("bg_color", color)]))
    }
}

/// Splits the package name into `dippack` (through-hole) or `pack` (SMD) so
/// the label template can style them differently. Exactly one of the two
/// columns is populated, the other is set to the empty string.
struct PackageShape {
    dip_suffix: Regex,
    axial_prefix: Regex,
}

impl PackageShape {
    fn new() -> Result<Self> {
        Ok(Self {
            dip_suffix: compile(r".*DIP$")?,
            axial_prefix: compile(r"^Axial")?,
        })
    }

    fn is_through_hole(&self, package: &str, attrs: Option<&Fields>) -> bool {
        let mounted_through_hole = attrs
            .and_then(|a| a.get("Mounting Type"))
            .is_some_and(|m| m.contains("Through Hole"));
        mounted_through_hole || self.dip_suffix.is_match(package) || self.axial_prefix.is_match(package)
    }

    fn annotate(&self, record: &Record) -> Result<Fields> {
        let package = record.require("package")?;

        let attrs = match record.get_nonempty("parametrics") {
            Some(_) => Some(record.embedded("parametrics")?),
            None => None,
        };

        // Without parametric data the part is assumed surface-mount.
        let through_hole = attrs.is_some() && self.is_through_hole(package, attrs.as_ref());
        if through_hole {
            Ok(fields([("dippack", package), ("pack", "")]))
        } else {
            Ok(fields([("dippack", ""), ("pack", package)]))
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| AnnotateError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// The full inventory-merge sequence: keep located parts, resolve each
/// manual/distributor column pair, then derive label styling fields.
pub fn pipeline() -> Result<Pipeline> {
    let shape = PackageShape::new()?;
    Ok(Pipeline::new()
        .filter("has-gridid", has_gridid)
        .map_append(PriorityPick::new(["manual_title", "dist_title"], "title"))
        .map_append(PriorityPick::new(
            ["manual_package", "dist_package"],
            "package",
        ))
        .map_append(PriorityPick::new(
            ["manual_quickdesc", "dist_quickdesc"],
            "quickdesc",
        ))
        .map_append(PriorityPick::new(["manual_mfrpn", "dist_mfrpn"], "mfrpn"))
        .map_append(PriorityPick::new(["manual_desc", "dist_desc"], "desc"))
        .map_append(FnAnnotator::new(
            "background-color",
            ["bg_color"],
            background_color(),
        ))
        .map_append(FnAnnotator::new(
            "package-shape",
            ["dippack", "pack"],
            move |record: &Record| shape.annotate(record),
        )))
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
    fn test_has_gridid() {
        assert!(has_gridid(&record(&[("gridid", "A3")])));
        assert!(!has_gridid(&record(&[("gridid", "")])));
        assert!(!has_gridid(&record(&[("other", "x")])));
    }

    #[test]
    fn test_background_color_flags_costed_parts() {
        let bg = background_color();
        let out = bg(&record(&[("cost", "0.12")])).unwrap();
        assert_eq!(out.get("bg_color").map(String::as_str), Some(COSTED_BG));

        let out = bg(&record(&[("cost", "")])).unwrap();
        assert_eq!(out.get("bg_color").map(String::as_str), Some(DEFAULT_BG));
    }

    #[test]
    fn test_package_shape_dip_is_through_hole() {
        let shape = PackageShape::new().unwrap();
        let r = record(&[("package", "8-PDIP"), ("parametrics", "{}")]);
        let out = shape.annotate(&r).unwrap();
        assert_eq!(out.get("dippack").map(String::as_str), Some("8-PDIP"));
        assert_eq!(out.get("pack").map(String::as_str), Some(""));
    }

    #[test]
    fn test_package_shape_mounting_type_wins() {
        let shape = PackageShape::new().unwrap();
        let r = record(&[
            ("package", "TO-220"),
            ("parametrics", r#"{"Mounting Type": "Through Hole"}"#),
        ]);
        let out = shape.annotate(&r).unwrap();
        assert_eq!(out.get("dippack").map(String::as_str), Some("TO-220"));
    }

    #[test]
    fn test_package_shape_smd_without_parametrics() {
        let shape = PackageShape::new().unwrap();
        let r = record(&[("package", "0603"), ("parametrics", "")]);
        let out = shape.annotate(&r).unwrap();
        assert_eq!(out.get("dippack").map(String::as_str), Some(""));
        assert_eq!(out.get("pack").map(String::as_str), Some("0603"));
    }

    #[test]
    fn test_pipeline_merges_manual_over_distributor() {
        let header: Vec<String> = [
            "gridid",
            "cost",
            "manual_title",
            "dist_title",
            "dist_package",
            "dist_quickdesc",
            "dist_mfrpn",
            "dist_desc",
            "parametrics",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let located = record(&[
            ("gridid", "B2"),
            ("cost", ""),
            ("manual_title", "Custom"),
            ("dist_title", "Res 10k"),
            ("dist_package", "Axial"),
            ("dist_quickdesc", "5%, 1/4W"),
            ("dist_mfrpn", "CF14JT10K0"),
            ("dist_desc", "RES 10K"),
            ("parametrics", r#"{"Mounting Type": "Through Hole"}"#),
        ]);
        let unlocated = record(&[("gridid", ""), ("dist_title", "dropped")]);

        let table = pipeline()
            .unwrap()
            .run(header, vec![located, unlocated])
            .unwrap();

        assert_eq!(table.rows.len(), 1);
        let title = table.header.iter().position(|c| c == "title").unwrap();
        let dippack = table.header.iter().position(|c| c == "dippack").unwrap();
        let bg = table.header.iter().position(|c| c == "bg_color").unwrap();
        assert_eq!(table.rows[0][title], "Custom");
        assert_eq!(table.rows[0][dippack], "Axial");
        assert_eq!(table.rows[0][bg], DEFAULT_BG);
    }
}
