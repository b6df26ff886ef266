//! Digi-Key catalog annotators.
//!
//! Everything in here is configuration over the core engine: the fixed
//! color and multiplier tables, the per-family quick-description rules, and
//! the annotator sequence a Digi-Key parametric export runs through. The
//! export stores each part's parametric data as a serialized attribute map
//! in the `parametrics` column.

use crate::annotator::{Annotator, fields};
use crate::combinators::{EmbeddedField, ListSelect};
use crate::error::{AnnotateError, Result};
use crate::pipeline::Pipeline;
use crate::record::{Fields, Record};
use crate::resistor::{self, BandCode};

/// Column holding the serialized parametric attribute map.
pub const PARAMETRICS: &str = "parametrics";

const THROUGH_HOLE_RESISTORS: &str = "Through Hole Resistors";

/// Band color per significant digit / multiplier exponent.
pub const RESISTOR_COLORS: &[(i32, &str)] = &[
    (-2, "#C0C0C0"), // silver
    (-1, "#CFB53B"), // gold
    (0, "#000000"),  // black
    (1, "#964B00"),  // brown
    (2, "#FF0000"),  // red
    (3, "#FFA500"),  // orange
    (4, "#FFFF00"),  // yellow
    (5, "#9ACD32"),  // green
    (6, "#6495ED"),  // blue
    (7, "#EE82EE"),  // violet
    (8, "#A0A0A0"),  // grey
    (9, "#FFFFFF"),  // white
];

/// Unit multiplier suffixes accepted in resistance values.
pub const RESISTANCE_MULTIPLIERS: &[(char, i32)] = &[('k', 3), ('M', 6), ('G', 9)];

/// Interpolate `{Attribute Name}` placeholders from an attribute map.
///
/// A placeholder naming an absent attribute is a `MissingField`.
fn render(template: &str, attrs: &Fields) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| AnnotateError::missing(after))?;
        let key = &after[..close];
        let value = attrs.get(key).ok_or_else(|| AnnotateError::missing(key))?;
        out.push_str(value);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Per-family rule for building label title and quick-description text.
struct QuickDescRule {
    family: String,
    /// Attributes rewritten before interpolation: each names a parametric
    /// whose delimited-list value is narrowed to one element by pattern.
    preprocess: Vec<(String, ListSelect)>,
    title: String,
    quickdesc: String,
}

/// Builds `title`, `package`, and `quickdesc` from the parametric map,
/// driven by the rule matching the part's `Family` attribute.
pub struct QuickDesc {
    rules: Vec<QuickDescRule>,
    output_fields: Vec<String>,
}

impl QuickDesc {
    /// The shipped rule set. Currently covers through-hole resistors; new
    /// families are added here as their label formats get decided.
    pub fn standard() -> Result<Self> {
        let rules = vec![QuickDescRule {
            family: THROUGH_HOLE_RESISTORS.to_string(),
            preprocess: vec![(
                "Power (Watts)".to_string(),
                ListSelect::new([r"\d+/\d+W", r".*"])?,
            )],
            title: "Res, {Resistance (Ohms)}\u{03A9}".to_string(),
            quickdesc: "{Tolerance}, {Power (Watts)}".to_string(),
        }];
        Ok(Self {
            rules,
            output_fields: vec![
                "title".to_string(),
                "package".to_string(),
                "quickdesc".to_string(),
            ],
        })
    }

    fn rule_for(&self, family: &str) -> Result<&QuickDescRule> {
        self.rules
            .iter()
            .find(|rule| rule.family == family)
            .ok_or_else(|| AnnotateError::UnknownCode {
                table: "quick-description rules".to_string(),
                code: family.to_string(),
            })
    }
}

impl Annotator for QuickDesc {
    fn name(&self) -> &str {
        "quickdesc"
    }

    fn output_fields(&self) -> &[String] {
        &self.output_fields
    }

    fn annotate(&self, record: &Record) -> Result<Fields> {
        let mut attrs = record.embedded(PARAMETRICS)?;
        let family = attrs
            .get("Family")
            .ok_or_else(|| AnnotateError::missing("Family"))?
            .clone();
        let rule = self.rule_for(&family)?;

        for (attr, select) in &rule.preprocess {
            let value = attrs
                .get(attr)
                .ok_or_else(|| AnnotateError::missing(attr))?;
            let narrowed = select.select(value)?.to_string();
            attrs.insert(attr.clone(), narrowed);
        }

        let title = render(&rule.title, &attrs)?;
        let quickdesc = render(&rule.quickdesc, &attrs)?;
        let package = attrs
            .get("Package / Case")
            .ok_or_else(|| AnnotateError::missing("Package / Case"))?;

        Ok(fields([
            ("title", title.as_str()),
            ("package", package.as_str()),
            ("quickdesc", quickdesc.as_str()),
        ]))
    }
}

/// Emits the three band-color swatches for through-hole resistors.
///
/// Parts from other families produce no fields. The resistance text is
/// decoded at the string level (see [`resistor::decode`]) and each band is
/// resolved independently against the fixed color table.
pub struct ResistorColorBands {
    output_fields: Vec<String>,
}

impl ResistorColorBands {
    pub fn new() -> Self {
        Self {
            output_fields: vec![
                "res_color1".to_string(),
                "res_color2".to_string(),
                "res_color3".to_string(),
            ],
        }
    }
}

impl Default for ResistorColorBands {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator for ResistorColorBands {
    fn name(&self) -> &str {
        "resistor-color-bands"
    }

    fn output_fields(&self) -> &[String] {
        &self.output_fields
    }

    fn annotate(&self, record: &Record) -> Result<Fields> {
        let attrs = record.embedded(PARAMETRICS)?;
        if attrs.get("Family").map(String::as_str) != Some(THROUGH_HOLE_RESISTORS) {
            return Ok(Fields::new());
        }

        let text = attrs
            .get("Resistance (Ohms)")
            .ok_or_else(|| AnnotateError::missing("Resistance (Ohms)"))?;
        let BandCode {
            first,
            second,
            exponent,
        } = resistor::decode(text, RESISTANCE_MULTIPLIERS)?;

        Ok(fields([
            (
                "res_color1",
                resistor::lookup(RESISTOR_COLORS, first, "band color")?,
            ),
            (
                "res_color2",
                resistor::lookup(RESISTOR_COLORS, second, "band color")?,
            ),
            (
                "res_color3",
                resistor::lookup(RESISTOR_COLORS, exponent, "band color")?,
            ),
        ]))
    }
}

/// The full annotator sequence for a Digi-Key parametric export.
pub fn pipeline() -> Result<Pipeline> {
    Ok(Pipeline::new()
        .map_append(QuickDesc::standard()?)
        .map_append(EmbeddedField::new(
            PARAMETRICS,
            "Manufacturer Part Number",
            "mfrpn",
        ))
        .map_append(EmbeddedField::new(PARAMETRICS, "Description", "desc"))
        .map_append(EmbeddedField::new(
            PARAMETRICS,
            "Digi-Key Part Number",
            "code",
        ))
        .map_append(ResistorColorBands::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor_record(resistance: &str) -> Record {
        let parametrics = format!(
            concat!(
                r#"{{"Family": "Through Hole Resistors", "#,
                r#""Resistance (Ohms)": "{}", "#,
                r#""Tolerance": "±5%", "#,
                r#""Power (Watts)": "1/4W, 250V", "#,
                r#""Package / Case": "Axial", "#,
                r#""Manufacturer Part Number": "CF14JT10K0", "#,
                r#""Description": "RES 10K OHM 1/4W 5% AXIAL", "#,
                r#""Digi-Key Part Number": "CF14JT10K0CT-ND"}}"#
            ),
            resistance
        );
        [("parametrics".to_string(), parametrics)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_render_interpolates_attributes() {
        let attrs: Fields = [("Resistance (Ohms)".to_string(), "10k".to_string())]
            .into_iter()
            .collect();
        let out = render("Res, {Resistance (Ohms)}\u{03A9}", &attrs).unwrap();
        assert_eq!(out, "Res, 10k\u{03A9}");
    }

    #[test]
    fn test_render_missing_attribute() {
        let attrs = Fields::new();
        assert!(matches!(
            render("{Tolerance}", &attrs),
            Err(AnnotateError::MissingField { .. })
        ));
    }

    #[test]
    fn test_quickdesc_for_through_hole_resistor() {
        let q = QuickDesc::standard().unwrap();
        let out = q.annotate(&resistor_record("10k")).unwrap();

        assert_eq!(
            out.get("title").map(String::as_str),
            Some("Res, 10k\u{03A9}")
        );
        assert_eq!(out.get("package").map(String::as_str), Some("Axial"));
        // The power spec list is narrowed to its fraction-watt element.
        assert_eq!(
            out.get("quickdesc").map(String::as_str),
            Some("\u{b1}5%, 1/4W")
        );
    }

    #[test]
    fn test_quickdesc_unknown_family() {
        let q = QuickDesc::standard().unwrap();
        let record: Record = [(
            "parametrics".to_string(),
            r#"{"Family": "Ceramic Capacitors"}"#.to_string(),
        )]
        .into_iter()
        .collect();
        assert!(matches!(
            q.annotate(&record),
            Err(AnnotateError::UnknownCode { .. })
        ));
    }

    #[test]
    fn test_color_bands_for_4_7k() {
        let bands = ResistorColorBands::new();
        let out = bands.annotate(&resistor_record("4.7k")).unwrap();
        assert_eq!(out.get("res_color1").map(String::as_str), Some("#FFFF00")); // 4 yellow
        assert_eq!(out.get("res_color2").map(String::as_str), Some("#EE82EE")); // 7 violet
        assert_eq!(out.get("res_color3").map(String::as_str), Some("#FF0000")); // x100 red
    }

    #[test]
    fn test_color_bands_skip_other_families() {
        let bands = ResistorColorBands::new();
        let record: Record = [(
            "parametrics".to_string(),
            r#"{"Family": "Ceramic Capacitors"}"#.to_string(),
        )]
        .into_iter()
        .collect();
        assert!(bands.annotate(&record).unwrap().is_empty());
    }

    #[test]
    fn test_color_bands_require_resistance() {
        let bands = ResistorColorBands::new();
        let record: Record = [(
            "parametrics".to_string(),
            r#"{"Family": "Through Hole Resistors"}"#.to_string(),
        )]
        .into_iter()
        .collect();
        assert!(matches!(
            bands.annotate(&record),
            Err(AnnotateError::MissingField { .. })
        ));
    }

    #[test]
    fn test_pipeline_annotates_full_record() {
        let table = pipeline()
            .unwrap()
            .run(
                vec!["parametrics".to_string()],
                vec![resistor_record("4.7k")],
            )
            .unwrap();

        assert_eq!(
            table.header,
            vec![
                "parametrics",
                "title",
                "package",
                "quickdesc",
                "mfrpn",
                "desc",
                "code",
                "res_color1",
                "res_color2",
                "res_color3",
            ]
        );
        let row = &table.rows[0];
        assert_eq!(row[1], "Res, 4.7k\u{03A9}");
        assert_eq!(row[4], "CF14JT10K0");
        assert_eq!(row[9], "#FF0000");
    }
}
