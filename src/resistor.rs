//! Float-free decoding of coded component values.
//!
//! Converts a numeric-with-unit-suffix text value (`"4.7k"`, `"100"`) into
//! the two significant digits and multiplier exponent used by band-color
//! lookups. All parsing is done at the string level; going through floating
//! point would invite precision loss and representation drift
//! (`4.7k` must never become `4699.999...`).

use crate::error::{AnnotateError, Result};

/// Decoded significant digits and multiplier exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandCode {
    /// First significant digit, 0..=9.
    pub first: i32,
    /// Second significant digit, zero-padded when the value has only one.
    pub second: i32,
    /// Power-of-ten multiplier; may be negative (e.g. `4.7` decodes to -1).
    pub exponent: i32,
}

/// Decode `text` as `<digits>[.<digits>][suffix]` against a table of unit
/// multiplier suffixes (suffix character to exponent).
///
/// Values below one unit (`0.x` forms) are deliberately rejected as
/// `UnknownCode`: the band coding for sub-unit values is an open product
/// question and must not be silently guessed.
pub fn decode(text: &str, multipliers: &[(char, i32)]) -> Result<BandCode> {
    let text = text.trim();

    let (mantissa, suffix_exp) = match text.chars().next_back() {
        Some(last) if last.is_alphabetic() => {
            let exp = multipliers
                .iter()
                .find(|(c, _)| *c == last)
                .map(|(_, e)| *e)
                .ok_or_else(|| AnnotateError::UnknownCode {
                    table: "unit multiplier".to_string(),
                    code: last.to_string(),
                })?;
            (&text[..text.len() - last.len_utf8()], exp)
        }
        _ => (text, 0),
    };

    let (digits, exponent) = match mantissa.find('.') {
        Some(dot) => {
            if dot == 0 || (dot == 1 && mantissa.starts_with('0')) {
                return Err(AnnotateError::UnknownCode {
                    table: "sub-unit value".to_string(),
                    code: text.to_string(),
                });
            }
            let mut digits = String::with_capacity(mantissa.len() - 1);
            digits.push_str(&mantissa[..dot]);
            digits.push_str(&mantissa[dot + 1..]);
            (digits, dot as i32 - 2 + suffix_exp)
        }
        None => (mantissa.to_string(), mantissa.len() as i32 - 2 + suffix_exp),
    };

    let mut chars = digits.chars();
    let first = significant_digit(chars.next(), text)?;
    let second = match chars.next() {
        Some(c) => significant_digit(Some(c), text)?,
        None => 0,
    };

    Ok(BandCode {
        first,
        second,
        exponent,
    })
}

fn significant_digit(c: Option<char>, original: &str) -> Result<i32> {
    c.and_then(|c| c.to_digit(10))
        .map(|d| d as i32)
        .ok_or_else(|| AnnotateError::UnknownCode {
            table: "significant digit".to_string(),
            code: original.to_string(),
        })
}

/// Resolve a decoded code against a fixed domain table.
///
/// `what` names the table in the `UnknownCode` error raised for codes
/// outside its domain.
pub fn lookup<'t>(table: &'t [(i32, &'t str)], code: i32, what: &str) -> Result<&'t str> {
    table
        .iter()
        .find(|(k, _)| *k == code)
        .map(|(_, v)| *v)
        .ok_or_else(|| AnnotateError::UnknownCode {
            table: what.to_string(),
            code: code.to_string(),
        })
}
