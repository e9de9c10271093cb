//! # Product-Code Extractor
//!
//! Turns the raw text of a camera scan into the product name that goes into
//! the inspection form.
//!
//! ## Two Paths, One Entry Point
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    parse_product_code(raw)                              │
//! │                                                                         │
//! │  raw ── trim empty? ──► None                                           │
//! │   │                                                                     │
//! │   ▼                                                                     │
//! │  normalize: every '␝' (U+241D) → GS (0x1D)                             │
//! │   │                                                                     │
//! │   ▼                                                                     │
//! │  ┌───────────────────────────────┐                                     │
//! │  │ Data-Matrix path              │── ok ──► 10 + 2 + 3 = 15 chars      │
//! │  │  VSBH4 → GS P field [..10]    │                                     │
//! │  │  SH    → GS E field [..2]     │                                     │
//! │  │  GS C field [6..9], digits    │                                     │
//! │  └──────────────┬────────────────┘                                     │
//! │                 │ any step fails                                        │
//! │                 ▼                                                       │
//! │  ┌───────────────────────────────┐                                     │
//! │  │ Label path (raw text)         │── first match ──► product name      │
//! │  │  a. 91958-PI010               │                                     │
//! │  │  b. 91958PI010                │                                     │
//! │  │  c. PY24672                   │                                     │
//! │  │  d. 91958-ABC010              │                                     │
//! │  │  e. 5+ digits + [A-Z0-9]+     │                                     │
//! │  └──────────────┬────────────────┘                                     │
//! │                 │ nothing matched                                       │
//! │                 ▼                                                       │
//! │               None                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Payload
//! ```text
//! [)>␞06␝VSBH4␝P91958CU810PD␝SHB81␝EJW124052␝T241017KKH1@OX15901W␝C020100007000000A2␝␞␄
//!             └─ P: 91958CU810 ─┘     └ E: JW ┘                     └ C[6..9]: 007
//!
//! => "91958CU810JW007"
//! ```
//!
//! Every function here is pure. The compiled label patterns are process-wide
//! statics and never change after first use.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ParseError;

// =============================================================================
// Constants
// =============================================================================

/// ASCII Group Separator, the field delimiter inside a Data-Matrix payload.
pub const GROUP_SEPARATOR: char = '\u{1D}';

/// Glyph some scanner firmwares emit in place of the unprintable GS byte.
pub const GS_PLACEHOLDER: char = '\u{241D}';

/// Marker that must precede the P field.
const DATA_MATRIX_MARKER: &str = "VSBH4";

/// Marker that must precede the E field.
const SERIES_MARKER: &str = "SH";

/// Length of each Data-Matrix segment.
const MODEL_LEN: usize = 10;
const VARIANT_LEN: usize = 2;
const LOT_LEN: usize = 3;

/// The C field must be at least this long to contain the digit window.
const C_FIELD_MIN_LEN: usize = 9;

/// Zero-based start of the digit window inside the C field.
const C_FIELD_WINDOW_START: usize = 6;

/// Longest product name the label path's catch-all pattern may produce.
pub const MAX_LABEL_CODE_LEN: usize = 15;

// =============================================================================
// Product Code
// =============================================================================

/// Which parser path produced a [`ProductCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Symbology {
    /// Structured GS-delimited fields (always 15 characters).
    DataMatrix,
    /// Human-readable label text matched by one of the fallback patterns.
    Label,
}

/// A product name extracted from a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCode {
    product_name: String,
    symbology: Symbology,
}

impl ProductCode {
    /// The product name to put in the form.
    pub fn as_str(&self) -> &str {
        &self.product_name
    }

    /// Which path recognized the payload.
    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    /// Consumes the code, returning the product name.
    pub fn into_string(self) -> String {
        self.product_name
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.product_name)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.product_name
    }
}

// =============================================================================
// Entry Points
// =============================================================================

/// Extracts a product name from a scanned payload.
///
/// Returns `None` for anything that is not recognized; the caller should ask
/// the operator to rescan or type the code. Never panics.
///
/// ## Example
/// ```rust
/// use inspect_core::product_code::parse_product_code;
///
/// let code = parse_product_code("91958-PI010").unwrap();
/// assert_eq!(code.as_str(), "91958PI010");
///
/// assert!(parse_product_code("   ").is_none());
/// ```
pub fn parse_product_code(raw: &str) -> Option<ProductCode> {
    diagnose_product_code(raw).ok()
}

/// Same as [`parse_product_code`] but reports why a payload was rejected.
///
/// Intended for logging. `parse_product_code(x) == diagnose_product_code(x).ok()`
/// holds for every input.
pub fn diagnose_product_code(raw: &str) -> Result<ProductCode, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::EmptyPayload);
    }

    let normalized = normalize(raw);

    match parse_data_matrix(&normalized) {
        Ok(product_name) => Ok(ProductCode {
            product_name,
            symbology: Symbology::DataMatrix,
        }),
        Err(data_matrix) => match parse_label(raw) {
            Some(product_name) => Ok(ProductCode {
                product_name,
                symbology: Symbology::Label,
            }),
            None => Err(ParseError::Unrecognized {
                data_matrix: Box::new(data_matrix),
            }),
        },
    }
}

/// Replaces every placeholder glyph with a literal GS.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    if raw.contains(GS_PLACEHOLDER) {
        Cow::Owned(raw.replace(GS_PLACEHOLDER, &GROUP_SEPARATOR.to_string()))
    } else {
        Cow::Borrowed(raw)
    }
}

// =============================================================================
// Data-Matrix Path
// =============================================================================

fn parse_data_matrix(normalized: &str) -> Result<String, ParseError> {
    let model = model_segment(normalized)?;
    let variant = variant_segment(normalized)?;
    let lot = lot_segment(normalized)?;

    Ok(format!("{model}{variant}{lot}"))
}

/// Segment 1: first 10 characters of the P field after `VSBH4`.
fn model_segment(normalized: &str) -> Result<String, ParseError> {
    let rest = after_marker(normalized, DATA_MATRIX_MARKER)?;
    let value = find_field(rest, 'P').ok_or(ParseError::MissingField('P'))?;
    leading_chars(value, 'P', MODEL_LEN)
}

/// Segment 2: first 2 characters of the E field after `SH`.
fn variant_segment(normalized: &str) -> Result<String, ParseError> {
    let rest = after_marker(normalized, SERIES_MARKER)?;
    let value = find_field(rest, 'E').ok_or(ParseError::MissingField('E'))?;
    leading_chars(value, 'E', VARIANT_LEN)
}

/// Segment 3: the digits at offsets 6..9 of the first C field.
fn lot_segment(normalized: &str) -> Result<String, ParseError> {
    let value = find_field(normalized, 'C').ok_or(ParseError::MissingField('C'))?;

    let len = value.chars().count();
    if len < C_FIELD_MIN_LEN {
        return Err(ParseError::FieldTooShort {
            field: 'C',
            len,
            min: C_FIELD_MIN_LEN,
        });
    }

    let digits: String = value
        .chars()
        .skip(C_FIELD_WINDOW_START)
        .take(LOT_LEN)
        .filter(char::is_ascii_digit)
        .collect();

    if digits.len() < LOT_LEN {
        return Err(ParseError::NotEnoughDigits {
            field: 'C',
            found: digits.len(),
            needed: LOT_LEN,
        });
    }

    Ok(digits)
}

/// Text immediately following the first occurrence of `marker`.
fn after_marker<'a>(haystack: &'a str, marker: &'static str) -> Result<&'a str, ParseError> {
    haystack
        .find(marker)
        .map(|at| &haystack[at + marker.len()..])
        .ok_or(ParseError::MissingMarker(marker))
}

/// Value of the first field introduced by GS + `tag`, up to the next GS.
///
/// Text before the first GS is not GS-introduced and is never a field. A field
/// with nothing after its tag does not count; the search moves on.
fn find_field(haystack: &str, tag: char) -> Option<&str> {
    haystack
        .split(GROUP_SEPARATOR)
        .skip(1)
        .find_map(|run| run.strip_prefix(tag).filter(|value| !value.is_empty()))
}

/// The first `len` characters of a field value; shorter values are rejected.
fn leading_chars(value: &str, field: char, len: usize) -> Result<String, ParseError> {
    let taken: String = value.chars().take(len).collect();
    let taken_len = taken.chars().count();

    if taken_len < len {
        return Err(ParseError::FieldTooShort {
            field,
            len: taken_len,
            min: len,
        });
    }

    Ok(taken)
}

// =============================================================================
// Label Path
// =============================================================================

static HYPHENATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{5})-?([A-Z]{2}[0-9]{3})").expect("valid pattern"));

static COMPACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{5}[A-Z]{2}[0-9]{3}").expect("valid pattern"));

static PY_SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PY([0-9]+)").expect("valid pattern"));

static LONG_SERIES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]{5})-?([A-Z]+)([0-9]{3})").expect("valid pattern"));

static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{5,}[A-Z0-9]+").expect("valid pattern"));

/// Label matchers in priority order. The first `Some` wins.
///
/// `hyphenated` and `long_series` overlap; the order is part of the contract.
const LABEL_MATCHERS: &[fn(&str) -> Option<String>] = &[
    hyphenated,
    compact,
    py_series,
    long_series,
    leading_digits,
];

fn parse_label(raw: &str) -> Option<String> {
    LABEL_MATCHERS.iter().find_map(|matcher| matcher(raw))
}

/// `91958-PI010` or `91958PI010` → `91958PI010`
fn hyphenated(raw: &str) -> Option<String> {
    let caps = HYPHENATED.captures(raw)?;
    Some(format!("{}{}", &caps[1], &caps[2]))
}

/// `91958PI010` → `91958PI010`
fn compact(raw: &str) -> Option<String> {
    COMPACT.find(raw).map(|m| m.as_str().to_string())
}

/// `PY24672W` → `PY24672`
fn py_series(raw: &str) -> Option<String> {
    let caps = PY_SERIES.captures(raw)?;
    Some(format!("PY{}", &caps[1]))
}

/// `91958-ABC010` → `91958ABC010`
fn long_series(raw: &str) -> Option<String> {
    let caps = LONG_SERIES.captures(raw)?;
    Some(format!("{}{}{}", &caps[1], &caps[2], &caps[3]))
}

/// Catch-all: a run of 5+ digits and what follows, capped at 15 characters.
fn leading_digits(raw: &str) -> Option<String> {
    let m = LEADING_DIGITS.find(raw)?;
    Some(
        m.as_str()
            .chars()
            .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            .take(MAX_LABEL_CODE_LEN)
            .collect(),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
