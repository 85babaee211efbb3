//! Field extraction primitives.
//!
//! A labeled value is the text strictly between the first occurrence of a
//! label and the first occurrence of a terminator *after* that label:
//!
//! ```text
//! "... Vlažnost zraka: 65% ..."
//!      ^^^^^^^^^^^^^^^^ ^^ ^
//!      label            |  terminator
//!                       value
//! ```
//!
//! Only the first label is honored when a bulletin repeats it.

use std::str::FromStr;

use regex::Regex;

/// Why a single field could not be extracted from a bulletin.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("label {label:?} not found")]
    LabelNotFound { label: String },

    #[error("terminator {terminator:?} not found after label {label:?}")]
    TerminatorNotFound { label: String, terminator: String },

    #[error("no value after label {label:?}")]
    Empty { label: String },

    #[error("{text:?} is not a valid number")]
    InvalidNumber { text: String },

    #[error("pattern {pattern:?} did not match")]
    NoMatch { pattern: String },
}

/// Return the trimmed text between `label` and the next `terminator`.
///
/// The terminator is searched from the end of the label, so a terminator that
/// only occurs earlier in the text is treated as missing.
pub fn between<'a>(
    text: &'a str,
    label: &str,
    terminator: &str,
) -> Result<&'a str, ExtractionError> {
    let start = text
        .find(label)
        .ok_or_else(|| ExtractionError::LabelNotFound {
            label: label.to_string(),
        })?
        + label.len();

    let end = text[start..]
        .find(terminator)
        .ok_or_else(|| ExtractionError::TerminatorNotFound {
            label: label.to_string(),
            terminator: terminator.to_string(),
        })?
        + start;

    Ok(text[start..end].trim())
}

/// Like [`between`], but `label` is searched from the first `anchor`.
///
/// Used where the label itself is too generic to locate on its own, e.g. the
/// `": "` that precedes the wind speed after `"Piha "`.
pub fn between_after<'a>(
    text: &'a str,
    anchor: &str,
    label: &str,
    terminator: &str,
) -> Result<&'a str, ExtractionError> {
    let anchored = text
        .find(anchor)
        .ok_or_else(|| ExtractionError::LabelNotFound {
            label: anchor.to_string(),
        })?;

    between(&text[anchored..], label, terminator)
}

/// Parse the whole slice as a number.
pub fn parse_number<T: FromStr>(slice: &str) -> Result<T, ExtractionError> {
    slice.parse().map_err(|_| ExtractionError::InvalidNumber {
        text: slice.to_string(),
    })
}

/// Parse only the first whitespace-delimited token of the slice.
///
/// Speeds and pressures are sometimes followed by further figures before the
/// unit (`"4 (sunki 9) m/s"`); only the leading figure is the value.
pub fn parse_first_token<T: FromStr>(slice: &str) -> Result<T, ExtractionError> {
    let token = slice.split_whitespace().next().unwrap_or_default();
    parse_number(token)
}

/// Extract and parse a labeled value.
pub fn labeled<T: FromStr>(
    text: &str,
    label: &str,
    terminator: &str,
) -> Result<T, ExtractionError> {
    parse_number(between(text, label, terminator)?)
}

/// Extract a labeled value and parse its first token.
pub fn labeled_first_token<T: FromStr>(
    text: &str,
    label: &str,
    terminator: &str,
) -> Result<T, ExtractionError> {
    parse_first_token(between(text, label, terminator)?)
}

/// Return the first capture group of the first match of `pattern`.
///
/// Case sensitivity is part of the pattern; text fields use `(?i)`.
pub fn capture<'a>(pattern: &Regex, text: &'a str) -> Result<&'a str, ExtractionError> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(|| ExtractionError::NoMatch {
            pattern: pattern.as_str().to_string(),
        })
}
