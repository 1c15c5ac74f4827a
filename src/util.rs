// Utility helpers for the fixed-offset sub-field slicing and number
// formatting.
//
// This module centralizes the "dirty" string handling so the rest of the
// code can work with clean, typed values.
use num_format::{Locale, ToFormattedString};

use crate::types::DecodeError;

/// Cut a fixed number of leading and trailing characters off a sub-field.
///
/// - Offsets count characters, not bytes; the exports carry accented text.
/// - A piece too short for the requested cuts yields the empty string
///   rather than an error; the empty string then fails numeric parsing at
///   whatever point the schema variant parses it.
pub fn strip_fixed(s: &str, prefix_len: usize, suffix_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    let end = chars.len().saturating_sub(suffix_len);
    if prefix_len >= end {
        return String::new();
    }
    chars[prefix_len..end].iter().collect()
}

/// Parse sliced sub-field text as epoch milliseconds.
///
/// The exports write the value as a plain number; anything else (including
/// the empty string from an undersized piece) is a [`DecodeError`].
pub fn parse_ms(s: &str) -> Result<f64, DecodeError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| DecodeError::BadTimestamp(s.to_string()))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values, used for
    // row counts in console messages (e.g., `9,855 linhas lidas`).
    n.to_formatted_string(&Locale::en)
}
