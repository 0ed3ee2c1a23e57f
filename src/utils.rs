// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Utility functions for string processing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

#[cfg(feature = "unicode-normalization")]
use unicode_normalization::UnicodeNormalization;

/// Normalize a string for search: lowercase, strip diacritics, and collapse whitespace.
///
/// This enables fuzzy matching between ASCII and accented versions:
/// - "café" → "cafe"
/// - "naïve" → "naive"
///
/// # Algorithm (with unicode-normalization feature)
///
/// 1. NFD normalize (decompose characters into base + combining marks)
/// 2. Filter out combining marks
/// 3. Lowercase
/// 4. Collapse whitespace
#[cfg(feature = "unicode-normalization")]
pub fn normalize(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lightweight normalization without the unicode-normalization dependency.
/// Just lowercases and collapses whitespace.
#[cfg(not(feature = "unicode-normalization"))]
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(feature = "unicode-normalization")]
fn is_combining_mark(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Cache and analytics key form of a query: lowercased and trimmed.
///
/// Deliberately weaker than [`normalize`]: interior whitespace and
/// diacritics are kept so `"café"` and `"cafe"` stay distinct samples.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// A word inside a normalized string, with char offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    /// Char offset of the first character.
    pub start: usize,
    /// Char offset one past the last character.
    pub end: usize,
}

/// Split already-normalized text into alphanumeric runs.
///
/// Offsets count characters, not bytes, so they line up with what a
/// JavaScript client sees when it highlights the same string.
pub fn tokenize(normalized: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0;

    for (pos, c) in normalized.chars().enumerate() {
        if c.is_alphanumeric() {
            if current.is_empty() {
                start = pos;
            }
            current.push(c);
        } else if !current.is_empty() {
            let len = current.chars().count();
            tokens.push(Token {
                text: std::mem::take(&mut current),
                start,
                end: start + len,
            });
        }
    }

    if !current.is_empty() {
        let len = current.chars().count();
        tokens.push(Token {
            text: current,
            start,
            end: start + len,
        });
    }

    tokens
}

/// Take at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}

/// Parse the timestamp formats found in post front matter and query strings.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00Z`), naive date-times
/// (`2024-03-01T10:00:00`, read as UTC) and plain dates (`2024-03-01`,
/// read as midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_collapses_and_lowercases() {
        assert_eq!(normalize("  Rust   Ownership\tBasics "), "rust ownership basics");
    }

    #[cfg(feature = "unicode-normalization")]
    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize("Café Naïve"), "cafe naive");
    }

    #[test]
    fn test_tokenize_offsets_are_chars() {
        let tokens = tokenize("intro to react-hooks");
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["intro", "to", "react", "hooks"]);
        assert_eq!((tokens[2].start, tokens[2].end), (9, 14));
        assert_eq!((tokens[3].start, tokens[3].end), (15, 20));
    }

    #[test]
    fn test_truncate_chars_respects_code_points() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-03-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2024-03-01T00:00:00"), Some(midnight));
        assert_eq!(
            parse_timestamp("2024-03-01T02:00:00+02:00"),
            Some(midnight)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
