// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Client-side helpers: pull terms out of a query, wrap them in `<mark>`.

use regex::{Regex, RegexBuilder};

/// Lowercase, split on whitespace, drop 1-char tokens and strip non-word
/// characters.
pub fn extract_search_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| term.chars().count() > 1)
        .map(|term| {
            term.chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|term| !term.is_empty())
        .collect()
}

fn highlighter(terms: &[String]) -> Option<Regex> {
    let mut terms: Vec<&str> = terms
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return None;
    }
    // Longest first so "react" wins over "re" at the same position.
    terms.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    RegexBuilder::new(&format!("({})", alternation))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Wrap every case-insensitive occurrence of any term in `<mark>`.
///
/// One pass over `text`, so a term can never match inside markup added for
/// another term.
pub fn highlight_terms(text: &str, terms: &[String]) -> String {
    match highlighter(terms) {
        Some(re) => re.replace_all(text, "<mark>$1</mark>").into_owned(),
        None => text.to_string(),
    }
}
