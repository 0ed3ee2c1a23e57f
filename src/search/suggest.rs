// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! "Did you mean" terms attached to every response.

use std::collections::HashMap;

use crate::types::SearchMatch;
use crate::utils::normalize_query;

pub const MAX_SUGGESTIONS: usize = 5;

/// How many result tags are offered when a query did find something.
pub const RESULT_TAG_SUGGESTIONS: usize = 3;

/// Common abbreviations and spellings of technical terms, and what to offer
/// instead. Order matters: partial matches are reported in this order.
pub const TYPO_ALIASES: [(&str, &str); 9] = [
    ("reactjs", "react"),
    ("nodejs", "node"),
    ("javascript", "js"),
    ("typescript", "ts"),
    ("nextjs", "next"),
    ("tailwindcss", "tailwind"),
    ("ai", "artificial intelligence"),
    ("ml", "machine learning"),
    ("api", "application programming interface"),
];

fn push_unique(out: &mut Vec<String>, value: &str) {
    if !out.iter().any(|existing| existing == value) {
        out.push(value.to_string());
    }
}

/// Alias suggestions for a query that found nothing.
///
/// An exact key match comes first, then every key that contains the query
/// or is contained by it.
pub fn alias_suggestions(query: &str) -> Vec<String> {
    let query = normalize_query(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    if let Some((_, value)) = TYPO_ALIASES.iter().find(|(key, _)| *key == query) {
        push_unique(&mut out, value);
    }
    for (key, value) in TYPO_ALIASES {
        if key.contains(query.as_str()) || query.contains(key) {
            push_unique(&mut out, value);
        }
    }
    out.truncate(MAX_SUGGESTIONS);
    out
}

/// Most frequent tags among `matches`, ties by first appearance.
pub fn top_result_tags(matches: &[SearchMatch], n: usize) -> Vec<String> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in matches.iter().flat_map(|m| m.document.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert(0);
        if *count == 0 {
            order.push(tag.as_str());
        }
        *count += 1;
    }

    // stable sort keeps first-appearance order among equal counts
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(n).map(str::to_string).collect()
}

/// Suggestions for a finished query: aliases when nothing matched,
/// otherwise the dominant tags of what did.
pub fn suggest_terms(query: &str, matches: &[SearchMatch]) -> Vec<String> {
    if matches.is_empty() {
        alias_suggestions(query)
    } else {
        top_result_tags(matches, RESULT_TAG_SUGGESTIONS)
    }
}
