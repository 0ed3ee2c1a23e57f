// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ordering.
//!
//! Relevance order is score ascending with the index position as the final
//! tiebreaker, so two documents with identical scores always come back in
//! the order they sit in the index (newest first). Date and title sorts are
//! stable and run on top of relevance order, so relevance breaks their ties.

use std::cmp::Ordering;

use crate::types::{SearchMatch, SortMode};

/// Compare two `(score, index position)` pairs for relevance ranking.
pub fn compare_relevance(a: (f64, usize), b: (f64, usize)) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

/// Title order: case-folded first, then exact text so the order is total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Reorder relevance-ranked matches for the requested sort mode.
pub fn apply_sort(matches: &mut [SearchMatch], mode: SortMode) {
    match mode {
        SortMode::Relevance => {}
        SortMode::Date => {
            matches.sort_by(|a, b| b.document.created_at.cmp(&a.document.created_at));
        }
        SortMode::Title => {
            matches.sort_by(|a, b| compare_titles(&a.document.title, &b.document.title));
        }
    }
}
