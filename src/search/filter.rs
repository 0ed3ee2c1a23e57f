// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Post-match filters. Both run after fuzzy matching, so they only ever see
//! the over-fetched candidate set.

use crate::types::{DateRange, SearchableDocument};

/// Every requested tag must be a case-insensitive substring of at least one
/// document tag. No requested tags passes everything.
pub fn matches_tags(doc: &SearchableDocument, requested: &[String]) -> bool {
    if requested.is_empty() {
        return true;
    }
    let doc_tags: Vec<String> = doc.tags.iter().map(|t| t.to_lowercase()).collect();
    requested.iter().all(|wanted| {
        let wanted = wanted.to_lowercase();
        doc_tags.iter().any(|tag| tag.contains(&wanted))
    })
}

/// Inclusive on both ends; an absent range passes everything.
pub fn matches_date(doc: &SearchableDocument, range: Option<&DateRange>) -> bool {
    range.map_or(true, |range| range.contains(doc.created_at))
}
