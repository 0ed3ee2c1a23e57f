// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One raw post in, one [`SearchableDocument`] out.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::error::ExtractError;
use crate::types::SearchableDocument;
use crate::utils::{parse_timestamp, truncate_chars};

use super::frontmatter::parse_front_matter;
use super::markup::strip_markup;

/// Excerpt budget in characters, ellipsis included.
pub const EXCERPT_MAX_CHARS: usize = 160;

pub const WORDS_PER_MINUTE: usize = 200;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

/// Whitespace-delimited, non-empty tokens.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// `max(1, ceil(words / 200))`.
pub fn reading_time_minutes(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Short preview of already-stripped text.
///
/// Whole sentences are kept while they fit in the budget. If that yields
/// less than half the budget (one enormous first sentence, say), the text
/// is cut hard at 157 characters and an ellipsis appended.
pub fn derive_excerpt(clean: &str) -> String {
    if clean.chars().count() <= EXCERPT_MAX_CHARS {
        return clean.to_string();
    }

    let mut excerpt = String::new();
    let mut len = 0;
    for sentence in SENTENCE_END.split(clean) {
        if sentence.trim().is_empty() {
            continue;
        }
        let sentence_len = sentence.chars().count();
        // +1 for the period re-attached below
        if len + sentence_len + 1 > EXCERPT_MAX_CHARS {
            break;
        }
        excerpt.push_str(sentence);
        excerpt.push('.');
        len += sentence_len + 1;
    }

    if len < EXCERPT_MAX_CHARS / 2 {
        let head = truncate_chars(clean, EXCERPT_MAX_CHARS - 3).trim_end();
        return format!("{}...", head);
    }

    excerpt.trim().to_string()
}

fn parse_date(id: &str, field: &'static str, value: &str) -> Result<DateTime<Utc>, ExtractError> {
    parse_timestamp(value).ok_or_else(|| ExtractError::InvalidDate {
        id: id.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Turn a raw post into a searchable record.
///
/// Missing metadata falls back: title to the id, `createdAt` to `now`,
/// `updatedAt` to `createdAt`.
pub fn extract_document(
    id: &str,
    raw: &str,
    now: DateTime<Utc>,
) -> Result<SearchableDocument, ExtractError> {
    let (front, body) = parse_front_matter(id, raw)?;

    let created_at = match front.created_at.as_deref() {
        Some(value) => parse_date(id, "createdAt", value)?,
        None => now,
    };
    let updated_at = match front.updated_at.as_deref() {
        Some(value) => parse_date(id, "updatedAt", value)?,
        None => created_at,
    };

    let body_text = strip_markup(body);
    let words = word_count(&body_text);

    Ok(SearchableDocument {
        id: id.to_string(),
        title: front.title.unwrap_or_else(|| id.to_string()),
        subtitle: front.subtitle,
        excerpt: derive_excerpt(&body_text),
        tags: front.tags,
        created_at,
        updated_at,
        word_count: words,
        reading_time_minutes: reading_time_minutes(words),
        url: format!("/blog/{}", id),
        body_text,
    })
}
