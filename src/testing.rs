// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid duplication.

#![doc(hidden)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::build::{build_index, derive_excerpt, reading_time_minutes, word_count, MemorySource};
use crate::clock::ManualClock;
use crate::types::{SearchIndex, SearchableDocument};

/// 2024-01-01T00:00:00Z, the epoch every fixture counts from.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A clock frozen at [`base_time`].
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(base_time()))
}

/// Create a test document created `day` days after [`base_time`].
///
/// This is the canonical implementation used across all tests.
pub fn make_doc(id: &str, title: &str, tags: &[&str], day: u32) -> SearchableDocument {
    make_doc_with_body(id, title, tags, day, &format!("Notes about {}.", title))
}

/// Create a test document with an explicit body.
pub fn make_doc_with_body(
    id: &str,
    title: &str,
    tags: &[&str],
    day: u32,
    body: &str,
) -> SearchableDocument {
    let created_at = base_time() + Duration::days(i64::from(day));
    let words = word_count(body);
    SearchableDocument {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: None,
        excerpt: derive_excerpt(body),
        body_text: body.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        created_at,
        updated_at: created_at,
        word_count: words,
        reading_time_minutes: reading_time_minutes(words),
        url: format!("/blog/{}", id),
    }
}

/// Wrap documents in an index without going through extraction.
pub fn make_index(documents: Vec<SearchableDocument>) -> SearchIndex {
    SearchIndex {
        documents,
        built_at: base_time(),
        schema_version: crate::types::SCHEMA_VERSION.to_string(),
    }
}

/// Raw post text with a YAML front-matter block.
pub fn raw_post(title: &str, tags: &[&str], created: &str, body: &str) -> String {
    let tag_list = tags
        .iter()
        .map(|t| format!("\"{}\"", t))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "---\ntitle: \"{}\"\ntags: [{}]\ncreatedAt: \"{}\"\n---\n\n{}\n",
        title, tag_list, created, body
    )
}

/// The three-post corpus used by the end-to-end scenarios.
pub fn sample_source() -> MemorySource {
    MemorySource::new(vec![
        (
            "intro-to-react-hooks",
            raw_post(
                "Intro to React Hooks",
                &["react", "js"],
                "2024-03-01",
                "# Hooks\n\nHooks let you use **state** in function components. \
                 Call `useState` at the top level.",
            ),
        ),
        (
            "rust-ownership-basics",
            raw_post(
                "Rust Ownership Basics",
                &["rust"],
                "2024-02-01",
                "Every value has a single *owner*. When the owner goes out of scope, \
                 the value is dropped.\n\n```rust\nlet s = String::from(\"hi\");\n```",
            ),
        ),
        (
            "typescript-generics-deep-dive",
            raw_post(
                "TypeScript Generics Deep Dive",
                &["typescript", "ts"],
                "2024-01-15",
                "Generics let a function work over many types. See [the handbook](https://example.com).",
            ),
        ),
    ])
}

/// [`sample_source`] built into an index at [`base_time`].
pub fn sample_index() -> SearchIndex {
    build_index(&sample_source(), base_time()).expect("memory source never fails")
}
