// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning a folder of posts into a [`SearchIndex`].
//!
//! ```text
//! ContentSource ──list──▶ ids ──par_iter──▶ extract_document ──▶ dedupe ──▶ sort ──▶ SearchIndex
//!                                               │
//!                                               └── failures: warn! and skip
//! ```

pub mod document;
pub mod frontmatter;
pub mod markup;
pub mod parallel;
pub mod snapshot;
pub mod source;

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::error::{BuildError, SourceError};
use crate::types::{SearchIndex, SearchableDocument, SCHEMA_VERSION};

pub use document::{
    derive_excerpt, extract_document, reading_time_minutes, word_count, EXCERPT_MAX_CHARS,
    WORDS_PER_MINUTE,
};
pub use frontmatter::{parse_front_matter, split_front_matter, FrontMatter};
pub use markup::strip_markup;
pub use parallel::extract_documents;
pub use snapshot::{corpus_fingerprint, load_snapshot, save_snapshot};
pub use source::{ContentSource, DirectorySource, MemorySource, POST_EXTENSIONS};

/// Build an index from every document the source lists.
///
/// Documents that fail extraction are logged and skipped. The only error is
/// the source failing to enumerate at all.
pub fn build_index(
    source: &dyn ContentSource,
    now: DateTime<Utc>,
) -> Result<SearchIndex, SourceError> {
    let ids = source.list_document_ids()?;
    let documents = extract_documents(source, &ids, now);
    Ok(assemble(documents, ids.len(), now))
}

/// [`build_index`], ticking `progress` once per listed document.
#[cfg(feature = "parallel")]
pub fn build_index_with_progress(
    source: &dyn ContentSource,
    now: DateTime<Utc>,
    progress: &ProgressBar,
) -> Result<SearchIndex, SourceError> {
    let ids = source.list_document_ids()?;
    progress.set_length(ids.len() as u64);
    let documents = parallel::extract_documents_with_progress(source, &ids, now, progress);
    Ok(assemble(documents, ids.len(), now))
}

fn assemble(documents: Vec<SearchableDocument>, listed: usize, now: DateTime<Utc>) -> SearchIndex {
    let mut seen = HashSet::new();
    let mut documents: Vec<SearchableDocument> = documents
        .into_iter()
        .filter(|doc| {
            let fresh = seen.insert(doc.id.clone());
            if !fresh {
                warn!(id = %doc.id, "duplicate document id, keeping first");
            }
            fresh
        })
        .collect();

    // Stable: equal timestamps keep enumeration order.
    documents.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    info!(
        documents = documents.len(),
        skipped = listed - documents.len(),
        "search index built"
    );

    SearchIndex {
        documents,
        built_at: now,
        schema_version: SCHEMA_VERSION.to_string(),
    }
}

/// What [`run_build`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSummary {
    pub documents: usize,
    pub tags: usize,
    pub fingerprint: u32,
}

#[cfg(feature = "parallel")]
fn create_progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<12} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━╸")
}

/// Build from a posts directory and write the snapshot to `output`.
pub fn run_build(input: &Path, output: &Path, now: DateTime<Utc>) -> Result<BuildSummary, BuildError> {
    let source = DirectorySource::new(input);

    #[cfg(feature = "parallel")]
    let index = {
        let progress = ProgressBar::new(0);
        progress.set_style(create_progress_style());
        progress.set_prefix("Extracting");
        let index = build_index_with_progress(&source, now, &progress)?;
        progress.finish_with_message(format!("{} documents", index.len()));
        index
    };

    #[cfg(not(feature = "parallel"))]
    let index = build_index(&source, now)?;

    save_snapshot(&index, output)?;

    let tags: HashSet<&str> = index
        .documents
        .iter()
        .flat_map(|doc| doc.tags.iter().map(String::as_str))
        .collect();

    Ok(BuildSummary {
        documents: index.len(),
        tags: tags.len(),
        fingerprint: corpus_fingerprint(&index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{base_time, raw_post, sample_index};

    #[test]
    fn test_sorted_newest_first() {
        let index = sample_index();
        let ids: Vec<&str> = index.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "intro-to-react-hooks",
                "rust-ownership-basics",
                "typescript-generics-deep-dive"
            ]
        );
        assert_eq!(index.built_at, base_time());
        assert_eq!(index.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_equal_dates_keep_enumeration_order() {
        let source = MemorySource::new(vec![
            ("first", raw_post("First", &[], "2024-01-01", "a")),
            ("second", raw_post("Second", &[], "2024-01-01", "b")),
            ("third", raw_post("Third", &[], "2024-01-01", "c")),
        ]);
        let index = build_index(&source, base_time()).unwrap();
        let ids: Vec<&str> = index.documents.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_source_is_empty_index() {
        let index = build_index(&MemorySource::default(), base_time()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_run_build_writes_snapshot() {
        let posts = tempfile::tempdir().unwrap();
        std::fs::write(
            posts.path().join("hello.mdx"),
            raw_post("Hello", &["intro", "meta"], "2024-05-01", "First post."),
        )
        .unwrap();
        std::fs::write(
            posts.path().join("again.md"),
            raw_post("Again", &["intro"], "2024-05-02", "Second post."),
        )
        .unwrap();

        let out = tempfile::tempdir().unwrap();
        let path = out.path().join("public/search-index.json");
        let summary = run_build(posts.path(), &path, base_time()).unwrap();

        assert_eq!(summary.documents, 2);
        assert_eq!(summary.tags, 2);
        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.documents[0].id, "again");
        assert_eq!(summary.fingerprint, corpus_fingerprint(&loaded));
    }
}
