// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Whole-corpus views that need no query: autocomplete, tag listings,
//! recent posts and summary numbers.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::types::{CorpusStats, SearchIndex, SearchableDocument, TagCount};

use super::SearchEngine;

/// Shortest partial query autocomplete will answer.
pub const MIN_AUTOCOMPLETE_CHARS: usize = 2;

/// Body words shorter than this are never offered as completions.
const MIN_BODY_WORD_CHARS: usize = 4;

/// Completions for a partial query, in document order.
///
/// Per document: the title if it contains the query, each tag that contains
/// it, then each body word of 4+ chars that starts with it.
pub fn autocomplete(index: &SearchIndex, partial: &str, limit: usize) -> Vec<String> {
    let query = partial.trim().to_lowercase();
    if query.chars().count() < MIN_AUTOCOMPLETE_CHARS || limit == 0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    let mut offer = |candidate: String| {
        if seen.insert(candidate.clone()) {
            out.push(candidate);
        }
    };

    for doc in &index.documents {
        if doc.title.to_lowercase().contains(&query) {
            offer(doc.title.clone());
        }
        for tag in &doc.tags {
            if tag.to_lowercase().contains(&query) {
                offer(tag.clone());
            }
        }
        for word in doc.body_text.to_lowercase().split_whitespace() {
            if word.chars().count() >= MIN_BODY_WORD_CHARS && word.starts_with(&query) {
                offer(word.to_string());
            }
        }
    }

    out.truncate(limit);
    out
}

/// Every distinct tag, sorted.
pub fn all_tags(index: &SearchIndex) -> Vec<String> {
    index
        .documents
        .iter()
        .flat_map(|doc| doc.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tags by how many documents carry them. Ties keep first appearance.
pub fn popular_tags(index: &SearchIndex, limit: usize) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for tag in index.documents.iter().flat_map(|doc| doc.tags.iter()) {
        match slots.get(tag.as_str()) {
            Some(&slot) => counts[slot].count += 1,
            None => {
                slots.insert(tag.as_str(), counts.len());
                counts.push(TagCount {
                    tag: tag.clone(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Newest `limit` documents.
pub fn recent(index: &SearchIndex, limit: usize) -> Vec<SearchableDocument> {
    let mut docs: Vec<&SearchableDocument> = index.documents.iter().collect();
    docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    docs.into_iter().take(limit).cloned().collect()
}

fn rounded_mean(total: usize, n: usize) -> usize {
    if n == 0 {
        0
    } else {
        (total as f64 / n as f64).round() as usize
    }
}

pub fn corpus_stats(index: &SearchIndex) -> CorpusStats {
    let n = index.len();
    let words: usize = index.documents.iter().map(|d| d.word_count).sum();
    let minutes: usize = index.documents.iter().map(|d| d.reading_time_minutes).sum();

    CorpusStats {
        total_posts: n,
        total_tags: all_tags(index).len(),
        last_updated: index.built_at,
        average_word_count: rounded_mean(words, n),
        average_reading_time: rounded_mean(minutes, n),
    }
}

impl SearchEngine {
    pub fn autocomplete(&self, partial: &str, limit: usize) -> Vec<String> {
        autocomplete(self.index(), partial, limit)
    }

    pub fn all_tags(&self) -> Vec<String> {
        all_tags(self.index())
    }

    pub fn popular_tags(&self, limit: usize) -> Vec<TagCount> {
        popular_tags(self.index(), limit)
    }

    pub fn recent(&self, limit: usize) -> Vec<SearchableDocument> {
        recent(self.index(), limit)
    }

    pub fn corpus_stats(&self) -> CorpusStats {
        corpus_stats(self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{base_time, make_doc, make_doc_with_body, make_index, sample_index};

    #[test]
    fn test_autocomplete_sources_in_order() {
        let index = make_index(vec![
            make_doc_with_body("a", "Rust Ownership", &["rust"], 2, "Rustaceans love rusty crabs."),
            make_doc("b", "Trust Issues", &["trust"], 1),
        ]);
        assert_eq!(
            autocomplete(&index, "rust", 10),
            vec!["Rust Ownership", "rust", "rustaceans", "rusty", "Trust Issues", "trust"]
        );
        assert_eq!(autocomplete(&index, "rust", 2), vec!["Rust Ownership", "rust"]);
    }

    #[test]
    fn test_autocomplete_needs_two_chars() {
        let index = sample_index();
        assert!(autocomplete(&index, "r", 5).is_empty());
        assert!(autocomplete(&index, "  ", 5).is_empty());
        assert!(!autocomplete(&index, "re", 5).is_empty());
    }

    #[test]
    fn test_tags_sorted_and_counted() {
        let index = make_index(vec![
            make_doc("a", "A", &["rust", "wasm"], 3),
            make_doc("b", "B", &["go", "rust"], 2),
            make_doc("c", "C", &["wasm", "go"], 1),
            make_doc("d", "D", &["rust"], 0),
        ]);
        assert_eq!(all_tags(&index), vec!["go", "rust", "wasm"]);

        let popular = popular_tags(&index, 2);
        assert_eq!(
            popular,
            vec![
                TagCount { tag: "rust".into(), count: 3 },
                TagCount { tag: "wasm".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn test_recent_is_newest_first() {
        let index = make_index(vec![
            make_doc("old", "Old", &[], 1),
            make_doc("new", "New", &[], 5),
        ]);
        let ids: Vec<String> = recent(&index, 1).into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["new"]);
    }

    #[test]
    fn test_corpus_stats() {
        let index = make_index(vec![
            make_doc_with_body("a", "A", &["x"], 1, "one two three"),
            make_doc_with_body("b", "B", &["x", "y"], 2, "one two"),
        ]);
        let stats = corpus_stats(&index);
        assert_eq!(stats.total_posts, 2);
        assert_eq!(stats.total_tags, 2);
        assert_eq!(stats.last_updated, base_time());
        // 2.5 rounds away from zero
        assert_eq!(stats.average_word_count, 3);
        assert_eq!(stats.average_reading_time, 1);

        let empty = corpus_stats(&make_index(Vec::new()));
        assert_eq!(empty.average_word_count, 0);
    }
}
