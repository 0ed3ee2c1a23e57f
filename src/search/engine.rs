// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query pipeline.
//!
//! ```text
//! query ─▶ tokens ─▶ match every document ─▶ top 2×limit ─▶ tag filter
//!       ─▶ date filter ─▶ sort ─▶ truncate ─▶ suggestions
//! ```
//!
//! Field terms are tokenized once when the engine is built, so a query only
//! pays for the edit-distance checks.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::fuzzy::{FieldMatch, FieldTerms, FuzzyMatcher};
use crate::scoring::document_score;
use crate::scoring::ranking::{apply_sort, compare_relevance};
use crate::types::{FieldKind, MatchSpan, QueryRequest, QueryResponse, SearchIndex, SearchMatch};
use crate::utils::truncate_chars;

use super::filter::{matches_date, matches_tags};
use super::suggest::suggest_terms;

/// Longest query the engine will tokenize. Callers enforce tighter caps.
pub const MAX_ENGINE_QUERY_CHARS: usize = 1000;

/// Candidates kept per requested result, to leave room for the filters.
pub const OVERFETCH_FACTOR: usize = 2;

/// Pre-tokenized fields of one document.
#[derive(Debug, Clone)]
struct DocumentFields {
    title: FieldTerms,
    subtitle: FieldTerms,
    tags: FieldTerms,
    excerpt: FieldTerms,
    body: FieldTerms,
}

impl DocumentFields {
    fn get(&self, field: FieldKind) -> &FieldTerms {
        match field {
            FieldKind::Title => &self.title,
            FieldKind::Subtitle => &self.subtitle,
            FieldKind::Tags => &self.tags,
            FieldKind::Excerpt => &self.excerpt,
            FieldKind::Body => &self.body,
        }
    }
}

/// A ranked, immutable view over one [`SearchIndex`].
#[derive(Debug, Clone)]
pub struct SearchEngine {
    index: Arc<SearchIndex>,
    fields: Vec<DocumentFields>,
    matcher: FuzzyMatcher,
}

impl SearchEngine {
    pub fn new(index: Arc<SearchIndex>) -> Self {
        Self::with_matcher(index, FuzzyMatcher::default())
    }

    pub fn with_threshold(index: Arc<SearchIndex>, threshold: f64) -> Self {
        Self::with_matcher(index, FuzzyMatcher::new(threshold))
    }

    pub fn with_matcher(index: Arc<SearchIndex>, matcher: FuzzyMatcher) -> Self {
        let fields = index
            .documents
            .iter()
            .map(|doc| DocumentFields {
                title: FieldTerms::from_text(&doc.title),
                subtitle: doc
                    .subtitle
                    .as_deref()
                    .map(FieldTerms::from_text)
                    .unwrap_or_default(),
                tags: FieldTerms::from_values(&doc.tags),
                excerpt: FieldTerms::from_text(&doc.excerpt),
                body: FieldTerms::from_text(&doc.body_text),
            })
            .collect();

        Self {
            index,
            fields,
            matcher,
        }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn shared_index(&self) -> Arc<SearchIndex> {
        Arc::clone(&self.index)
    }

    pub fn threshold(&self) -> f64 {
        self.matcher.threshold()
    }

    /// Score one document. `None` when no field matches.
    fn score_document(&self, position: usize, tokens: &[String]) -> Option<(f64, Vec<MatchSpan>)> {
        let fields = &self.fields[position];
        let mut scored = Vec::new();
        let mut spans = Vec::new();

        for field in FieldKind::ALL {
            let Some(FieldMatch { score, hits }) = self.matcher.match_field(tokens, fields.get(field))
            else {
                continue;
            };
            scored.push((field, score));
            spans.extend(hits.into_iter().map(|hit| MatchSpan {
                field,
                term: hit.term,
                start: hit.start,
                end: hit.end,
            }));
        }

        if scored.is_empty() {
            None
        } else {
            Some((document_score(&scored), spans))
        }
    }

    /// Best `limit` matches for `tokens`, in relevance order.
    fn rank(&self, tokens: &[String], limit: usize) -> Vec<SearchMatch> {
        let mut ranked: Vec<(f64, usize, Vec<MatchSpan>)> = (0..self.fields.len())
            .filter_map(|pos| {
                self.score_document(pos, tokens)
                    .map(|(score, spans)| (score, pos, spans))
            })
            .collect();

        ranked.sort_by(|a, b| compare_relevance((a.0, a.1), (b.0, b.1)));
        ranked.truncate(limit);

        ranked
            .into_iter()
            .map(|(score, pos, spans)| SearchMatch {
                document: self.index.documents[pos].clone(),
                score: Some(score),
                spans,
            })
            .collect()
    }

    /// Run a query through the full pipeline.
    pub fn search(&self, request: &QueryRequest) -> QueryResponse {
        let started = Instant::now();
        let query = truncate_chars(request.text.trim(), MAX_ENGINE_QUERY_CHARS).trim_end();
        if query.is_empty() {
            return QueryResponse::empty(query);
        }

        let limit = request.effective_limit();
        let tokens = self.matcher.query_tokens(query);

        let mut matches: Vec<SearchMatch> = self
            .rank(&tokens, limit.saturating_mul(OVERFETCH_FACTOR))
            .into_iter()
            .filter(|m| matches_tags(&m.document, &request.tags))
            .filter(|m| matches_date(&m.document, request.date_range.as_ref()))
            .collect();

        apply_sort(&mut matches, request.sort);

        let total = matches.len();
        let suggested_terms = suggest_terms(query, &matches);
        matches.truncate(limit);

        let elapsed_millis = started.elapsed().as_millis() as u64;
        debug!(query, total, elapsed_millis, "search");

        QueryResponse {
            matches,
            total_match_count: total,
            echoed_query: query.to_string(),
            suggested_terms,
            has_more: total > limit,
            elapsed_millis,
        }
    }
}
