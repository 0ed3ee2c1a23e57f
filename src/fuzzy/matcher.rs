// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token-level fuzzy matching of a query against one field.
//!
//! A query token hits a field term in one of two ways:
//!
//! - **Substring**: the term contains the token (`"hook"` in `"hooks"`).
//!   Score 0, the best possible. Position inside the field is ignored.
//! - **Edit distance**: the token is within `floor(threshold × len)` edits of
//!   the term. Score `distance / len`, so it never exceeds the threshold.
//!
//! A field matches only if *every* query token hits some term in it. The
//! field score is the mean of the per-token best scores.

use std::collections::HashSet;

use crate::utils::{normalize, tokenize, Token};

use super::bounded_distance;

/// Default strictness. At 0.4 a 5-letter word tolerates 2 typos and a
/// 3-letter word tolerates 1.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Query tokens shorter than this are ignored.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Unique terms of one field, each with the offsets of its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct FieldTerms {
    terms: Vec<Token>,
}

impl FieldTerms {
    pub fn from_text(text: &str) -> Self {
        let mut seen = HashSet::new();
        let terms = tokenize(&normalize(text))
            .into_iter()
            .filter(|token| seen.insert(token.text.clone()))
            .collect();
        Self { terms }
    }

    /// Multi-valued fields (tags) are matched as one space-joined string.
    pub fn from_values<S: AsRef<str>>(values: &[S]) -> Self {
        let joined = values
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" ");
        Self::from_text(&joined)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[Token] {
        &self.terms
    }
}

/// Best term for one query token.
#[derive(Debug, Clone, PartialEq)]
pub struct TermHit {
    pub term: String,
    pub start: usize,
    pub end: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatch {
    /// Mean of the per-token scores, in `[0, threshold]`.
    pub score: f64,
    pub hits: Vec<TermHit>,
}

#[derive(Debug, Clone, Copy)]
pub struct FuzzyMatcher {
    threshold: f64,
    min_token_chars: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            min_token_chars: MIN_TOKEN_CHARS,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Normalized, deduplicated query tokens long enough to match.
    pub fn query_tokens(&self, query: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        tokenize(&normalize(query))
            .into_iter()
            .map(|token| token.text)
            .filter(|text| text.chars().count() >= self.min_token_chars)
            .filter(|text| seen.insert(text.clone()))
            .collect()
    }

    /// Score of `token` against a single normalized `term`, if it matches.
    pub fn token_score(&self, token: &str, term: &str) -> Option<f64> {
        if term.contains(token) {
            return Some(0.0);
        }

        let len = token.chars().count();
        // Epsilon keeps 0.4 × 5 from landing on 1.9999…
        let max_edits = (self.threshold * len as f64 + 1e-9).floor() as usize;
        if max_edits == 0 {
            return None;
        }

        bounded_distance(token, term, max_edits).map(|d| d as f64 / len as f64)
    }

    /// Match all query tokens against one field. `None` if any token misses.
    pub fn match_field(&self, tokens: &[String], field: &FieldTerms) -> Option<FieldMatch> {
        if tokens.is_empty() || field.is_empty() {
            return None;
        }

        let mut hits = Vec::with_capacity(tokens.len());
        for token in tokens {
            let best = field
                .terms()
                .iter()
                .filter_map(|term| {
                    self.token_score(token, &term.text).map(|score| TermHit {
                        term: term.text.clone(),
                        start: term.start,
                        end: term.end,
                        score,
                    })
                })
                // First term wins ties, so the earliest occurrence is reported.
                .fold(None::<TermHit>, |best, hit| match best {
                    Some(b) if b.score <= hit.score => Some(b),
                    _ => Some(hit),
                })?;
            hits.push(best);
        }

        let score = hits.iter().map(|h| h.score).sum::<f64>() / hits.len() as f64;
        Some(FieldMatch { score, hits })
    }
}
