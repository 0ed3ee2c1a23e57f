// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core types: documents, the index, queries and responses.
//!
//! Serialized names follow the JSON a blog front-end already consumes
//! (`slug`, `content`, `readingTime`, `results`, `hasMore`, ...), so a
//! snapshot written by this crate can be served as a static file as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Results returned when the caller does not ask for a specific count.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Hard cap on results per query, whatever the caller asks for.
pub const MAX_RESULT_LIMIT: usize = 50;

/// Snapshot schema version.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// One post, reduced to what search needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableDocument {
    /// Slug. Unique within an index.
    #[serde(rename = "slug")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub excerpt: String,
    /// Body with all markup stripped.
    #[serde(rename = "content")]
    pub body_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub word_count: usize,
    #[serde(rename = "readingTime")]
    pub reading_time_minutes: usize,
    pub url: String,
}

/// An immutable, fully built corpus.
///
/// Never mutated after construction; a refresh builds a new one and swaps
/// the `Arc` that points at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Sorted by `created_at` descending.
    #[serde(rename = "posts")]
    pub documents: Vec<SearchableDocument>,
    #[serde(rename = "lastUpdated")]
    pub built_at: DateTime<Utc>,
    #[serde(rename = "version")]
    pub schema_version: String,
}

impl SearchIndex {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SearchableDocument> {
        self.documents.iter().find(|doc| doc.id == id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Fuzzy-match order (best score first).
    #[default]
    Relevance,
    /// Newest first.
    Date,
    /// Alphabetical by title.
    Title,
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" | "" => Ok(SortMode::Relevance),
            "date" => Ok(SortMode::Date),
            "title" => Ok(SortMode::Title),
            other => Err(format!(
                "Invalid sortBy '{}'. Expected relevance, date or title.",
                other
            )),
        }
    }
}

/// Inclusive creation-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }

    pub fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub text: String,
    pub limit: usize,
    /// Every requested tag must substring-match some document tag.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, rename = "sortBy")]
    pub sort: SortMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

impl QueryRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_RESULT_LIMIT,
            tags: Vec::new(),
            sort: SortMode::Relevance,
            date_range: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.date_range = if range.is_open() { None } else { Some(range) };
        self
    }

    /// Requested limit clamped to [`MAX_RESULT_LIMIT`].
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_RESULT_LIMIT)
    }
}

/// Which document field a match landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Title,
    Subtitle,
    Tags,
    Excerpt,
    #[serde(rename = "content")]
    Body,
}

impl FieldKind {
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Title,
        FieldKind::Subtitle,
        FieldKind::Tags,
        FieldKind::Excerpt,
        FieldKind::Body,
    ];
}

/// Where a query token matched inside a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSpan {
    #[serde(rename = "key")]
    pub field: FieldKind,
    /// The field term the token matched.
    #[serde(rename = "value")]
    pub term: String,
    /// Char offsets into the normalized field text.
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    #[serde(rename = "item")]
    pub document: SearchableDocument,
    /// Lower is better, in `(0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, rename = "matches", skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<MatchSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(rename = "results")]
    pub matches: Vec<SearchMatch>,
    /// Matches after filtering, before truncation.
    #[serde(rename = "total")]
    pub total_match_count: usize,
    #[serde(rename = "query")]
    pub echoed_query: String,
    #[serde(rename = "suggestions")]
    pub suggested_terms: Vec<String>,
    pub has_more: bool,
    #[serde(rename = "executionTime")]
    pub elapsed_millis: u64,
}

impl QueryResponse {
    pub fn empty(query: impl Into<String>) -> Self {
        Self {
            matches: Vec::new(),
            total_match_count: 0,
            echoed_query: query.into(),
            suggested_terms: Vec::new(),
            has_more: false,
            elapsed_millis: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Corpus-level numbers for the stats endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusStats {
    pub total_posts: usize,
    pub total_tags: usize,
    pub last_updated: DateTime<Utc>,
    pub average_word_count: usize,
    pub average_reading_time: usize,
}
