// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-process fuzzy full-text search for a personal blog.
//!
//! Posts are read from a folder of Markdown/MDX files, reduced to
//! searchable records, and queried with a typo-tolerant weighted matcher.
//! A service layer keeps the index fresh, caches responses and records
//! query analytics; a transport-neutral gateway turns raw request
//! parameters into JSON responses with rate limiting.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │   build/    │────▶│   search/    │────▶│  service.rs  │────▶│  gateway/   │
//! │ (extract,   │     │ (fuzzy match,│     │ (refresh,    │     │ (validate,  │
//! │  snapshot)  │     │  rank, sort) │     │  cache, log) │     │  rate limit)│
//! └─────────────┘     └──────────────┘     └──────────────┘     └─────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              types.rs · fuzzy/ · scoring/ · cache.rs · analytics.rs      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use lectern::{Config, QueryRequest, SearchService};
//!
//! let service = SearchService::from_config(Config::default());
//! service.init()?;
//!
//! let response = service.search(&QueryRequest::new("react hooks").with_limit(5), None)?;
//! for hit in &response.matches {
//!     println!("{} {}", hit.document.title, hit.document.url);
//! }
//! ```

pub mod analytics;
pub mod build;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod gateway;
pub mod scoring;
pub mod search;
pub mod service;
pub mod testing;
pub mod types;
pub mod utils;

pub use analytics::{AnalyticsRecorder, AnalyticsStats, AnalyticsStore, JsonFileStore};
pub use build::{build_index, load_snapshot, save_snapshot, ContentSource, DirectorySource, MemorySource};
pub use cache::{cache_key, CacheStats, QueryCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{
    BuildError, ConfigError, ExtractError, GatewayError, PersistError, ServiceError, SourceError,
};
pub use fuzzy::{FuzzyMatcher, DEFAULT_THRESHOLD};
pub use gateway::{Gateway, GatewayResponse, RateLimiter};
pub use search::SearchEngine;
pub use service::{LoadedEngine, SearchService};
pub use types::{
    CorpusStats, DateRange, FieldKind, MatchSpan, QueryRequest, QueryResponse, SearchIndex,
    SearchMatch, SearchableDocument, SortMode, TagCount,
};
pub use utils::normalize;
