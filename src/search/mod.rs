// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Querying a built index.
//!
//! [`SearchEngine`] wraps one immutable [`SearchIndex`](crate::types::SearchIndex)
//! and answers ranked queries against it. Everything here is read-only, so
//! one engine is shared across threads behind an `Arc`.

mod engine;
pub mod corpus;
pub mod filter;
pub mod highlight;
pub mod suggest;

pub use corpus::MIN_AUTOCOMPLETE_CHARS;
pub use engine::*;
pub use highlight::{extract_search_terms, highlight_terms};
pub use suggest::{alias_suggestions, MAX_SUGGESTIONS, TYPO_ALIASES};
