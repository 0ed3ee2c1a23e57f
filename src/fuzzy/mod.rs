// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy search: typo tolerance via edit distance.
//!
//! A bounded Levenshtein for term-to-term comparisons, and a field matcher
//! built on top of it that turns a query into per-field scores.

mod levenshtein;
mod matcher;

pub use levenshtein::*;
pub use matcher::*;
