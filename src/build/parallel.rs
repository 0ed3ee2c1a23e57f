// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel document extraction.
//!
//! Reading and stripping each post is independent of every other post, so
//! rayon fans the work out with `par_iter()`. Results come back in
//! enumeration order regardless of which thread finished first, which is
//! what keeps the later stable sort deterministic. Failures are logged and
//! dropped here; they never reach the builder.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
#[cfg(feature = "parallel")]
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use tracing::warn;

#[cfg(feature = "parallel")]
use indicatif::ProgressBar;

use crate::types::SearchableDocument;

use super::document::extract_document;
use super::source::ContentSource;

fn extract_one(
    source: &dyn ContentSource,
    id: &str,
    now: DateTime<Utc>,
) -> Option<SearchableDocument> {
    let extracted = source
        .read_document(id)
        .and_then(|raw| extract_document(id, &raw, now));
    match extracted {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(id, error = %e, "skipping document");
            None
        }
    }
}

/// Extract every id, in order, skipping the ones that fail.
#[cfg(feature = "parallel")]
pub fn extract_documents(
    source: &dyn ContentSource,
    ids: &[String],
    now: DateTime<Utc>,
) -> Vec<SearchableDocument> {
    ids.par_iter()
        .map(|id| extract_one(source, id, now))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

/// Extract every id, in order, skipping the ones that fail.
#[cfg(not(feature = "parallel"))]
pub fn extract_documents(
    source: &dyn ContentSource,
    ids: &[String],
    now: DateTime<Utc>,
) -> Vec<SearchableDocument> {
    ids.iter()
        .filter_map(|id| extract_one(source, id, now))
        .collect()
}

/// Same as [`extract_documents`], ticking a progress bar per document.
#[cfg(feature = "parallel")]
pub fn extract_documents_with_progress(
    source: &dyn ContentSource,
    ids: &[String],
    now: DateTime<Utc>,
    progress: &ProgressBar,
) -> Vec<SearchableDocument> {
    let counter = AtomicUsize::new(0);
    let total = ids.len();

    ids.par_iter()
        .map(|id| {
            let doc = extract_one(source, id, now);

            let count = counter.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_position(count as u64);
            if count % 10 == 0 || count == total {
                progress.set_message(format!("{}/{}", count, total));
            }

            doc
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}
