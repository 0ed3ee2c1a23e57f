// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search service: one object owning the engine, the cache and the
//! analytics buffer.
//!
//! # Engine lifecycle
//!
//! ```text
//!   init ──▶ snapshot on disk? ──yes──▶ load ─────────────┐
//!                    │                                    ▼
//!                    └──no──▶ build from source ──▶ save ──▶ swap in
//!
//!   query ──▶ older than ttl? ──yes──▶ rebuild ──▶ save ──▶ swap in, clear cache
//! ```
//!
//! Readers clone the current `Arc<LoadedEngine>` under a short read lock and
//! never wait on a rebuild. Rebuilds are serialized by a separate mutex and
//! build the new engine before taking the write lock, so the swap itself is
//! a pointer assignment. A rebuild that fails leaves the previous engine in
//! place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::analytics::{AnalyticsRecorder, AnalyticsStats};
use crate::build::{
    build_index, corpus_fingerprint, load_snapshot, save_snapshot, ContentSource, DirectorySource,
};
use crate::cache::{CacheStats, QueryCache};
use crate::clock::{Clock, SystemClock};
use crate::config::{duration_from_secs, Config};
use crate::error::ServiceError;
use crate::search::SearchEngine;
use crate::types::{CorpusStats, QueryRequest, QueryResponse, SearchIndex, SearchableDocument, TagCount};

/// An engine plus when it was put in service.
#[derive(Debug)]
pub struct LoadedEngine {
    pub engine: SearchEngine,
    pub loaded_at: DateTime<Utc>,
    /// See [`corpus_fingerprint`].
    pub fingerprint: u32,
}

impl LoadedEngine {
    pub fn index(&self) -> &SearchIndex {
        self.engine.index()
    }

    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.loaded_at < ttl
    }
}

pub struct SearchService {
    source: Arc<dyn ContentSource>,
    snapshot_path: Option<PathBuf>,
    engine: RwLock<Option<Arc<LoadedEngine>>>,
    refresh_lock: Mutex<()>,
    cache: QueryCache,
    analytics: AnalyticsRecorder,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("snapshot_path", &self.snapshot_path)
            .field("engine", &self.current())
            .field("cache", &self.cache)
            .field("analytics", &self.analytics)
            .finish()
    }
}

impl SearchService {
    pub fn new(source: Arc<dyn ContentSource>, config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            snapshot_path: config.index.snapshot_path.clone(),
            engine: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            cache: QueryCache::from_config(&config.cache, Arc::clone(&clock)),
            analytics: AnalyticsRecorder::from_config(&config.analytics, Arc::clone(&clock)),
            clock,
            config,
        }
    }

    /// Posts from `config.index.content_dir`, wall-clock time.
    pub fn from_config(config: Config) -> Self {
        let source = Arc::new(DirectorySource::new(&config.index.content_dir));
        Self::new(source, config, Arc::new(SystemClock))
    }

    /// Replace the analytics recorder built from config.
    pub fn with_analytics(mut self, analytics: AnalyticsRecorder) -> Self {
        self.analytics = analytics;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    fn index_ttl(&self) -> Duration {
        duration_from_secs(self.config.index.ttl_secs)
    }

    /// The engine in service right now, without any staleness check.
    pub fn current(&self) -> Option<Arc<LoadedEngine>> {
        self.engine.read().clone()
    }

    /// Load the snapshot if there is one, otherwise build from source.
    ///
    /// Also restores persisted analytics.
    pub fn init(&self) -> Result<(), ServiceError> {
        self.analytics.load_from_store();
        let _guard = self.refresh_lock.lock();
        self.load_or_build().map(|_| ())
    }

    /// The current engine, rebuilt first if missing or older than the index
    /// ttl.
    pub fn refresh_if_stale(&self) -> Result<Arc<LoadedEngine>, ServiceError> {
        let now = self.clock.now();
        if let Some(loaded) = self.current() {
            if loaded.is_fresh(now, self.index_ttl()) {
                return Ok(loaded);
            }
        }

        let _guard = self.refresh_lock.lock();

        // Another caller may have refreshed while we waited.
        let previous = self.current();
        match previous {
            Some(loaded) if loaded.is_fresh(self.clock.now(), self.index_ttl()) => Ok(loaded),
            Some(loaded) => match self.rebuild() {
                Ok(fresh) => Ok(fresh),
                Err(e) => {
                    error!(error = %e, "search index rebuild failed, keeping previous index");
                    Ok(loaded)
                }
            },
            None => self.load_or_build(),
        }
    }

    /// Rebuild from source now, whatever the age of the current engine.
    ///
    /// On failure the previous engine stays in service and the error is
    /// returned.
    pub fn refresh(&self) -> Result<Arc<LoadedEngine>, ServiceError> {
        let _guard = self.refresh_lock.lock();
        self.rebuild().map_err(|e| {
            if self.current().is_some() {
                error!(error = %e, "search index refresh failed, keeping previous index");
            }
            e
        })
    }

    /// Persist analytics and take the engine out of service.
    pub fn shutdown(&self) {
        self.analytics.flush();
        self.engine.write().take();
        info!("search service shut down");
    }

    // Callers hold `refresh_lock`.
    fn load_or_build(&self) -> Result<Arc<LoadedEngine>, ServiceError> {
        if let Some(index) = self.snapshot_path.as_deref().and_then(load_snapshot) {
            info!(documents = index.len(), "search index loaded from snapshot");
            return Ok(self.install(index));
        }
        info!("no search index snapshot, building from source");
        self.rebuild()
    }

    // Callers hold `refresh_lock`.
    fn rebuild(&self) -> Result<Arc<LoadedEngine>, ServiceError> {
        let index = build_index(self.source.as_ref(), self.clock.now()).map_err(|e| {
            if self.current().is_none() {
                ServiceError::IndexUnavailable(e.to_string())
            } else {
                ServiceError::Source(e)
            }
        })?;

        if let Some(path) = &self.snapshot_path {
            if let Err(e) = save_snapshot(&index, path) {
                warn!(error = %e, "failed to save search index snapshot");
            }
        }

        Ok(self.install(index))
    }

    fn install(&self, index: SearchIndex) -> Arc<LoadedEngine> {
        let fingerprint = corpus_fingerprint(&index);
        let engine = SearchEngine::with_threshold(Arc::new(index), self.config.search.threshold);
        let loaded = Arc::new(LoadedEngine {
            engine,
            loaded_at: self.clock.now(),
            fingerprint,
        });

        *self.engine.write() = Some(Arc::clone(&loaded));
        self.cache.clear();
        info!(
            documents = loaded.index().len(),
            fingerprint = %format!("{:08x}", fingerprint),
            "search engine ready"
        );
        loaded
    }

    /// Cached, tracked search.
    ///
    /// An empty query returns an empty response and is neither cached nor
    /// tracked.
    pub fn search(
        &self,
        request: &QueryRequest,
        client_tag: Option<&str>,
    ) -> Result<QueryResponse, ServiceError> {
        if request.text.trim().is_empty() {
            return Ok(QueryResponse::empty(""));
        }

        let loaded = self.refresh_if_stale()?;

        let response = match self.cache.get(request) {
            Some(hit) => hit,
            None => {
                let response = loaded.engine.search(request);
                self.cache_if_current(&loaded, request, &response);
                response
            }
        };

        self.analytics
            .track(&request.text, response.total_match_count, client_tag);
        Ok(response)
    }

    /// Cache `response` only while `loaded` is still in service. The read
    /// guard is held across the insert, and `install` clears the cache after
    /// swapping, so a response from a replaced engine is never kept.
    fn cache_if_current(&self, loaded: &Arc<LoadedEngine>, request: &QueryRequest, response: &QueryResponse) {
        let slot = self.engine.read();
        match &*slot {
            Some(current) if Arc::ptr_eq(current, loaded) => {
                self.cache.set(request, response.clone());
            }
            _ => debug!("engine replaced mid-query, response not cached"),
        }
    }

    pub fn autocomplete(&self, partial: &str, limit: usize) -> Result<Vec<String>, ServiceError> {
        Ok(self.refresh_if_stale()?.engine.autocomplete(partial, limit))
    }

    pub fn tags(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.refresh_if_stale()?.engine.all_tags())
    }

    pub fn popular_tags(&self, limit: usize) -> Result<Vec<TagCount>, ServiceError> {
        Ok(self.refresh_if_stale()?.engine.popular_tags(limit))
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<SearchableDocument>, ServiceError> {
        Ok(self.refresh_if_stale()?.engine.recent(limit))
    }

    pub fn corpus_stats(&self) -> Result<CorpusStats, ServiceError> {
        Ok(self.refresh_if_stale()?.engine.corpus_stats())
    }

    pub fn analytics_stats(&self) -> AnalyticsStats {
        self.analytics.stats()
    }

    pub fn analytics(&self) -> &AnalyticsRecorder {
        &self.analytics
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
