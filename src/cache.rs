// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Short-lived memo of query → response.
//!
//! Bounded by entry count and by age. When full, the entry inserted first
//! goes, regardless of how often it was read. Replacing an existing key
//! keeps its slot in the eviction order.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::config::{duration_from_secs, CacheConfig};
use crate::types::{QueryRequest, QueryResponse};
use crate::utils::normalize_query;

pub const DEFAULT_CACHE_CAPACITY: usize = 50;
pub const DEFAULT_CACHE_TTL_SECS: i64 = 300;

/// `normalized text:options-json`.
///
/// Tags are lowercased and sorted before serializing, so `[React, js]` and
/// `[js, react]` share an entry. Object keys come out sorted.
pub fn cache_key(request: &QueryRequest) -> String {
    let mut tags: Vec<String> = request.tags.iter().map(|t| t.trim().to_lowercase()).collect();
    tags.sort();
    tags.dedup();

    let options = serde_json::json!({
        "limit": request.effective_limit(),
        "tags": tags,
        "sortBy": request.sort,
        "dateRange": request.date_range,
    });
    format!("{}:{}", normalize_query(&request.text), options)
}

#[derive(Debug, Clone)]
struct CacheEntry {
    response: QueryResponse,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest first.
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl CacheState {
    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntryStats {
    pub key: String,
    pub age_millis: i64,
    pub expires_in_millis: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, 0 before the first lookup.
    pub hit_rate: f64,
    pub entries: Vec<CacheEntryStats>,
}

pub struct QueryCache {
    state: Mutex<CacheState>,
    capacity: usize,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.default_ttl)
            .field("size", &self.len())
            .finish()
    }
}

impl QueryCache {
    pub fn new(capacity: usize, default_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            capacity,
            default_ttl,
            clock,
        }
    }

    pub fn from_config(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(
            config.capacity,
            duration_from_secs(config.ttl_secs),
            clock,
        )
    }

    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            DEFAULT_CACHE_CAPACITY,
            Duration::seconds(DEFAULT_CACHE_TTL_SECS),
            clock,
        )
    }

    /// Cached response for `request`, if one is still fresh.
    ///
    /// A stale entry is removed on the way out and counts as a miss.
    pub fn get(&self, request: &QueryRequest) -> Option<QueryResponse> {
        let key = cache_key(request);
        let now = self.clock.now();
        let mut state = self.state.lock();

        if let Some(entry) = state.entries.get(&key) {
            if now < entry.expires_at {
                let response = entry.response.clone();
                state.hits += 1;
                debug!(key = %key, "query cache hit");
                return Some(response);
            }
            state.remove(&key);
        }

        state.misses += 1;
        None
    }

    pub fn set(&self, request: &QueryRequest, response: QueryResponse) {
        self.set_with_ttl(request, response, self.default_ttl);
    }

    pub fn set_with_ttl(&self, request: &QueryRequest, response: QueryResponse, ttl: Duration) {
        if self.capacity == 0 {
            return;
        }

        let key = cache_key(request);
        let now = self.clock.now();
        let entry = CacheEntry {
            response,
            created_at: now,
            expires_at: now + ttl,
        };

        let mut state = self.state.lock();
        if let Some(existing) = state.entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        while state.entries.len() >= self.capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.entries.remove(&oldest);
            debug!(key = %oldest, "query cache evicted");
        }

        state.order.push_back(key.clone());
        state.entries.insert(key, entry);
    }

    /// Drop every expired entry. Returns how many went.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| now < entry.expires_at);
        let CacheState { entries, order, .. } = &mut *state;
        order.retain(|key| entries.contains_key(key));
        before - state.entries.len()
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.order.clear();
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let state = self.state.lock();
        let lookups = state.hits + state.misses;

        let entries = state
            .order
            .iter()
            .filter_map(|key| state.entries.get(key).map(|entry| (key, entry)))
            .map(|(key, entry)| CacheEntryStats {
                key: key.clone(),
                age_millis: (now - entry.created_at).num_milliseconds(),
                expires_in_millis: (entry.expires_at - now).num_milliseconds(),
            })
            .collect();

        CacheStats {
            size: state.entries.len(),
            capacity: self.capacity,
            hits: state.hits,
            misses: state.misses,
            hit_rate: if lookups == 0 {
                0.0
            } else {
                state.hits as f64 / lookups as f64
            },
            entries,
        }
    }
}
