// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) gives
//! the stock behavior: 5 minute index and cache TTLs, 50 cached queries,
//! 1000 analytics samples, 30 requests per minute per client.
//!
//! ```toml
//! [index]
//! content_dir = "content/posts"
//! snapshot_path = "public/search-index.json"
//! ttl_secs = 300
//!
//! [cache]
//! capacity = 50
//!
//! [rate_limit]
//! max_requests = 30
//! window_secs = 60
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound for every `*_secs` setting: ten years.
pub const MAX_DURATION_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Seconds from config as a `Duration`, clamped to [`MAX_DURATION_SECS`].
pub fn duration_from_secs(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_DURATION_SECS) as i64)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub cache: CacheConfig,
    pub analytics: AnalyticsConfig,
    pub rate_limit: RateLimitConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory of `.mdx` / `.md` posts.
    pub content_dir: PathBuf,
    /// Where the JSON snapshot is written and read. `None` disables snapshots.
    pub snapshot_path: Option<PathBuf>,
    /// Age after which the in-memory index is rebuilt on the next query.
    pub ttl_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content/posts"),
            snapshot_path: Some(PathBuf::from("public/search-index.json")),
            ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            capacity: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Ring buffer size.
    pub capacity: usize,
    /// Optional JSON file receiving the most recent samples.
    pub persist_path: Option<PathBuf>,
    /// How many of the most recent samples are persisted.
    pub persist_recent: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            persist_path: None,
            persist_recent: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fuzzy strictness: 0.0 only accepts substring hits, 1.0 accepts anything.
    pub threshold: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    pub max_query_chars: usize,
    pub max_autocomplete_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: crate::fuzzy::DEFAULT_THRESHOLD,
            default_limit: crate::types::DEFAULT_RESULT_LIMIT,
            max_limit: crate::types::MAX_RESULT_LIMIT,
            max_query_chars: 100,
            max_autocomplete_chars: 50,
        }
    }
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(ConfigError::Invalid(format!(
                "search.threshold must be within [0, 1], got {}",
                self.search.threshold
            )));
        }
        if self.search.max_limit == 0 || self.search.max_limit > crate::types::MAX_RESULT_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "search.max_limit must be within [1, {}]",
                crate::types::MAX_RESULT_LIMIT
            )));
        }
        if self.rate_limit.window_secs == 0 {
            return Err(ConfigError::Invalid("rate_limit.window_secs must be > 0".into()));
        }
        for (name, secs) in [
            ("index.ttl_secs", self.index.ttl_secs),
            ("cache.ttl_secs", self.cache.ttl_secs),
            ("rate_limit.window_secs", self.rate_limit.window_secs),
        ] {
            if secs > MAX_DURATION_SECS {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_DURATION_SECS, secs
                )));
            }
        }
        Ok(())
    }
}
