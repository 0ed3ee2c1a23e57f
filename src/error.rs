// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types, one enum per layer.
//!
//! Extraction errors never escape a build (the document is skipped), snapshot
//! errors never escape a load (the caller rebuilds), and gateway errors are
//! always turned into a structured response. Only [`ServiceError`] reaches
//! library callers unchanged.

use std::path::PathBuf;

/// A single document could not be turned into a searchable record.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("failed to read {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unterminated front matter in {0}")]
    UnterminatedFrontMatter(String),

    #[error("invalid front matter in {id}: {source}")]
    FrontMatter {
        id: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {field} '{value}' in {id}")]
    InvalidDate {
        id: String,
        field: &'static str,
        value: String,
    },
}

/// The content collaborator could not enumerate documents.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to list {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("content source unavailable: {0}")]
    Unavailable(String),
}

/// Writing or reading a JSON file on disk.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A full build-and-save run, as the `index` command performs it.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("failed to save search index: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No index could be built and there is no previous one to fall back on.
    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors surfaced at the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited { retry_after_secs: u64 },

    #[error("Search service unavailable")]
    Unavailable(String),

    #[error("Internal server error")]
    Internal(String),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    /// HTTP status an HTTP layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Validation(_) => 400,
            GatewayError::RateLimited { .. } => 429,
            GatewayError::Unavailable(_) => 503,
            GatewayError::Internal(_) => 500,
        }
    }
}

impl From<ServiceError> for GatewayError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::IndexUnavailable(reason) => GatewayError::Unavailable(reason),
            ServiceError::Source(source) => GatewayError::Unavailable(source.to_string()),
        }
    }
}
