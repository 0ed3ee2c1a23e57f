// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The request boundary.
//!
//! Transport-neutral: an HTTP layer hands over the query string (or JSON
//! body) and headers, and gets back a status, cache headers and a JSON body.
//! Nothing raised inside the service escapes as a panic or an untyped
//! error; every failure becomes a [`GatewayResponse`] with an
//! `{"error": ...}` body.
//!
//! | action             | method | cache-control          |
//! |--------------------|--------|------------------------|
//! | `search` (default) | both   | `public, max-age=300`  |
//! | `autocomplete`     | GET    | `public, max-age=600`  |
//! | `batch-autocomplete` | POST | `public, max-age=600`  |
//! | `tags`             | GET    | `public, max-age=3600` |
//! | `popular-tags`     | GET    | `public, max-age=3600` |
//! | `stats`            | GET    | `public, max-age=3600` |
//! | `recent`           | GET    | `public, max-age=300`  |
//! | `analytics`        | GET    | `no-store`             |

pub mod params;
pub mod rate_limit;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::clock::Clock;
use crate::error::GatewayError;
use crate::service::SearchService;

pub use params::{Params, MAX_BATCH_QUERIES};
pub use rate_limit::RateLimiter;

/// Request headers. Names are matched case-insensitively.
pub type Headers = HashMap<String, String>;

pub const CACHE_SEARCH: &str = "public, max-age=300";
pub const CACHE_AUTOCOMPLETE: &str = "public, max-age=600";
pub const CACHE_CORPUS: &str = "public, max-age=3600";
pub const CACHE_NONE: &str = "no-store";

pub const AUTOCOMPLETE_DEFAULT_LIMIT: usize = 5;
pub const AUTOCOMPLETE_MAX_LIMIT: usize = 10;
pub const POPULAR_TAGS_DEFAULT_LIMIT: usize = 10;
pub const POPULAR_TAGS_MAX_LIMIT: usize = 20;
pub const RECENT_DEFAULT_LIMIT: usize = 5;
pub const RECENT_MAX_LIMIT: usize = 10;

/// Client bucket when no forwarding header is present.
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: u16,
    pub cache_control: &'static str,
    /// Quoted CRC32 of the body. Successful responses only.
    pub etag: Option<String>,
    pub body: Value,
}

impl GatewayResponse {
    fn ok(body: Value, cache_control: &'static str) -> Self {
        let etag = serde_json::to_vec(&body)
            .ok()
            .map(|bytes| format!("\"{:08x}\"", crc32fast::hash(&bytes)));
        Self {
            status: 200,
            cache_control,
            etag,
            body,
        }
    }

    pub fn error(err: &GatewayError) -> Self {
        let body = match err {
            GatewayError::RateLimited { retry_after_secs } => json!({
                "error": err.to_string(),
                "retryAfter": retry_after_secs,
            }),
            _ => json!({ "error": err.to_string() }),
        };
        Self {
            status: err.status(),
            cache_control: CACHE_NONE,
            etag: None,
            body,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// First `x-forwarded-for` entry, else `x-real-ip`, else [`UNKNOWN_CLIENT`].
pub fn client_id(headers: &Headers) -> String {
    if let Some(first) = header(headers, "x-forwarded-for")
        .and_then(|list| list.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
    {
        return first.to_string();
    }
    header(headers, "x-real-ip")
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, GatewayError> {
    serde_json::to_value(value).map_err(|e| GatewayError::Internal(e.to_string()))
}

#[derive(Debug)]
pub struct Gateway {
    service: Arc<SearchService>,
    limiter: RateLimiter,
}

impl Gateway {
    /// Rate limits come from the service's config.
    pub fn new(service: Arc<SearchService>, clock: Arc<dyn Clock>) -> Self {
        let limiter = RateLimiter::from_config(&service.config().rate_limit, clock);
        Self { service, limiter }
    }

    pub fn with_limiter(service: Arc<SearchService>, limiter: RateLimiter) -> Self {
        Self { service, limiter }
    }

    pub fn service(&self) -> &SearchService {
        &self.service
    }

    fn admit(&self, client: &str) -> Result<(), GatewayError> {
        self.limiter.check(client).map_err(|retry_after_secs| {
            warn!(client, retry_after_secs, "rate limit exceeded");
            GatewayError::RateLimited { retry_after_secs }
        })
    }

    fn respond(result: Result<GatewayResponse, GatewayError>) -> GatewayResponse {
        result.unwrap_or_else(|err| {
            match &err {
                GatewayError::Internal(detail) | GatewayError::Unavailable(detail) => {
                    error!(error = %detail, "search request failed");
                }
                _ => {}
            }
            GatewayResponse::error(&err)
        })
    }

    /// Handle a GET. `action` defaults to `search`.
    pub fn handle_get(&self, params: &Params, headers: &Headers) -> GatewayResponse {
        let client = client_id(headers);
        Self::respond(
            self.admit(&client)
                .and_then(|()| self.dispatch_get(params, &client)),
        )
    }

    /// Handle a POST with a JSON body.
    pub fn handle_post(&self, body: &str, headers: &Headers) -> GatewayResponse {
        let client = client_id(headers);
        Self::respond(
            self.admit(&client)
                .and_then(|()| self.dispatch_post(body, &client)),
        )
    }

    fn dispatch_get(&self, params: &Params, client: &str) -> Result<GatewayResponse, GatewayError> {
        let caps = &self.service.config().search;
        let get = |name: &str| params.get(name).map(String::as_str);

        match get("action").unwrap_or("search") {
            "search" => {
                let request = params::parse_search_params(params, caps)?;
                let response = self.service.search(&request, Some(client))?;
                Ok(GatewayResponse::ok(to_body(&response)?, CACHE_SEARCH))
            }
            "autocomplete" => {
                let query = get("q").unwrap_or_default();
                let limit = params::parse_count(get("limit"), "limit", AUTOCOMPLETE_DEFAULT_LIMIT)?;
                Ok(GatewayResponse::ok(
                    json!({ "suggestions": self.autocomplete(query, limit)? }),
                    CACHE_AUTOCOMPLETE,
                ))
            }
            "tags" => Ok(GatewayResponse::ok(
                json!({ "tags": self.service.tags()? }),
                CACHE_CORPUS,
            )),
            "popular-tags" => {
                let limit = params::parse_count(get("limit"), "limit", POPULAR_TAGS_DEFAULT_LIMIT)?;
                let tags = self.service.popular_tags(limit.min(POPULAR_TAGS_MAX_LIMIT))?;
                Ok(GatewayResponse::ok(json!({ "tags": to_body(&tags)? }), CACHE_CORPUS))
            }
            "stats" => {
                let stats = self.service.corpus_stats()?;
                Ok(GatewayResponse::ok(to_body(&stats)?, CACHE_CORPUS))
            }
            "recent" => {
                let limit = params::parse_count(get("limit"), "limit", RECENT_DEFAULT_LIMIT)?;
                let posts = self.service.recent(limit.min(RECENT_MAX_LIMIT))?;
                Ok(GatewayResponse::ok(json!({ "posts": to_body(&posts)? }), CACHE_SEARCH))
            }
            "analytics" => Ok(GatewayResponse::ok(
                json!({
                    "analytics": to_body(&self.service.analytics_stats())?,
                    "cache": to_body(&self.service.cache_stats())?,
                }),
                CACHE_NONE,
            )),
            _ => Err(GatewayError::validation("Invalid action parameter")),
        }
    }

    fn dispatch_post(&self, body: &str, client: &str) -> Result<GatewayResponse, GatewayError> {
        let caps = &self.service.config().search;
        let body: Value = serde_json::from_str(body)
            .map_err(|e| GatewayError::validation(format!("Invalid JSON body: {}", e)))?;

        match body.get("action").and_then(Value::as_str) {
            Some("search") => {
                let request = params::parse_search_body(body, caps)?;
                let response = self.service.search(&request, Some(client))?;
                Ok(GatewayResponse::ok(to_body(&response)?, CACHE_SEARCH))
            }
            Some("batch-autocomplete") => {
                let queries = params::parse_batch_queries(&body, caps)?;
                let results = queries
                    .into_iter()
                    .map(|query| {
                        let suggestions = self.autocomplete(&query, AUTOCOMPLETE_DEFAULT_LIMIT)?;
                        Ok(json!({ "query": query, "suggestions": suggestions }))
                    })
                    .collect::<Result<Vec<Value>, GatewayError>>()?;
                Ok(GatewayResponse::ok(json!({ "results": results }), CACHE_AUTOCOMPLETE))
            }
            _ => Err(GatewayError::validation("Invalid action parameter")),
        }
    }

    /// Short queries get no suggestions; long ones are refused.
    fn autocomplete(&self, query: &str, limit: usize) -> Result<Vec<String>, GatewayError> {
        let caps = &self.service.config().search;
        let len = query.trim().chars().count();
        if len < crate::search::MIN_AUTOCOMPLETE_CHARS {
            return Ok(Vec::new());
        }
        if query.chars().count() > caps.max_autocomplete_chars {
            return Err(GatewayError::validation("Query too long for autocomplete"));
        }
        Ok(self
            .service
            .autocomplete(query, limit.min(AUTOCOMPLETE_MAX_LIMIT))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_client_id_precedence() {
        assert_eq!(
            client_id(&headers(&[
                ("X-Forwarded-For", " 10.0.0.1 , 10.0.0.2"),
                ("x-real-ip", "10.0.0.9")
            ])),
            "10.0.0.1"
        );
        assert_eq!(client_id(&headers(&[("x-real-ip", "10.0.0.9")])), "10.0.0.9");
        assert_eq!(client_id(&headers(&[("x-forwarded-for", " ")])), "unknown");
        assert_eq!(client_id(&Headers::new()), "unknown");
    }

    #[test]
    fn test_error_response_shape() {
        let response = GatewayResponse::error(&GatewayError::RateLimited { retry_after_secs: 42 });
        assert_eq!(response.status, 429);
        assert_eq!(response.cache_control, CACHE_NONE);
        assert_eq!(response.body["retryAfter"], 42);
        assert!(response.body["error"].as_str().unwrap().contains("Rate limit"));
        assert!(!response.is_success());
    }

    #[test]
    fn test_etag_is_stable() {
        let a = GatewayResponse::ok(json!({"tags": ["rust"]}), CACHE_CORPUS);
        let b = GatewayResponse::ok(json!({"tags": ["rust"]}), CACHE_CORPUS);
        let c = GatewayResponse::ok(json!({"tags": ["go"]}), CACHE_CORPUS);
        assert_eq!(a.etag, b.etag);
        assert_ne!(a.etag, c.etag);
        assert!(a.etag.unwrap().starts_with('"'));
    }
}
