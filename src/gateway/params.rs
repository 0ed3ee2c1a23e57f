// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Request parameter parsing and validation.
//!
//! GET parameters arrive as strings and are rejected when out of range.
//! POST bodies are JSON and have their search limit clamped instead, which
//! is what programmatic callers expect.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::config::SearchConfig;
use crate::error::GatewayError;
use crate::types::{DateRange, QueryRequest, SortMode};
use crate::utils::parse_timestamp;

/// Query-string parameters, already percent-decoded.
pub type Params = HashMap<String, String>;

/// Most queries one `batch-autocomplete` call may carry.
pub const MAX_BATCH_QUERIES: usize = 5;

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}

/// A non-negative integer parameter, `default` when absent or blank.
pub fn parse_count(raw: Option<&str>, name: &str, default: usize) -> Result<usize, GatewayError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<usize>()
            .map_err(|_| GatewayError::validation(format!("Invalid {} '{}'", name, s))),
    }
}

/// A date bound. Plain dates mean midnight UTC, for `to` as well as `from`.
pub fn parse_date_bound(
    raw: Option<&str>,
    name: &str,
) -> Result<Option<DateTime<Utc>>, GatewayError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| GatewayError::validation(format!("Invalid {} date '{}'", name, s))),
    }
}

pub fn parse_sort(raw: Option<&str>) -> Result<SortMode, GatewayError> {
    raw.unwrap_or_default()
        .parse::<SortMode>()
        .map_err(GatewayError::Validation)
}

pub fn check_query_len(query: &str, caps: &SearchConfig) -> Result<(), GatewayError> {
    if query.chars().count() > caps.max_query_chars {
        return Err(GatewayError::validation(format!(
            "Query too long. Maximum {} characters allowed.",
            caps.max_query_chars
        )));
    }
    Ok(())
}

fn date_range(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Result<DateRange, GatewayError> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(GatewayError::validation("Invalid date range: from is after to"));
        }
    }
    Ok(DateRange { from, to })
}

/// `?q=&limit=&tags=a,b&sortBy=&from=&to=`
pub fn parse_search_params(params: &Params, caps: &SearchConfig) -> Result<QueryRequest, GatewayError> {
    let query = param(params, "q").unwrap_or_default();
    let limit = parse_count(param(params, "limit"), "limit", caps.default_limit)?;
    if limit > caps.max_limit {
        return Err(GatewayError::validation(format!(
            "Limit cannot exceed {} results",
            caps.max_limit
        )));
    }
    if limit == 0 {
        return Err(GatewayError::validation("Limit must be at least 1"));
    }
    check_query_len(query, caps)?;

    let tags: Vec<String> = param(params, "tags")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let range = date_range(
        parse_date_bound(param(params, "from"), "from")?,
        parse_date_bound(param(params, "to"), "to")?,
    )?;

    Ok(QueryRequest::new(query)
        .with_limit(limit)
        .with_tags(tags)
        .sorted_by(parse_sort(param(params, "sortBy"))?)
        .within(range))
}

#[derive(Debug, Default, Deserialize)]
struct DateRangeBody {
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    #[serde(default)]
    query: String,
    limit: Option<u64>,
    #[serde(default)]
    tags: Vec<String>,
    sort_by: Option<String>,
    date_range: Option<DateRangeBody>,
}

/// `{ "action": "search", "query", "limit", "tags", "sortBy", "dateRange" }`
///
/// A missing or zero limit means the default; anything above the cap is
/// clamped.
pub fn parse_search_body(body: Value, caps: &SearchConfig) -> Result<QueryRequest, GatewayError> {
    let body: SearchBody = serde_json::from_value(body)
        .map_err(|e| GatewayError::validation(format!("Invalid search request: {}", e)))?;
    check_query_len(&body.query, caps)?;

    let limit = match body.limit {
        None | Some(0) => caps.default_limit,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX).min(caps.max_limit),
    };

    let range_body = body.date_range.unwrap_or_default();
    let range = date_range(
        parse_date_bound(range_body.from.as_deref(), "from")?,
        parse_date_bound(range_body.to.as_deref(), "to")?,
    )?;

    Ok(QueryRequest::new(body.query)
        .with_limit(limit)
        .with_tags(body.tags.into_iter().filter(|t| !t.trim().is_empty()))
        .sorted_by(parse_sort(body.sort_by.as_deref())?)
        .within(range))
}

/// `{ "action": "batch-autocomplete", "queries": [...] }`
pub fn parse_batch_queries(body: &Value, caps: &SearchConfig) -> Result<Vec<String>, GatewayError> {
    let invalid = || {
        GatewayError::validation(format!(
            "Invalid queries array. Maximum {} queries allowed.",
            MAX_BATCH_QUERIES
        ))
    };

    let queries = match body.get("queries") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid()),
    };
    if queries.len() > MAX_BATCH_QUERIES {
        return Err(invalid());
    }

    queries
        .iter()
        .map(|q| {
            let q = q.as_str().ok_or_else(invalid)?;
            if q.chars().count() > caps.max_autocomplete_chars {
                return Err(GatewayError::validation("Query too long for autocomplete"));
            }
            Ok(q.to_string())
        })
        .collect()
}
