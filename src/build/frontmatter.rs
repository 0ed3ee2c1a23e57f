// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! YAML front matter at the top of a post.
//!
//! ```text
//! ---
//! title: Intro to React Hooks
//! subtitle: useState, useEffect and friends
//! tags: [react, js]
//! createdAt: 2024-03-01
//! ---
//! Body starts here.
//! ```
//!
//! Authors are inconsistent about types (`title: 2024`, `tags: react`), so
//! values are read from an untyped YAML tree and coerced: scalars become
//! strings, a non-list `tags` is ignored, empty tags are dropped.

use serde_yaml::Value;

use crate::error::ExtractError;

/// Metadata fields the index cares about. Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Split raw text into `(front matter YAML, body)`.
///
/// A document without an opening `---` line has no front matter. An opening
/// fence without a closing one is an error rather than silently treating
/// the whole post as YAML.
pub fn split_front_matter<'a>(id: &str, raw: &'a str) -> Result<(Option<&'a str>, &'a str), ExtractError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let first_line_end = raw.find('\n').unwrap_or(raw.len());
    if !is_fence(&raw[..first_line_end]) {
        return Ok((None, raw));
    }

    let yaml_start = (first_line_end + 1).min(raw.len());
    let mut offset = yaml_start;
    for line in raw[yaml_start..].split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        if is_fence(line.trim_end_matches('\n')) {
            let yaml = &raw[yaml_start..line_start];
            return Ok((Some(yaml), &raw[offset..]));
        }
    }

    Err(ExtractError::UnterminatedFrontMatter(id.to_string()))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse front matter and return it with the remaining body.
pub fn parse_front_matter<'a>(id: &str, raw: &'a str) -> Result<(FrontMatter, &'a str), ExtractError> {
    let (yaml, body) = split_front_matter(id, raw)?;
    let Some(yaml) = yaml else {
        return Ok((FrontMatter::default(), body));
    };

    if yaml.trim().is_empty() {
        return Ok((FrontMatter::default(), body));
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|source| ExtractError::FrontMatter {
        id: id.to_string(),
        source,
    })?;

    let field = |key: &str| value.get(key).and_then(scalar_to_string);

    let mut tags: Vec<String> = Vec::new();
    if let Some(Value::Sequence(items)) = value.get("tags") {
        for tag in items.iter().filter_map(scalar_to_string) {
            let tag = tag.trim().to_string();
            if !tag.is_empty() && !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    let front = FrontMatter {
        title: non_empty(field("title")),
        subtitle: non_empty(field("subtitle")),
        tags,
        created_at: non_empty(field("createdAt")),
        updated_at: non_empty(field("updatedAt")),
    };

    Ok((front, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_front_matter() {
        let (front, body) = parse_front_matter("x", "Just a body.").unwrap();
        assert_eq!(front, FrontMatter::default());
        assert_eq!(body, "Just a body.");
    }

    #[test]
    fn test_full_front_matter() {
        let raw = "---\ntitle: Intro to React Hooks\nsubtitle: State in functions\ntags: [react, js]\ncreatedAt: 2024-03-01\nupdatedAt: \"2024-03-05T10:00:00Z\"\n---\nBody here.\n";
        let (front, body) = parse_front_matter("x", raw).unwrap();
        assert_eq!(front.title.as_deref(), Some("Intro to React Hooks"));
        assert_eq!(front.subtitle.as_deref(), Some("State in functions"));
        assert_eq!(front.tags, vec!["react", "js"]);
        assert_eq!(front.created_at.as_deref(), Some("2024-03-01"));
        assert_eq!(front.updated_at.as_deref(), Some("2024-03-05T10:00:00Z"));
        assert_eq!(body, "Body here.\n");
    }

    #[test]
    fn test_coerces_scalars_and_drops_empty_tags() {
        let raw = "---\ntitle: 2024\ntags: [rust, 42, \"\", rust]\n---\n";
        let (front, _) = parse_front_matter("x", raw).unwrap();
        assert_eq!(front.title.as_deref(), Some("2024"));
        assert_eq!(front.tags, vec!["rust", "42"]);
    }

    #[test]
    fn test_non_list_tags_are_ignored() {
        let raw = "---\ntitle: T\ntags: rust\n---\nbody";
        let (front, _) = parse_front_matter("x", raw).unwrap();
        assert!(front.tags.is_empty());
    }

    #[test]
    fn test_unterminated_front_matter() {
        let err = parse_front_matter("broken", "---\ntitle: T\nbody").unwrap_err();
        assert!(matches!(err, ExtractError::UnterminatedFrontMatter(_)));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_front_matter("bad", "---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, ExtractError::FrontMatter { .. }));
    }

    #[test]
    fn test_crlf_fences() {
        let raw = "---\r\ntitle: Windows\r\n---\r\nBody";
        let (front, body) = parse_front_matter("x", raw).unwrap();
        assert_eq!(front.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body");
    }
}
