//! End-to-end queries against the three-post sample corpus.

use std::sync::Arc;

use lectern::search::{extract_search_terms, highlight_terms, SearchEngine};
use lectern::testing::sample_index;
use lectern::types::QueryRequest;

fn engine() -> SearchEngine {
    SearchEngine::new(Arc::new(sample_index()))
}

#[test]
fn test_react_finds_the_react_post_first() {
    let response = engine().search(&QueryRequest::new("react"));
    assert!(!response.matches.is_empty());
    assert_eq!(response.matches[0].document.id, "intro-to-react-hooks");
    assert_eq!(response.echoed_query, "react");
    assert!(!response.has_more);
}

#[test]
fn test_tag_filter_can_exclude_every_match() {
    let response = engine().search(&QueryRequest::new("react").with_tags(["rust"]));
    assert!(response.matches.is_empty());
    assert_eq!(response.total_match_count, 0);
    // nothing matched, so suggestions come from the alias table
    assert_eq!(response.suggested_terms, vec!["react"]);
}

#[test]
fn test_empty_query_is_an_empty_response() {
    let response = engine().search(&QueryRequest::new(""));
    assert!(response.matches.is_empty());
    assert_eq!(response.total_match_count, 0);
    assert!(response.suggested_terms.is_empty());
    assert!(!response.has_more);
}

#[test]
fn test_typos_and_case_are_tolerated() {
    for query in ["Ownership", "ownrship", "RUST owner"] {
        let response = engine().search(&QueryRequest::new(query));
        assert_eq!(
            response.matches.first().map(|m| m.document.id.as_str()),
            Some("rust-ownership-basics"),
            "query {:?}",
            query
        );
    }
}

#[test]
fn test_every_query_token_must_match_a_field() {
    let response = engine().search(&QueryRequest::new("generics zzzzqqq"));
    assert!(response.matches.is_empty());
}

#[test]
fn test_identical_queries_give_identical_results() {
    let engine = engine();
    let a = engine.search(&QueryRequest::new("function"));
    let b = engine.search(&QueryRequest::new("function"));
    let ids = |r: &lectern::QueryResponse| {
        r.matches
            .iter()
            .map(|m| (m.document.id.clone(), m.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(ids(&a), ids(&b));
}

#[test]
fn test_highlighting_a_result_title() {
    let response = engine().search(&QueryRequest::new("react hooks"));
    let terms = extract_search_terms("react hooks");
    let title = highlight_terms(&response.matches[0].document.title, &terms);
    assert_eq!(title, "Intro to <mark>React</mark> <mark>Hooks</mark>");
}

#[cfg(feature = "unicode-normalization")]
#[test]
fn test_diacritics_are_folded() {
    use lectern::testing::{make_doc, make_index};

    let index = make_index(vec![make_doc("cafe", "Café Culture", &["naïve"], 0)]);
    let engine = SearchEngine::new(Arc::new(index));
    assert_eq!(engine.search(&QueryRequest::new("cafe")).matches.len(), 1);
    assert_eq!(engine.search(&QueryRequest::new("naive")).matches.len(), 1);
}
