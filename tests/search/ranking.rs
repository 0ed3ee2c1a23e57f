//! Field weights and result ordering.

use std::sync::Arc;

use lectern::search::SearchEngine;
use lectern::testing::{make_doc, make_doc_with_body, make_index};
use lectern::types::{QueryRequest, SortMode};

fn ids(engine: &SearchEngine, request: &QueryRequest) -> Vec<String> {
    engine
        .search(request)
        .matches
        .into_iter()
        .map(|m| m.document.id)
        .collect()
}

#[test]
fn test_tag_hit_beats_body_hit() {
    let index = make_index(vec![
        make_doc_with_body("in-body", "Weekend Notes", &[], 3, "I tried kubernetes."),
        make_doc_with_body("in-tags", "Weekend Notes", &["kubernetes"], 1, "Nothing to see."),
    ]);
    let engine = SearchEngine::new(Arc::new(index));
    assert_eq!(
        ids(&engine, &QueryRequest::new("kubernetes")),
        vec!["in-tags", "in-body"]
    );
}

#[test]
fn test_exact_hit_beats_typo_hit() {
    let index = make_index(vec![
        make_doc("typo", "Borrow Chekcer", &[], 2),
        make_doc("exact", "Borrow Checker", &[], 1),
    ]);
    let engine = SearchEngine::new(Arc::new(index));
    assert_eq!(
        ids(&engine, &QueryRequest::new("checker")),
        vec!["exact", "typo"]
    );
}

#[test]
fn test_date_sort_is_newest_first() {
    let index = make_index(vec![
        make_doc("old", "Rust One", &[], 1),
        make_doc("new", "Rust Two", &[], 30),
        make_doc("mid", "Rust Three", &[], 15),
    ]);
    let engine = SearchEngine::new(Arc::new(index));
    assert_eq!(
        ids(&engine, &QueryRequest::new("rust").sorted_by(SortMode::Date)),
        vec!["new", "mid", "old"]
    );
}

#[test]
fn test_title_sort_ignores_case() {
    let index = make_index(vec![
        make_doc("z", "zebra rust", &[], 1),
        make_doc("b", "Bravo rust", &[], 2),
        make_doc("a", "alpha rust", &[], 3),
    ]);
    let engine = SearchEngine::new(Arc::new(index));
    assert_eq!(
        ids(&engine, &QueryRequest::new("rust").sorted_by(SortMode::Title)),
        vec!["a", "b", "z"]
    );
}

#[test]
fn test_limit_is_capped_at_fifty() {
    let docs = (0..60)
        .map(|i| make_doc(&format!("post-{}", i), "Rust Tips", &["rust"], i))
        .collect();
    let engine = SearchEngine::new(Arc::new(make_index(docs)));
    let response = engine.search(&QueryRequest::new("rust").with_limit(500));
    assert_eq!(response.matches.len(), 50);
    assert!(response.has_more);
}
