//! Shape of search responses over random corpora.

use std::sync::Arc;

use lectern::search::SearchEngine;
use lectern::testing::{make_doc_with_body, make_index};
use lectern::types::{QueryRequest, SortMode};
use proptest::prelude::*;

const VOCABULARY: &[&str] = &[
    "rust", "react", "hooks", "ownership", "generics", "typescript", "compiler", "async",
    "closure", "iterator", "state", "effect",
];
const TAGS: &[&str] = &["rust", "react", "js", "ts", "web"];

fn words(n: std::ops::Range<usize>) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(VOCABULARY), n)
}

fn corpus() -> impl Strategy<Value = Vec<(Vec<&'static str>, Vec<&'static str>, Vec<&'static str>)>> {
    prop::collection::vec(
        (
            words(1..4),
            prop::sample::subsequence(TAGS, 0..3),
            words(0..20),
        ),
        1..25,
    )
}

fn engine(
    docs: &[(Vec<&'static str>, Vec<&'static str>, Vec<&'static str>)],
) -> SearchEngine {
    let documents = docs
        .iter()
        .enumerate()
        .map(|(i, (title, tags, body))| {
            make_doc_with_body(&format!("doc-{}", i), &title.join(" "), tags, i as u32, &body.join(" "))
        })
        .collect();
    SearchEngine::new(Arc::new(make_index(documents)))
}

proptest! {
    #[test]
    fn prop_relevance_scores_ascend(docs in corpus(), query in words(1..3), limit in 1usize..20) {
        let response = engine(&docs).search(&QueryRequest::new(query.join(" ")).with_limit(limit));
        let scores: Vec<f64> = response.matches.iter().filter_map(|m| m.score).collect();
        prop_assert_eq!(scores.len(), response.matches.len());
        prop_assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(scores.iter().all(|s| *s > 0.0 && *s <= 1.0));
    }

    #[test]
    fn prop_limit_and_has_more_agree(docs in corpus(), query in words(1..3), limit in 1usize..20) {
        let response = engine(&docs).search(&QueryRequest::new(query.join(" ")).with_limit(limit));
        prop_assert!(response.matches.len() <= limit);
        prop_assert!(response.total_match_count >= response.matches.len());
        prop_assert!(response.total_match_count <= limit * 2);
        prop_assert_eq!(response.has_more, response.total_match_count > limit);
    }

    #[test]
    fn prop_tag_filter_holds_for_every_result(
        docs in corpus(),
        query in words(1..2),
        wanted in prop::sample::subsequence(TAGS, 1..3),
    ) {
        let request = QueryRequest::new(query.join(" ")).with_tags(wanted.clone());
        for hit in engine(&docs).search(&request).matches {
            for tag in &wanted {
                prop_assert!(hit.document.tags.iter().any(|t| t.contains(tag)));
            }
        }
    }

    #[test]
    fn prop_date_sort_is_newest_first(docs in corpus(), query in words(1..2)) {
        let request = QueryRequest::new(query.join(" ")).sorted_by(SortMode::Date);
        let response = engine(&docs).search(&request);
        prop_assert!(response
            .matches
            .windows(2)
            .all(|w| w[0].document.created_at >= w[1].document.created_at));
    }

    #[test]
    fn prop_sorting_never_changes_the_result_set(docs in corpus(), query in words(1..2)) {
        let engine = engine(&docs);
        let text = query.join(" ");
        let ids = |mode| {
            let mut ids: Vec<String> = engine
                .search(&QueryRequest::new(text.clone()).with_limit(50).sorted_by(mode))
                .matches
                .into_iter()
                .map(|m| m.document.id)
                .collect();
            ids.sort();
            ids
        };
        let relevance = ids(SortMode::Relevance);
        prop_assert_eq!(&relevance, &ids(SortMode::Date));
        prop_assert_eq!(&relevance, &ids(SortMode::Title));
    }
}
