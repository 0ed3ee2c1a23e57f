//! Edit distance and token scoring.

use lectern::fuzzy::{bounded_distance, FuzzyMatcher, DEFAULT_THRESHOLD};
use proptest::prelude::*;

fn word() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,10}").unwrap()
}

proptest! {
    #[test]
    fn prop_distance_is_symmetric(a in word(), b in word(), max in 0usize..6) {
        prop_assert_eq!(bounded_distance(&a, &b, max), bounded_distance(&b, &a, max));
    }

    #[test]
    fn prop_distance_respects_bound(a in word(), b in word(), max in 0usize..6) {
        if let Some(d) = bounded_distance(&a, &b, max) {
            prop_assert!(d <= max);
        }
        prop_assert_eq!(bounded_distance(&a, &a, max), Some(0));
    }

    #[test]
    fn prop_substring_scores_zero(term in "[a-z]{2,12}", start in 0usize..12, len in 2usize..12) {
        let start = start.min(term.len() - 2);
        let end = (start + len).min(term.len());
        let token = &term[start..end];
        prop_assert_eq!(FuzzyMatcher::default().token_score(token, &term), Some(0.0));
    }

    #[test]
    fn prop_token_score_stays_under_threshold(token in "[a-z]{2,10}", term in word()) {
        if let Some(score) = FuzzyMatcher::default().token_score(&token, &term) {
            prop_assert!((0.0..=DEFAULT_THRESHOLD + 1e-9).contains(&score));
        }
    }

    #[test]
    fn prop_zero_threshold_is_substring_only(token in "[a-z]{2,6}", term in word()) {
        let strict = FuzzyMatcher::new(0.0);
        prop_assert_eq!(strict.token_score(&token, &term).is_some(), term.contains(&token));
    }
}
