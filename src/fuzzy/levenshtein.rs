// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edit distance with an early-exit optimization.
//!
//! The key insight: `|len(a) - len(b)|` is a lower bound on edit distance.
//! If two strings differ in length by more than the threshold, skip the O(nm) DP.
//! Most field terms are rejected this way before anything is allocated.

/// Edit distance between `a` and `b`, or `None` if it exceeds `max`.
///
/// Bounded Levenshtein with two early-exit paths:
/// 1. If length difference exceeds `max`, return `None` immediately
/// 2. If the minimum value of a DP row exceeds `max`, abandon the DP
///
/// Both are sound: row minima never decrease, so neither exit rejects a
/// pair whose true distance is within `max`.
pub fn bounded_distance(a: &str, b: &str, max: usize) -> Option<usize> {
    // Use character counts, not byte lengths, for Unicode correctness
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if (a_len as isize - b_len as isize).unsigned_abs() > max {
        return None;
    }

    let b_chars: Vec<char> = b.chars().collect();
    let mut dp: Vec<usize> = (0..=b_len).collect();
    for (i, ac) in a.chars().enumerate() {
        let mut prev = dp[0];
        dp[0] = i + 1;
        let mut min_row = dp[0];

        for (j, &bc) in b_chars.iter().enumerate() {
            let temp = dp[j + 1];
            let cost = usize::from(ac != bc);
            dp[j + 1] = (dp[j + 1] + 1).min(dp[j] + 1).min(prev + cost);
            prev = temp;
            min_row = min_row.min(dp[j + 1]);
        }

        if min_row > max {
            return None;
        }
    }

    let distance = dp[b_len];
    (distance <= max).then_some(distance)
}

/// Are these strings within `max` edits of each other?
pub fn levenshtein_within(a: &str, b: &str, max: usize) -> bool {
    bounded_distance(a, b, max).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(levenshtein_within("hello", "hello", 0));
        assert_eq!(bounded_distance("hello", "hello", 0), Some(0));
    }

    #[test]
    fn test_one_edit() {
        assert!(levenshtein_within("hello", "hallo", 1));
        assert!(levenshtein_within("hello", "hell", 1));
        assert!(levenshtein_within("hello", "helloo", 1));
    }

    #[test]
    fn test_early_exit() {
        // Length difference is 5, so distance must be >= 5
        assert!(!levenshtein_within("a", "abcdef", 1));
        assert_eq!(bounded_distance("a", "abcdef", 4), None);
    }

    #[test]
    fn test_reports_actual_distance() {
        assert_eq!(bounded_distance("ownership", "ownrship", 3), Some(1));
        assert_eq!(bounded_distance("typescript", "typscrpt", 3), Some(2));
        assert_eq!(bounded_distance("kitten", "sitting", 3), Some(3));
        assert_eq!(bounded_distance("kitten", "sitting", 2), None);
    }

    #[test]
    fn test_unicode() {
        assert!(levenshtein_within("cafe", "café", 1));
        assert_eq!(bounded_distance("naïve", "naive", 1), Some(1));
    }
}
