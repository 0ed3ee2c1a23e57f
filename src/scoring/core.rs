// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The math behind relevance scores.
//!
//! Each matched field contributes a score in `[0, 1]` (0 = perfect). The
//! document score multiplies the fields together, each raised to its
//! normalized weight:
//!
//! ```text
//! score = Π  max(field_score, ε) ^ (weight / Σ weights)
//! ```
//!
//! Lower is better. A perfect title hit drives the product toward zero much
//! harder than a perfect body hit, because the exponent on ε is eight times
//! larger. Fields that did not match are left out of the product rather
//! than counted as 1, so matching more fields can only improve a score.
//!
//! # Weights
//!
//! | Field    | Weight |
//! |----------|--------|
//! | Title    | 0.40   |
//! | Subtitle | 0.30   |
//! | Tags     | 0.20   |
//! | Excerpt  | 0.10   |
//! | Body     | 0.05   |

use crate::types::FieldKind;

pub const TITLE_WEIGHT: f64 = 0.40;
pub const SUBTITLE_WEIGHT: f64 = 0.30;
pub const TAGS_WEIGHT: f64 = 0.20;
pub const EXCERPT_WEIGHT: f64 = 0.10;
pub const BODY_WEIGHT: f64 = 0.05;

/// Sum of all field weights. The weights bias, they do not need to sum to 1.
pub const TOTAL_WEIGHT: f64 =
    TITLE_WEIGHT + SUBTITLE_WEIGHT + TAGS_WEIGHT + EXCERPT_WEIGHT + BODY_WEIGHT;

/// Floor applied to a perfect field score so the power stays meaningful.
pub const SCORE_EPSILON: f64 = f64::EPSILON;

pub fn field_weight(field: FieldKind) -> f64 {
    match field {
        FieldKind::Title => TITLE_WEIGHT,
        FieldKind::Subtitle => SUBTITLE_WEIGHT,
        FieldKind::Tags => TAGS_WEIGHT,
        FieldKind::Excerpt => EXCERPT_WEIGHT,
        FieldKind::Body => BODY_WEIGHT,
    }
}

pub fn normalized_weight(field: FieldKind) -> f64 {
    field_weight(field) / TOTAL_WEIGHT
}

/// Combine per-field scores into a document score. Empty input scores 1.0,
/// the worst possible value.
pub fn document_score(fields: &[(FieldKind, f64)]) -> f64 {
    fields
        .iter()
        .map(|&(field, score)| {
            score
                .clamp(SCORE_EPSILON, 1.0)
                .powf(normalized_weight(field))
        })
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_are_ordered() {
        let weights: Vec<f64> = FieldKind::ALL.iter().map(|&f| field_weight(f)).collect();
        assert!(weights.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_perfect_title_beats_perfect_body() {
        let title = document_score(&[(FieldKind::Title, 0.0)]);
        let body = document_score(&[(FieldKind::Body, 0.0)]);
        assert!(title < body);
    }

    #[test]
    fn test_more_fields_never_hurt() {
        let title_only = document_score(&[(FieldKind::Title, 0.2)]);
        let title_and_tags = document_score(&[(FieldKind::Title, 0.2), (FieldKind::Tags, 0.3)]);
        assert!(title_and_tags <= title_only);
    }

    #[test]
    fn test_score_range() {
        assert_eq!(document_score(&[]), 1.0);
        let s = document_score(&[(FieldKind::Excerpt, 0.4)]);
        assert!(s > 0.0 && s <= 1.0);
    }
}
