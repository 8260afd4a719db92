//! Property-based invariants for field similarity and score combination.
//!
//! `proptest!` usage modeled on `harryzorus-sorex`'s search-scoring property
//! tests (strategy functions feeding a `proptest! { #[test] fn ... }` block),
//! since the teacher this crate is otherwise grounded on never exercises the
//! macro despite declaring the dev-dependency.

use marc_copyright_matcher::config::ScoringWeights;
use marc_copyright_matcher::score_combiner::combine;
use marc_copyright_matcher::similarity::{partial_ratio, ratio, token_sort_ratio};
use proptest::prelude::*;

/// Strategy for ASCII word-like strings, short enough to keep `partial_ratio`'s
/// window scan cheap under proptest's default case count.
fn word_string_strategy() -> impl Strategy<Value = String> {
    "[a-z ]{0,24}"
}

/// Strategy for a `[0, 100]` field score.
fn field_score_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=100.0
}

proptest! {
    /// Property: `ratio` is symmetric regardless of argument order.
    #[test]
    fn prop_ratio_is_symmetric(a in word_string_strategy(), b in word_string_strategy()) {
        let ab = ratio(&a, &b);
        let ba = ratio(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-9);
    }

    /// Property: `ratio` always lands in `[0, 100]`.
    #[test]
    fn prop_ratio_is_bounded(a in word_string_strategy(), b in word_string_strategy()) {
        let score = ratio(&a, &b);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    /// Property: any string has a perfect ratio against itself.
    #[test]
    fn prop_ratio_reflexive(a in word_string_strategy()) {
        prop_assert!((ratio(&a, &a) - 100.0).abs() < 1e-9);
    }

    /// Property: `token_sort_ratio` is insensitive to whitespace-token order.
    #[test]
    fn prop_token_sort_ratio_ignores_order(tokens in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let forward = tokens.join(" ");
        let mut reversed_tokens = tokens.clone();
        reversed_tokens.reverse();
        let reversed = reversed_tokens.join(" ");
        prop_assert!((token_sort_ratio(&forward, &reversed) - 100.0).abs() < 1e-9);
    }

    /// Property: `partial_ratio` always lands in `[0, 100]`.
    #[test]
    fn prop_partial_ratio_is_bounded(a in word_string_strategy(), b in word_string_strategy()) {
        let score = partial_ratio(&a, &b);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    /// Property: a combined score never falls outside the min/max of its
    /// three field scores, for any of the four weight profiles (all weights
    /// are non-negative and each profile sums to 1.0).
    #[test]
    fn prop_combined_within_field_score_bounds(
        title in field_score_strategy(),
        author in field_score_strategy(),
        publisher in field_score_strategy(),
        publisher_present in any::<bool>(),
        is_generic in any::<bool>(),
    ) {
        let weights = ScoringWeights::default();
        let combined = combine(&weights, title, author, publisher, publisher_present, is_generic);
        let considered: Vec<f64> = if publisher_present {
            vec![title, author, publisher]
        } else {
            vec![title, author]
        };
        let lo = considered.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = considered.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(combined >= lo - 1e-9);
        prop_assert!(combined <= hi + 1e-9);
    }
}
