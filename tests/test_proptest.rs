//! Property-based tests for bigram and sequence-matcher invariants.

use proptest::prelude::*;
use sdcx::{Bigrams, MatcherConfig, SequenceMatcher};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// size() = max(0, len_scalars(s) - 1), for any string.
    #[test]
    fn prop_size_matches_scalar_count_minus_one(s in "\\PC{0,64}") {
        let expected = s.chars().count().saturating_sub(1);
        prop_assert_eq!(Bigrams::from_string(&s).size(), expected);
    }

    /// Union size is additive, and union_in_place leaves the other operand
    /// unchanged.
    #[test]
    fn prop_union_is_additive_and_non_mutating(a in "\\PC{0,32}", b in "\\PC{0,32}") {
        let ba = Bigrams::from_string(&a);
        let bb = Bigrams::from_string(&b);
        let before = bb.size();

        let u = Bigrams::union(&ba, &bb);
        prop_assert_eq!(u.size(), ba.size() + bb.size());
        prop_assert_eq!(bb.size(), before);
    }

    /// intersect_size is symmetric and bounded by the smaller operand.
    #[test]
    fn prop_intersect_size_symmetric_and_bounded(a in "\\PC{0,32}", b in "\\PC{0,32}") {
        let ba = Bigrams::from_string(&a);
        let bb = Bigrams::from_string(&b);
        let i1 = Bigrams::intersect_size(&ba, &bb);
        let i2 = Bigrams::intersect_size(&bb, &ba);
        prop_assert_eq!(i1, i2);
        prop_assert!(i1 <= ba.size().min(bb.size()));
    }

    /// sorensen_dice always lands in [0.0, 1.0].
    #[test]
    fn prop_sdc_in_range(a in "\\PC{0,32}", b in "\\PC{0,32}") {
        let score = Bigrams::sorensen_dice(&Bigrams::from_string(&a), &Bigrams::from_string(&b));
        prop_assert!((0.0..=1.0).contains(&score));
    }

    /// Every emitted match scores at least the threshold and stays within
    /// bounds, for arbitrary token lists and thresholds.
    #[test]
    fn prop_matches_respect_threshold_and_bounds(
        tokens in prop::collection::vec("[a-z]{1,6}", 0..12),
        query in "[a-z]{0,8}",
        threshold in 0.0f64..=1.0f64,
    ) {
        let mut m = SequenceMatcher::new(tokens.len());
        for t in &tokens {
            m.emplace(t, false);
        }

        let matches: Vec<_> = m.r#match(query.as_str(), threshold, false).collect();
        for mm in &matches {
            prop_assert!(mm.begin() < mm.end());
            prop_assert!(mm.end() <= tokens.len());
            prop_assert!(mm.score() >= threshold);
        }

        // canonical order: strictly ascending (begin, end)
        for w in matches.windows(2) {
            prop_assert!((w[0].begin(), w[0].end()) < (w[1].begin(), w[1].end()));
        }
    }

    /// Repeated match() calls with identical inputs produce identical
    /// sequences.
    #[test]
    fn prop_match_is_deterministic(
        tokens in prop::collection::vec("[a-z]{1,6}", 0..10),
        query in "[a-z]{0,8}",
        threshold in 0.0f64..=1.0f64,
    ) {
        let mut m = SequenceMatcher::new(tokens.len());
        for t in &tokens {
            m.emplace(t, false);
        }

        let a: Vec<_> = m.r#match(query.as_str(), threshold, false).map(|mm| (mm.begin(), mm.end())).collect();
        let b: Vec<_> = m.r#match(query.as_str(), threshold, false).map(|mm| (mm.begin(), mm.end())).collect();
        prop_assert_eq!(a, b);
    }

    /// The early-termination optimization must never change *which* matches
    /// are emitted, including for reference sequences that mix single-char
    /// (zero-bigram) tokens with longer ones, where a naive prune bound can
    /// abandon a column before a later row's union catches up to the query.
    #[test]
    fn prop_pruning_never_drops_a_qualifying_match(
        tokens in prop::collection::vec("[a-z]{1,6}", 0..12),
        query in "[a-z]{0,8}",
        threshold in 0.0f64..=1.0f64,
    ) {
        let pruned = {
            let mut m = SequenceMatcher::new(tokens.len());
            for t in &tokens {
                m.emplace(t, false);
            }
            m
        };
        let unpruned = {
            let mut m = SequenceMatcher::with_config(MatcherConfig { reserve: tokens.len(), prune: false });
            for t in &tokens {
                m.emplace(t, false);
            }
            m
        };

        let a: Vec<_> = pruned.r#match(query.as_str(), threshold, false).map(|mm| (mm.begin(), mm.end())).collect();
        let b: Vec<_> = unpruned.r#match(query.as_str(), threshold, false).map(|mm| (mm.begin(), mm.end())).collect();
        prop_assert_eq!(a, b);
    }
}
