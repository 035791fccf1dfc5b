//! Runtime invariant assertions for bigram and match correctness.
//!
//! These are debug-mode checks that verify the core's invariants at
//! runtime, without affecting release performance.
//!
//! # Usage
//!
//! These assertions are only active in debug builds (`debug_assertions`).
//! In release builds they compile to no-ops.
//!
//! ```
//! use sdcx::bigrams::Bigrams;
//! use sdcx::invariants;
//!
//! let b = Bigrams::from_string("hello");
//! invariants::assert_bigrams_consistent(&b);
//! ```

use crate::bigrams::Bigrams;
use crate::sequence_matcher::Match;

/// Asserts that a `Bigrams` value's maintained size matches the sum of its
/// entry counts, and that no entry has a zero count.
///
/// # Panics
///
/// Panics in debug builds if either invariant is violated.
#[inline]
pub fn assert_bigrams_consistent(bigrams: &Bigrams) {
    #[cfg(debug_assertions)]
    {
        let mut total = 0usize;
        for (bigram, count) in bigrams.iter() {
            debug_assert!(
                count > 0,
                "invariant violation: bigram {bigram} has a zero count"
            );
            total += count;
        }
        debug_assert_eq!(
            total,
            bigrams.size(),
            "invariant violation: size() disagrees with the sum of entry counts"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = bigrams;
    }
}

/// Asserts that a single match's range is within bounds for a reference
/// sequence of `sequence_len` tokens.
///
/// # Panics
///
/// Panics in debug builds if `0 <= begin < end <= sequence_len` does not
/// hold.
#[inline]
pub fn assert_match_in_bounds(m: &Match, sequence_len: usize) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            m.begin() < m.end(),
            "invariant violation: match begin {} is not < end {}",
            m.begin(),
            m.end()
        );
        debug_assert!(
            m.end() <= sequence_len,
            "invariant violation: match end {} exceeds sequence length {}",
            m.end(),
            sequence_len
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (m, sequence_len);
    }
}

/// Asserts that a score falls within a valid Sorensen-Dice coefficient
/// range.
///
/// # Panics
///
/// Panics in debug builds if `score` is outside `[0.0, 1.0]`.
#[inline]
pub fn assert_valid_score(score: f64) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            (0.0..=1.0).contains(&score),
            "invariant violation: score {score} outside [0.0, 1.0]"
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = score;
    }
}

/// Asserts that two successive matches from the same `match` call are in
/// canonical order: ascending `begin`, ties broken by ascending `end`.
///
/// # Panics
///
/// Panics in debug builds if `prev` does not lexicographically precede
/// `next`.
#[inline]
pub fn assert_matches_ordered(prev: &Match, next: &Match) {
    #[cfg(debug_assertions)]
    {
        debug_assert!(
            (prev.begin(), prev.end()) < (next.begin(), next.end()),
            "invariant violation: matches out of canonical order: ({}, {}) then ({}, {})",
            prev.begin(),
            prev.end(),
            next.begin(),
            next.end()
        );
    }
    #[cfg(not(debug_assertions))]
    {
        let _ = (prev, next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence_matcher::SequenceMatcher;

    #[test]
    fn bigrams_consistent_holds_for_normal_construction() {
        assert_bigrams_consistent(&Bigrams::from_string("hello world"));
        assert_bigrams_consistent(&Bigrams::new());
    }

    #[test]
    fn valid_score_accepts_full_range() {
        assert_valid_score(0.0);
        assert_valid_score(1.0);
        assert_valid_score(0.42);
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    #[cfg(debug_assertions)]
    fn valid_score_rejects_out_of_range() {
        assert_valid_score(1.5);
    }

    #[test]
    fn match_bounds_and_order_hold_across_a_real_query() {
        let mut m = SequenceMatcher::new(0);
        m.emplace("alpha", false);
        m.emplace("beta", false);
        m.emplace("gamma", false);

        let matches: Vec<_> = m.r#match("beta", 0.0, false).collect();
        let mut prev: Option<&Match> = None;
        for mm in &matches {
            assert_match_in_bounds(mm, m.len());
            assert_valid_score(mm.score());
            if let Some(p) = prev {
                assert_matches_ordered(p, mm);
            }
            prev = Some(mm);
        }
    }
}
