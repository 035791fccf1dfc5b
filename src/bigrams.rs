//! Counted bigram multiset and Sorensen-Dice similarity.
//!
//! `Bigrams` is the canonical building block the matcher is built on: an
//! ordered mapping from `Bigram` to a positive occurrence count, supporting
//! fast union, fast multiset-intersection cardinality, and O(1) size.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign};

use crate::bigram::Bigram;

/// A counted multiset of [`Bigram`]s, maintained in ascending key order.
///
/// Invariants: no entry has a zero count; keys are pairwise distinct; the
/// total cardinality equals the sum of the counts (tracked separately so
/// [`Bigrams::size`] is O(1)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bigrams {
    counts: BTreeMap<Bigram, usize>,
    total: usize,
}

impl Bigrams {
    /// An empty bigram multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the bigram multiset of a string.
    ///
    /// Bigrams are drawn over Unicode scalar values (`char`), one position
    /// per scalar, with no normalization or case folding. A string of fewer
    /// than two scalars produces an empty multiset.
    #[must_use]
    pub fn from_string(s: &str) -> Self {
        let mut counts: BTreeMap<Bigram, usize> = BTreeMap::new();
        let mut total = 0usize;

        let mut chars = s.chars();
        if let Some(mut prev) = chars.next() {
            for c in chars {
                *counts.entry(Bigram(prev, c)).or_insert(0) += 1;
                total += 1;
                prev = c;
            }
        }

        Self { counts, total }
    }

    /// Total cardinality of the multiset (sum of occurrence counts). O(1).
    #[must_use]
    pub fn size(&self) -> usize {
        self.total
    }

    /// Whether the multiset is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct bigram keys (ignoring their counts).
    #[must_use]
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    /// Iterates `(bigram, count)` pairs in ascending key order.
    ///
    /// Each call produces a fresh, finite, non-restartable cursor.
    pub fn iter(&self) -> impl Iterator<Item = (Bigram, usize)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }

    /// Unions `other` into `self` in place, leaving `other` unchanged.
    pub fn union_in_place(&mut self, other: &Bigrams) {
        for (&k, &v) in &other.counts {
            *self.counts.entry(k).or_insert(0) += v;
        }
        self.total += other.total;
    }

    /// Returns a new `Bigrams` that is the union of `a` and `b`.
    #[must_use]
    pub fn union(a: &Bigrams, b: &Bigrams) -> Bigrams {
        let mut out = a.clone();
        out.union_in_place(b);
        out
    }

    /// Cardinality of the multiset intersection, `sum(min(a[k], b[k]))`.
    ///
    /// Computed with a single linear merge over the two ordered key
    /// sequences.
    #[must_use]
    pub fn intersect_size(a: &Bigrams, b: &Bigrams) -> usize {
        let mut ai = a.counts.iter().peekable();
        let mut bi = b.counts.iter().peekable();
        let mut total = 0usize;

        while let (Some(&(ak, av)), Some(&(bk, bv))) = (ai.peek(), bi.peek()) {
            match ak.cmp(bk) {
                Ordering::Less => {
                    ai.next();
                }
                Ordering::Greater => {
                    bi.next();
                }
                Ordering::Equal => {
                    total += av.min(bv);
                    ai.next();
                    bi.next();
                }
            }
        }

        total
    }

    /// Sorensen-Dice coefficient of `a` and `b`: `2*|a∩b| / (|a|+|b|)`.
    ///
    /// Two empty multisets are defined as identical (`1.0`); the original
    /// implementation this crate is modeled on leaves that case undefined.
    #[must_use]
    pub fn sorensen_dice(a: &Bigrams, b: &Bigrams) -> f64 {
        let denom = a.total + b.total;
        if denom == 0 {
            return 1.0;
        }
        2.0 * Self::intersect_size(a, b) as f64 / denom as f64
    }
}

impl AddAssign<&Bigrams> for Bigrams {
    fn add_assign(&mut self, rhs: &Bigrams) {
        self.union_in_place(rhs);
    }
}

impl Add<&Bigrams> for &Bigrams {
    type Output = Bigrams;

    fn add(self, rhs: &Bigrams) -> Bigrams {
        Bigrams::union(self, rhs)
    }
}

impl Add<Bigrams> for Bigrams {
    type Output = Bigrams;

    fn add(mut self, rhs: Bigrams) -> Bigrams {
        self.union_in_place(&rhs);
        self
    }
}

impl From<&str> for Bigrams {
    fn from(s: &str) -> Self {
        Bigrams::from_string(s)
    }
}

impl From<String> for Bigrams {
    fn from(s: String) -> Self {
        Bigrams::from_string(&s)
    }
}

/// Rebuilds a `Bigrams` from a `(bigram, count)` histogram, e.g. one
/// produced by serializing [`Bigrams::iter`] and parsing it back. Entries
/// with a zero count are dropped, matching the "no zero entries" invariant.
impl FromIterator<(Bigram, usize)> for Bigrams {
    fn from_iter<I: IntoIterator<Item = (Bigram, usize)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        let mut total = 0usize;
        for (k, v) in iter {
            if v == 0 {
                continue;
            }
            *counts.entry(k).or_insert(0) += v;
            total += v;
        }
        Self { counts, total }
    }
}

/// Unions the bigrams of several strings, matching the "union of an
/// iterable of query tokens" adaptor the matcher's `match` accepts.
impl<'a> FromIterator<&'a str> for Bigrams {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut out = Bigrams::new();
        for s in iter {
            out.union_in_place(&Bigrams::from_string(s));
        }
        out
    }
}

impl fmt::Display for Bigrams {
    /// Renders as `wbigrams(size: N, {k1: c1, k2: c2, ...})` in ascending
    /// key order. If the formatter carries a width hint, at most that many
    /// entries are shown before truncating with a trailing `, ...`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wbigrams(size: {}, {{", self.total)?;

        let limit = f.width();
        let mut truncated = false;
        for (i, (bigram, count)) in self.iter().enumerate() {
            if let Some(max) = limit {
                if i >= max {
                    truncated = true;
                    break;
                }
            }
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{bigram}: {count}")?;
        }
        if truncated {
            write!(f, ", ...")?;
        }

        write!(f, "}})")
    }
}
