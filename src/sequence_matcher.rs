//! Fuzzy matching of a query bigram multiset against contiguous sub-ranges
//! of a reference token sequence, ranked by Sorensen-Dice similarity.

use std::borrow::Cow;

use rayon::prelude::*;

use crate::bigrams::Bigrams;
use crate::error::{Error, Result};

/// A token of the reference sequence: its bigram multiset plus whether it
/// may anchor a match.
#[derive(Debug, Clone)]
struct TokenEntry {
    bigrams: Bigrams,
    /// `true` means this token may not be the first or last token of any
    /// emitted match (it is structurally a separator).
    strip: bool,
}

/// Construction-time tunables for a [`SequenceMatcher`].
#[derive(Debug, Clone, Copy)]
pub struct MatcherConfig {
    /// Anticipated number of tokens, used to pre-size the token vector.
    pub reserve: usize,
    /// Whether the early-termination optimization of `match` is applied.
    ///
    /// Defaults to `true`. Disabling it never changes *which* matches are
    /// emitted, only how many candidate ranges are evaluated before a
    /// column is abandoned; it exists so tests and benchmarks can compare
    /// pruned against unpruned enumeration directly.
    pub prune: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            reserve: 0,
            prune: true,
        }
    }
}

/// Converts a token value into owned bigrams, for `SequenceMatcher`
/// construction helpers that accept either raw strings or pre-built
/// [`Bigrams`].
pub trait IntoBigrams {
    /// Converts `self` into an owned [`Bigrams`].
    fn into_bigrams(self) -> Bigrams;
}

impl IntoBigrams for &str {
    fn into_bigrams(self) -> Bigrams {
        Bigrams::from_string(self)
    }
}

impl IntoBigrams for String {
    fn into_bigrams(self) -> Bigrams {
        Bigrams::from_string(&self)
    }
}

impl IntoBigrams for Bigrams {
    fn into_bigrams(self) -> Bigrams {
        self
    }
}

/// A single token accepted by [`SequenceMatcher::from_tokens`]: a token
/// value on its own (defaulting `strip` to `false`), or a `(value, strip)`
/// pair.
pub trait IntoToken {
    /// Converts `self` into `(bigrams, strip)`.
    fn into_token(self) -> (Bigrams, bool);
}

impl<V: IntoBigrams> IntoToken for V {
    fn into_token(self) -> (Bigrams, bool) {
        (self.into_bigrams(), false)
    }
}

impl<V: IntoBigrams> IntoToken for (V, bool) {
    fn into_token(self) -> (Bigrams, bool) {
        (self.0.into_bigrams(), self.1)
    }
}

/// A matched contiguous sub-range of the reference sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    begin: usize,
    end: usize,
    score: f64,
    bigrams: Option<Bigrams>,
}

impl Match {
    /// Index of the first token of the matching sub-sequence.
    #[must_use]
    pub fn begin(&self) -> usize {
        self.begin
    }

    /// Index just past the last token of the matching sub-sequence.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of tokens the match spans (`end - begin`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Whether the match is empty (never true for a match this crate
    /// produces, since every range has at least one token).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The Sorensen-Dice similarity of the matching sub-sequence and the
    /// query.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Borrows the matching sub-sequence's bigrams, if `include_bigrams`
    /// was requested.
    #[must_use]
    pub fn bigrams(&self) -> Option<&Bigrams> {
        self.bigrams.as_ref()
    }

    /// Takes ownership of the matching sub-sequence's bigrams, if present.
    #[must_use]
    pub fn into_bigrams(self) -> Option<Bigrams> {
        self.bigrams
    }
}

/// Holds the reference token sequence and answers fuzzy match queries
/// against it.
///
/// The matcher owns a flat vector of per-token bigram multisets plus a
/// per-token strip flag. A `match` call lazily materializes, per column,
/// the running union of an ever-growing token range and walks it in
/// canonical order (ascending begin, then ascending end), yielding every
/// range whose Sorensen-Dice similarity to the query is at least the
/// given threshold.
///
/// `SequenceMatcher` intentionally does not implement `Clone`: see
/// [`SequenceMatcher::try_clone`].
#[derive(Debug)]
pub struct SequenceMatcher {
    tokens: Vec<TokenEntry>,
    prune: bool,
}

impl SequenceMatcher {
    /// An empty matcher, reserving space for `reserve` tokens.
    #[must_use]
    pub fn new(reserve: usize) -> Self {
        Self::with_config(MatcherConfig {
            reserve,
            ..MatcherConfig::default()
        })
    }

    /// An empty matcher built from an explicit [`MatcherConfig`].
    #[must_use]
    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            tokens: Vec::with_capacity(config.reserve),
            prune: config.prune,
        }
    }

    /// Builds a matcher from an iterable of tokens, each either a bare
    /// token value (`&str`, `String`, or `Bigrams`) or a `(value, strip)`
    /// pair.
    ///
    /// If the iterator reports an exact size, it is used to pre-reserve
    /// space in preference to `reserve`.
    #[must_use]
    pub fn from_tokens<I>(tokens: I, reserve: usize) -> Self
    where
        I: IntoIterator,
        I::Item: IntoToken,
    {
        let iter = tokens.into_iter();
        let hint = match iter.size_hint() {
            (lower, Some(upper)) if lower == upper => lower.max(reserve),
            _ => reserve,
        };
        let mut matcher = Self::new(hint);
        for token in iter {
            let (bigrams, strip) = token.into_token();
            matcher.append(bigrams, strip);
        }
        matcher
    }

    /// Reserves space for `n` additional tokens.
    pub fn reserve(&mut self, n: usize) {
        self.tokens.reserve(n);
    }

    /// Appends a token, given as pre-built bigrams.
    ///
    /// If `strip` is `true`, no emitted match may begin or end with this
    /// token (though its bigrams still contribute to the unions of ranges
    /// that contain it internally).
    ///
    /// Must not be called once a `match` iterator over this matcher is in
    /// progress and has not yet been exhausted or dropped.
    pub fn append(&mut self, bigrams: Bigrams, strip: bool) {
        self.tokens.push(TokenEntry { bigrams, strip });
    }

    /// Appends a token given as a string, equivalent to
    /// `append(Bigrams::from_string(token), strip)`.
    pub fn emplace(&mut self, token: &str, strip: bool) {
        self.append(Bigrams::from_string(token), strip);
    }

    /// Number of tokens in the reference sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the reference sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// `SequenceMatcher` cannot be copied or deep-copied; this always
    /// returns `Err(Error::CopyUnsupported)`.
    ///
    /// Provided so callers migrating from a "maybe cloneable" API get the
    /// documented error value rather than a compile error with no
    /// corresponding spec concept; the absence of a `Clone` impl already
    /// makes `matcher.clone()` a compile-time error on its own.
    pub fn try_clone(&self) -> Result<Self> {
        Err(Error::CopyUnsupported)
    }

    /// Matches `query` against every contiguous sub-range of the reference
    /// sequence, yielding those whose Sorensen-Dice similarity is at least
    /// `threshold`, in canonical order (ascending begin, then ascending
    /// end).
    ///
    /// `query` may be a `&str`, `String`, or pre-built `Bigrams`; to match
    /// against the union of several tokens, build the query with
    /// `Bigrams: FromIterator<&str>` first.
    ///
    /// The returned iterator borrows `self` and must not outlive a
    /// mutation of the token sequence.
    #[must_use]
    pub fn r#match(
        &self,
        query: impl Into<Bigrams>,
        threshold: f64,
        include_bigrams: bool,
    ) -> Matches<'_> {
        let query = query.into();
        Matches::new(&self.tokens, query, threshold, include_bigrams, self.prune)
    }

    /// Runs [`SequenceMatcher::r#match`] for each `(query, threshold)` pair
    /// in parallel, returning one materialized match vector per query, in
    /// input order.
    ///
    /// Each query still gets its own fresh per-match matrix: this
    /// parallelizes independent `match` calls, it does not share matrix
    /// construction cost across queries.
    #[must_use]
    pub fn match_batch(&self, queries: &[(Bigrams, f64)], include_bigrams: bool) -> Vec<Vec<Match>> {
        queries
            .par_iter()
            .map(|(query, threshold)| {
                self.r#match(query.clone(), *threshold, include_bigrams)
                    .collect()
            })
            .collect()
    }
}

/// Lazy iterator over the matches of a single `SequenceMatcher::r#match`
/// call.
///
/// Walks the upper-triangular union matrix column by column (ascending
/// start index), and within each column, row by row (ascending length),
/// materializing only the running union for the current column. Dropped
/// at any point without side effects.
///
/// Emits a `tracing::trace!` per matrix row built and per column pruned,
/// and a single `tracing::debug!` summarizing token count, threshold, and
/// total matches once the iterator is exhausted.
pub struct Matches<'a> {
    tokens: &'a [TokenEntry],
    query: Bigrams,
    threshold: f64,
    include_bigrams: bool,
    prune: bool,
    /// Current column (range start index).
    c: usize,
    /// Current row within the column (range length - 1).
    r: usize,
    /// Maximum row index valid for the current column.
    max_r: usize,
    /// Running union U[r][c] for the current column.
    running: Cow<'a, Bigrams>,
    /// Matches yielded so far, for the closing `debug!` summary.
    emitted: usize,
    /// Set once the closing summary has been logged, so dropping a
    /// partially-consumed iterator doesn't log twice.
    finished: bool,
}

impl<'a> Matches<'a> {
    fn new(
        tokens: &'a [TokenEntry],
        query: Bigrams,
        threshold: f64,
        include_bigrams: bool,
        prune: bool,
    ) -> Self {
        let n = tokens.len();
        let (max_r, running) = if n > 0 {
            (n - 1, Cow::Borrowed(&tokens[0].bigrams))
        } else {
            (0, Cow::Owned(Bigrams::new()))
        };

        Self {
            tokens,
            query,
            threshold,
            include_bigrams,
            prune,
            c: 0,
            r: 0,
            max_r,
            running,
            emitted: 0,
            finished: false,
        }
    }

    fn advance_column(&mut self) {
        self.c += 1;
        self.r = 0;
        if self.c < self.tokens.len() {
            self.max_r = self.tokens.len() - 1 - self.c;
            self.running = Cow::Borrowed(&self.tokens[self.c].bigrams);
        }
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let n = self.tokens.len();

        loop {
            if self.c >= n {
                if !self.finished {
                    self.finished = true;
                    tracing::debug!(
                        tokens = n,
                        threshold = self.threshold,
                        matches = self.emitted,
                        "finished sequence match"
                    );
                }
                return None;
            }

            // Extend the running union to U[r][c] if we're past row 0.
            if self.r > 0 {
                let idx = self.c + self.r;
                let addend = &self.tokens[idx].bigrams;
                self.running.to_mut().union_in_place(addend);
            }
            tracing::trace!(c = self.c, r = self.r, union_size = self.running.size(), "built matrix row");

            let union_size = self.running.size();
            let query_size = self.query.size();
            let score = Bigrams::sorensen_dice(&self.running, &self.query);

            let begin = self.c;
            let end = self.c + self.r + 1;
            let strip_ok = !self.tokens[begin].strip && !self.tokens[end - 1].strip;
            let emit = strip_ok && score >= self.threshold;

            // SDC <= 2*min(|U|,|Q|)/(|U|+|Q|). While |U| < |Q| that bound is
            // still climbing as |U| grows, so it only becomes safe to prune
            // once |U| >= |Q|: from that point on min(|U|,|Q|) is pinned at
            // |Q| and the bound is non-increasing as |U| keeps growing.
            let prune_column = self.prune && union_size >= query_size && {
                let denom = union_size + query_size;
                denom != 0 && 2.0 * (union_size.min(query_size) as f64) / (denom as f64) < self.threshold
            };
            if prune_column {
                tracing::trace!(c = self.c, r = self.r, union_size, query_size, "pruned column");
            }

            let result = emit.then(|| Match {
                begin,
                end,
                score,
                bigrams: self.include_bigrams.then(|| self.running.clone().into_owned()),
            });

            if prune_column || self.r >= self.max_r {
                self.advance_column();
            } else {
                self.r += 1;
            }

            if result.is_some() {
                self.emitted += 1;
                return result;
            }
        }
    }
}
