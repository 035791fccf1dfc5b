//! # sdcx
//!
//! Fuzzy matching of a query token sequence against a longer reference
//! token sequence, ranked by Sorensen-Dice similarity over character
//! bigram multisets.
//!
//! Given a reference sequence of tokens and a query (a bigram multiset, or
//! anything that converts into one), [`SequenceMatcher`] enumerates every
//! contiguous sub-range of the reference whose combined bigram multiset
//! has a Sorensen-Dice coefficient at or above a threshold, in ascending
//! `(begin, end)` order.
//!
//! ## Example
//!
//! ```
//! use sdcx::SequenceMatcher;
//!
//! let mut matcher = SequenceMatcher::new(0);
//! matcher.emplace("This", false);
//! matcher.emplace("  ", true);
//! matcher.emplace("uses", false);
//! matcher.emplace("  ", true);
//! matcher.emplace("Sorensen", false);
//! matcher.emplace(" -", true);
//! matcher.emplace("Dice", false);
//!
//! for m in matcher.r#match("Sorenson Dice", 0.5, false) {
//!     println!("[{}, {}) score={:.3}", m.begin(), m.end(), m.score());
//! }
//! ```
//!
//! ## What this crate does not do
//!
//! It does not tokenize raw text, parse CLI arguments, or expose language
//! bindings; it accepts token strings or pre-built bigram multisets and a
//! threshold, and returns matches. It does not normalize, lowercase, or
//! segment text, does not weight bigrams by frequency or position, and
//! keeps no index over the reference beyond the triangular cache it
//! builds per query.

pub mod bigram;
pub mod bigrams;
pub mod error;
pub mod invariants;
pub mod multiset;
pub mod sequence_matcher;

pub use bigram::Bigram;
pub use bigrams::Bigrams;
pub use error::{Error, Result};
pub use sequence_matcher::{Match, MatcherConfig, Matches, SequenceMatcher};
