//! Error types returned by the matching core.

/// Result alias used pervasively across this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors the matching core can surface.
///
/// `OutOfMemory` from the design this crate follows is deliberately absent
/// as a constructible variant: allocator exhaustion is fatal in Rust (an
/// abort), not a recoverable `Result`, so there is nothing to return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A token value could not be interpreted as a string or a bigram
    /// multiset.
    ///
    /// Unreachable through the statically typed builder API
    /// (`SequenceMatcher::append`, `emplace`, `from_tokens`, `r#match`):
    /// those accept `Bigrams`, `&str`, or types that convert losslessly
    /// into one of the two. The variant is kept so the error taxonomy
    /// matches what a dynamically typed caller (e.g. a future binding
    /// layer) would need.
    #[error("unsupported token: {0}")]
    UnsupportedToken(String),

    /// `SequenceMatcher` does not support copy or deep-copy.
    #[error("SequenceMatcher does not support copy/clone")]
    CopyUnsupported,
}
