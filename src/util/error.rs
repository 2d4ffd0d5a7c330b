//! Error types for seqmatch.

use thiserror::Error;

/// Result alias for seqmatch operations.
pub type SeqMatchResult<T> = std::result::Result<T, SeqMatchError>;

/// Errors that can occur when building matchers or localizing queries.
///
/// Numeric degeneracy during contrast enhancement is not an error: it
/// propagates as non-finite values and can be detected with
/// [`crate::DifferenceMatrix::has_non_finite`] or
/// [`crate::SequenceMatch::is_finite`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SeqMatchError {
    /// The matcher configuration cannot produce a valid search.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: &'static str },
    /// The match-window exclusion leaves no outside candidate to compare against.
    #[error("insufficient candidates: window {window} covers all {len} template scores")]
    InsufficientCandidates { len: usize, window: usize },
    /// A descriptor array has zero rows or zero columns.
    #[error("invalid dimensions: {len} descriptors of dimension {dim}")]
    InvalidDimensions { len: usize, dim: usize },
    /// Reference and query descriptors have different dimensions.
    #[error("descriptor dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    /// The backing buffer is too small for the requested shape.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Pose and descriptor counts of a reference map differ.
    #[error("reference map has {poses} poses but {descriptors} descriptors")]
    LengthMismatch { poses: usize, descriptors: usize },
    /// An index fell outside the valid range.
    #[error("index out of bounds: {context} {index} >= {len}")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// The input data is invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
