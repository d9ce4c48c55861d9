//! Error types for alignment.

use thiserror::Error;

/// Errors raised for invalid alignment arguments.
///
/// Aligning itself never fails; these only guard construction.
#[derive(Debug, Error, PartialEq)]
pub enum AlignError {
    /// A similarity threshold outside `[0, 1]`.
    #[error("similarity threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f32),

    /// A similarity score outside `[0, 1]`.
    #[error("similarity must be between 0.0 and 1.0, got {0}")]
    InvalidSimilarity(f32),

    /// A record claims to be verified without naming its source sentence.
    #[error("an aligned record must have a source sentence")]
    AlignedWithoutSource,
}
