//! Error types for the ranking engine.

use thiserror::Error;

/// Errors raised while building a ranker.
///
/// Ranking itself never fails; every degenerate input produces an empty ranking.
#[derive(Debug, Error)]
pub enum RankError {
    /// The configured language has no stemmer or stopword list.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A BM25+ parameter is out of range.
    #[error("invalid BM25 parameter {name} = {value}: {expected}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f32,
        /// Accepted range.
        expected: &'static str,
    },

    /// A domain weight would shrink a term's IDF.
    #[error("invalid domain weight for '{term}': {weight} (must be a finite number >= 1.0)")]
    InvalidDomainWeight {
        /// Term the weight applies to.
        term: String,
        /// Rejected weight.
        weight: f32,
    },
}
