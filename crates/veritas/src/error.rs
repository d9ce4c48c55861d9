//! Error types for the veritas pipeline.

use std::{io, path::PathBuf};

use thiserror::Error;
use veritas_align::AlignError;
use veritas_rank::RankError;

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("failed to read document {path}: {source}")]
    Read {
        /// Path to the document.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// The answer generator failed to produce text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator is unavailable or refused the request.
    #[error("answer generation failed: {0}")]
    Failed(String),
    /// The generator produced nothing.
    #[error("answer generator returned no text")]
    Empty,
}

/// Errors raised while building a pipeline from configuration.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The ranking settings are unusable.
    #[error(transparent)]
    Rank(#[from] RankError),
    /// The alignment settings are unusable.
    #[error(transparent)]
    Align(#[from] AlignError),
}
