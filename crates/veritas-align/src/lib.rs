//! Answer verification for veritas.
//!
//! A generated answer is never trusted. It is cleaned, split into sentences, and each
//! sentence is matched against the source sentences by Levenshtein similarity. Only source
//! sentences make it into the final answer; when none is close enough the answer is a fixed
//! refusal.

mod clean;
mod distance;
mod error;
mod grounding;
mod matcher;
mod sentences;

pub use clean::clean_generated;
pub use distance::{levenshtein, ratio};
pub use error::AlignError;
pub use grounding::{GroundedAnswer, GroundingTier, REFUSAL, build_grounded_answer, ground};
pub use matcher::{
    Aligner, AlignmentRecord, DEFAULT_PRIMARY_THRESHOLD, NEAR_MATCH_THRESHOLD, find_closest,
};
pub use sentences::{MIN_SENTENCE_CHARS, split_sentences, unique_sentences};
