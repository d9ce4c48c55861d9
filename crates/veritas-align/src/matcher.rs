//! Alignment of generated sentences against source sentences.
//!
//! Every sentence of a generated answer is compared with every source sentence. The best
//! match decides the outcome:
//!
//! - similarity >= the primary threshold: verified, the source sentence may be quoted
//! - similarity >= [`NEAR_MATCH_THRESHOLD`]: near match, reported but never quoted as verified
//! - otherwise: unmatched, no source

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{AlignError, clean_generated, ratio, split_sentences};

/// Default similarity required for a verified sentence.
pub const DEFAULT_PRIMARY_THRESHOLD: f32 = 0.70;

/// Similarity required to report a near match. Independent of the primary threshold.
pub const NEAR_MATCH_THRESHOLD: f32 = 0.4;

/// The outcome of aligning one generated sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAlignmentRecord")]
pub struct AlignmentRecord {
    /// Sentence of the generated answer.
    generated: String,
    /// Best matching source sentence, when close enough.
    source: Option<String>,
    /// Similarity of the best match.
    similarity: f32,
    /// Whether the match reached the primary threshold.
    aligned: bool,
}

/// Unchecked record fields, validated through [`AlignmentRecord::try_new`].
#[derive(Deserialize)]
struct RawAlignmentRecord {
    /// Generated sentence.
    generated: String,
    /// Matched source sentence.
    #[serde(default)]
    source: Option<String>,
    /// Similarity score.
    similarity: f32,
    /// Verified flag.
    aligned: bool,
}

impl TryFrom<RawAlignmentRecord> for AlignmentRecord {
    type Error = AlignError;

    fn try_from(raw: RawAlignmentRecord) -> Result<Self, Self::Error> {
        Self::try_new(raw.generated, raw.source, raw.similarity, raw.aligned)
    }
}

impl AlignmentRecord {
    /// Creates a record, checking that the similarity is in `[0, 1]` and that a verified
    /// record names its source.
    pub fn try_new(
        generated: impl Into<String>,
        source: Option<String>,
        similarity: f32,
        aligned: bool,
    ) -> Result<Self, AlignError> {
        if !(0.0..=1.0).contains(&similarity) {
            return Err(AlignError::InvalidSimilarity(similarity));
        }
        if aligned && source.is_none() {
            return Err(AlignError::AlignedWithoutSource);
        }
        Ok(Self {
            generated: generated.into(),
            source,
            similarity,
            aligned,
        })
    }

    /// A verified match.
    fn verified(generated: &str, source: &str, similarity: f32) -> Self {
        Self {
            generated: generated.to_string(),
            source: Some(source.to_string()),
            similarity,
            aligned: true,
        }
    }

    /// A match below the primary threshold but above the near-match floor.
    fn near_match(generated: &str, source: &str, similarity: f32) -> Self {
        Self {
            generated: generated.to_string(),
            source: Some(source.to_string()),
            similarity,
            aligned: false,
        }
    }

    /// No usable match.
    fn unmatched(generated: &str, similarity: f32) -> Self {
        Self {
            generated: generated.to_string(),
            source: None,
            similarity,
            aligned: false,
        }
    }

    /// The generated sentence.
    pub fn generated(&self) -> &str {
        &self.generated
    }

    /// The matched source sentence.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Similarity of the best match.
    pub fn similarity(&self) -> f32 {
        self.similarity
    }

    /// Whether the sentence is verified.
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }
}

/// Index and similarity of the most similar candidate. Ties go to the earliest candidate.
///
/// Returns `None` when there are no candidates.
pub fn find_closest<S: AsRef<str>>(text: &str, candidates: &[S]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let score = ratio(text, candidate.as_ref());
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((i, score));
        }
    }
    best
}

/// Best candidate with a strictly positive similarity.
fn best_positive_match<S: AsRef<str>>(text: &str, candidates: &[S]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    let mut best_score = 0.0;
    for (i, candidate) in candidates.iter().enumerate() {
        let score = ratio(text, candidate.as_ref());
        if score > best_score {
            best_score = score;
            best = Some((i, score));
        }
    }
    best
}

/// Aligns generated answers against source sentences.
#[derive(Debug, Clone, Copy)]
pub struct Aligner {
    /// Similarity required for a verified sentence.
    primary_threshold: f32,
}

impl Default for Aligner {
    fn default() -> Self {
        Self {
            primary_threshold: DEFAULT_PRIMARY_THRESHOLD,
        }
    }
}

impl Aligner {
    /// Creates an aligner. Fails unless `primary_threshold` is in `[0, 1]`.
    pub fn new(primary_threshold: f32) -> Result<Self, AlignError> {
        if !(0.0..=1.0).contains(&primary_threshold) {
            return Err(AlignError::InvalidThreshold(primary_threshold));
        }
        Ok(Self { primary_threshold })
    }

    /// Similarity required for a verified sentence.
    pub fn primary_threshold(&self) -> f32 {
        self.primary_threshold
    }

    /// Produces one record per generated sentence longer than ten characters.
    ///
    /// Empty generated text or an empty source list yields no records.
    pub fn align<S: AsRef<str>>(&self, generated: &str, sources: &[S]) -> Vec<AlignmentRecord> {
        if generated.trim().is_empty() || sources.is_empty() {
            return Vec::new();
        }

        let sentences = split_sentences(&clean_generated(generated));
        let records: Vec<AlignmentRecord> = sentences
            .iter()
            .map(|sentence| self.align_sentence(sentence, sources))
            .collect();

        debug!(
            sentences = records.len(),
            verified = records.iter().filter(|r| r.aligned).count(),
            near = records
                .iter()
                .filter(|r| !r.aligned && r.source.is_some())
                .count(),
            "aligned generated answer"
        );
        records
    }

    /// Aligns one cleaned sentence.
    fn align_sentence<S: AsRef<str>>(&self, sentence: &str, sources: &[S]) -> AlignmentRecord {
        if let Some((i, score)) = find_closest(sentence, sources)
            && score >= self.primary_threshold
        {
            trace!(sentence, score, "verified");
            return AlignmentRecord::verified(sentence, sources[i].as_ref(), score);
        }

        match best_positive_match(sentence, sources) {
            Some((i, score)) if score >= NEAR_MATCH_THRESHOLD => {
                trace!(sentence, score, "near match");
                AlignmentRecord::near_match(sentence, sources[i].as_ref(), score)
            }
            best => {
                let score = best.map_or(0.0, |(_, score)| score);
                trace!(sentence, score, "unmatched");
                AlignmentRecord::unmatched(sentence, score)
            }
        }
    }
}
