//! Grounded answer assembly.
//!
//! The final answer only ever contains verbatim source sentences or a fixed refusal.

use serde::Serialize;
use tracing::debug;

use crate::AlignmentRecord;

/// Answer given when no source sentence supports the generated text.
pub const REFUSAL: &str =
    "Impossible de répondre à cette question en se basant uniquement sur le document fourni.";

/// Minimum similarity for a best-effort source sentence.
const BEST_EFFORT_FLOOR: f32 = 0.3;

/// Maximum number of best-effort source sentences.
const BEST_EFFORT_LIMIT: usize = 5;

/// Which records the answer was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundingTier {
    /// Sources of verified records, in answer order.
    Verified,
    /// Closest unverified sources, by descending similarity.
    BestEffort,
    /// Nothing usable: the refusal.
    Refused,
}

/// A grounded answer and how it was obtained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundedAnswer {
    /// Answer text.
    pub text: String,
    /// Tier that produced the text.
    pub tier: GroundingTier,
}

/// Whether a sentence already ends like one.
fn is_terminated(sentence: &str) -> bool {
    sentence.ends_with(['.', '?', '!', '…'])
}

/// Joins sentences with ". " and ends with a period.
///
/// Sources are copied unchanged. A sentence already ending in `.`, `?`, `!` or `…` gets no
/// extra period.
fn join_sentences(sentences: &[&str]) -> String {
    let mut text = String::new();
    for sentence in sentences {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(sentence);
        if !is_terminated(sentence) {
            text.push('.');
        }
    }
    text
}

/// Builds the answer from alignment records.
///
/// Verified records win. Without any, the up to five closest sources with similarity of at
/// least 0.3 are used, best first. Failing that, the answer is [`REFUSAL`].
pub fn ground(records: &[AlignmentRecord]) -> GroundedAnswer {
    let verified: Vec<&str> = records
        .iter()
        .filter(|r| r.is_aligned())
        .filter_map(AlignmentRecord::source)
        .collect();
    if !verified.is_empty() {
        debug!(sentences = verified.len(), "answer built from verified sources");
        return GroundedAnswer {
            text: join_sentences(&verified),
            tier: GroundingTier::Verified,
        };
    }

    let mut candidates: Vec<(&str, f32)> = records
        .iter()
        .filter(|r| r.similarity() >= BEST_EFFORT_FLOOR)
        .filter_map(|r| r.source().map(|source| (source, r.similarity())))
        .collect();
    // Stable: equal scores keep answer order
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
    candidates.truncate(BEST_EFFORT_LIMIT);

    if candidates.is_empty() {
        debug!(records = records.len(), "no usable source, refusing");
        return GroundedAnswer {
            text: REFUSAL.to_string(),
            tier: GroundingTier::Refused,
        };
    }

    debug!(sentences = candidates.len(), "answer built from best-effort sources");
    let sentences: Vec<&str> = candidates.iter().map(|(s, _)| *s).collect();
    GroundedAnswer {
        text: join_sentences(&sentences),
        tier: GroundingTier::BestEffort,
    }
}

/// Builds the answer text from alignment records. See [`ground`].
pub fn build_grounded_answer(records: &[AlignmentRecord]) -> String {
    ground(records).text
}
