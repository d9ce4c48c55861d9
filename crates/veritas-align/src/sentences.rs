//! Sentence splitting.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Sentences this short (in characters, after trimming) carry too little to align.
pub const MIN_SENTENCE_CHARS: usize = 10;

/// Splits text on Unicode sentence boundaries, keeping trimmed sentences longer than
/// [`MIN_SENTENCE_CHARS`].
pub fn split_sentences(text: &str) -> Vec<String> {
    text.unicode_sentences()
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(String::from)
        .collect()
}

/// Like [`split_sentences`], dropping repeated sentences after their first occurrence.
pub fn unique_sentences(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    split_sentences(text)
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
