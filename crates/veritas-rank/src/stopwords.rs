//! Stopword filtering for the normalizer.
//!
//! Combines the ISO stopword list for the configured language from the `stop-words` crate with
//! a few fragments left behind by elision (`qu'il` splits into `qu` and `il`).

use std::collections::HashSet;

use crate::Language;

/// French elision fragments missing from the ISO list.
static FRENCH_ELISIONS: &[&str] = &["qu", "jusqu", "lorsqu", "puisqu", "quoiqu"];

/// A case-insensitive stopword set for one language.
#[derive(Debug, Clone)]
pub struct Stopwords {
    /// Lowercased stopwords.
    words: HashSet<String>,
}

impl Stopwords {
    /// Creates the stopword set for a language.
    pub fn for_language(language: Language) -> Self {
        let mut words: HashSet<String> = HashSet::new();

        let mut add_words = |slice: &[&str]| {
            for word in slice {
                words.insert(word.to_lowercase());
            }
        };

        add_words(stop_words::get(language.stopword_list()));
        if language == Language::French {
            add_words(FRENCH_ELISIONS);
        }

        Self { words }
    }

    /// Checks if a term is a stopword.
    pub fn contains(&self, term: &str) -> bool {
        self.words.contains(&term.to_lowercase())
    }

    /// Consumes the set, yielding its lowercased words.
    pub fn into_words(self) -> HashSet<String> {
        self.words
    }

    /// Returns the total number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stopwords are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
