//! Language selection for stemming and stopwords.

use std::{fmt, str::FromStr};

use stop_words::LANGUAGE;
use tantivy::tokenizer::Language as StemmerLanguage;

use crate::RankError;

/// A language with both a Snowball stemmer and an ISO stopword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Dutch.
    Dutch,
    /// English.
    English,
    /// French.
    French,
    /// German.
    German,
    /// Italian.
    Italian,
    /// Portuguese.
    Portuguese,
    /// Spanish.
    Spanish,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Self; 7] = [
        Self::Dutch,
        Self::English,
        Self::French,
        Self::German,
        Self::Italian,
        Self::Portuguese,
        Self::Spanish,
    ];

    /// Lowercase name as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dutch => "dutch",
            Self::English => "english",
            Self::French => "french",
            Self::German => "german",
            Self::Italian => "italian",
            Self::Portuguese => "portuguese",
            Self::Spanish => "spanish",
        }
    }

    /// The matching tantivy stemmer language.
    pub(crate) fn stemmer(self) -> StemmerLanguage {
        match self {
            Self::Dutch => StemmerLanguage::Dutch,
            Self::English => StemmerLanguage::English,
            Self::French => StemmerLanguage::French,
            Self::German => StemmerLanguage::German,
            Self::Italian => StemmerLanguage::Italian,
            Self::Portuguese => StemmerLanguage::Portuguese,
            Self::Spanish => StemmerLanguage::Spanish,
        }
    }

    /// The matching stopword list.
    pub(crate) fn stopword_list(self) -> LANGUAGE {
        match self {
            Self::Dutch => LANGUAGE::Dutch,
            Self::English => LANGUAGE::English,
            Self::French => LANGUAGE::French,
            Self::German => LANGUAGE::German,
            Self::Italian => LANGUAGE::Italian,
            Self::Portuguese => LANGUAGE::Portuguese,
            Self::Spanish => LANGUAGE::Spanish,
        }
    }
}

impl FromStr for Language {
    type Err = RankError;

    /// Parses a language name, ignoring case.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let lower = name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.name() == lower)
            .ok_or(RankError::UnsupportedLanguage(lower))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
