//! Text normalization into ranking terms.
//!
//! Text runs through one tantivy analyzer:
//! 1. `RegexTokenizer` (`\w+`) - splits on everything that is not a word character
//! 2. `LowerCaser` - lowercases tokens
//! 3. `StopWordFilter` - removes the language's stopwords
//! 4. `TermShapeFilter` - removes single characters, numbers and underscore runs
//! 5. `Stemmer` - applies the language's Snowball stemmer, when stemming is enabled
//!
//! [`Normalizer::terms`] then appends the bigrams of adjacent tokens, joined with `_`.

use std::sync::LazyLock;

use tantivy::tokenizer::{
    LowerCaser, RawTokenizer, RegexTokenizer, Stemmer, StopWordFilter, TextAnalyzer, Token,
    TokenFilter, TokenStream, Tokenizer,
};
use veritas_config::RankingSettings;

use crate::{Language, RankError, Stopwords};

/// Separator between the two halves of a bigram term.
pub const BIGRAM_SEPARATOR: char = '_';

/// Splits text into runs of word characters.
static WORD_TOKENIZER: LazyLock<RegexTokenizer> =
    LazyLock::new(|| RegexTokenizer::new(r"\w+").expect("invalid WORD_TOKENIZER"));

/// Turns raw text into the terms the ranker indexes and queries with.
#[derive(Clone)]
pub struct Normalizer {
    /// Language used for stopwords and stemming.
    language: Language,
    /// Whether tokens are stemmed.
    stemming: bool,
    /// Full token analyzer.
    analyzer: TextAnalyzer,
    /// Lowercases and stems a single word.
    word_stemmer: TextAnalyzer,
}

impl Normalizer {
    /// Creates a normalizer for a language.
    pub fn new(language: Language, stemming: bool) -> Self {
        let stopwords = Stopwords::for_language(language);
        let builder = TextAnalyzer::builder(WORD_TOKENIZER.clone())
            .filter(LowerCaser)
            .filter(StopWordFilter::remove(stopwords.into_words()))
            .filter(TermShapeFilter);
        let analyzer = if stemming {
            builder.filter(Stemmer::new(language.stemmer())).build()
        } else {
            builder.build()
        };

        let word_builder = TextAnalyzer::builder(RawTokenizer::default()).filter(LowerCaser);
        let word_stemmer = if stemming {
            word_builder
                .filter(Stemmer::new(language.stemmer()))
                .build()
        } else {
            word_builder.build()
        };

        Self {
            language,
            stemming,
            analyzer,
            word_stemmer,
        }
    }

    /// Creates a normalizer from ranking settings.
    pub fn from_settings(settings: &RankingSettings) -> Result<Self, RankError> {
        let language: Language = settings.language.parse()?;
        Ok(Self::new(language, settings.stemming))
    }

    /// The normalizer's language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Whether tokens are stemmed.
    pub fn is_stemming(&self) -> bool {
        self.stemming
    }

    /// Returns unigrams followed by bigrams of adjacent unigrams.
    pub fn terms(&self, text: &str) -> Vec<String> {
        let tokens = self.tokens(text);
        let bigrams: Vec<String> = tokens
            .windows(2)
            .map(|pair| format!("{}{BIGRAM_SEPARATOR}{}", pair[0], pair[1]))
            .collect();
        let mut terms = tokens;
        terms.extend(bigrams);
        terms
    }

    /// Returns the filtered, stemmed unigrams of `text` in order.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        collect_tokens(&self.analyzer, text)
    }

    /// Stems a single word, lowercased. Returns it only lowercased when stemming is disabled.
    pub fn stem(&self, word: &str) -> String {
        collect_tokens(&self.word_stemmer, word)
            .into_iter()
            .next()
            .unwrap_or_default()
    }
}

/// Runs `text` through `analyzer` and collects the token texts.
fn collect_tokens(analyzer: &TextAnalyzer, text: &str) -> Vec<String> {
    // token_stream needs exclusive access; the analyzer is cheap to clone
    let mut analyzer = analyzer.clone();
    let mut stream = analyzer.token_stream(text);
    let mut out = Vec::new();
    while let Some(token) = stream.next() {
        out.push(token.text.clone());
    }
    out
}

/// Whether a lowercased token can be a ranking term.
fn is_term_shaped(text: &str) -> bool {
    text.chars().nth(1).is_some()
        && !text.chars().all(char::is_numeric)
        && !text.chars().all(|c| c.is_ascii_punctuation())
}

/// Token filter removing single characters, numbers and punctuation-only tokens.
#[derive(Clone, Copy)]
struct TermShapeFilter;

impl TokenFilter for TermShapeFilter {
    type Tokenizer<T: Tokenizer> = TermShapeWrapper<T>;

    fn transform<T: Tokenizer>(self, tokenizer: T) -> TermShapeWrapper<T> {
        TermShapeWrapper { inner: tokenizer }
    }
}

/// Tokenizer wrapped by [`TermShapeFilter`].
#[derive(Clone)]
struct TermShapeWrapper<T> {
    /// Upstream tokenizer.
    inner: T,
}

impl<T: Tokenizer> Tokenizer for TermShapeWrapper<T> {
    type TokenStream<'a> = TermShapeStream<T::TokenStream<'a>>;

    fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
        TermShapeStream {
            tail: self.inner.token_stream(text),
        }
    }
}

/// Token stream produced by [`TermShapeWrapper`].
struct TermShapeStream<T> {
    /// Upstream token stream.
    tail: T,
}

impl<T: TokenStream> TokenStream for TermShapeStream<T> {
    fn advance(&mut self) -> bool {
        while self.tail.advance() {
            if is_term_shaped(&self.tail.token().text) {
                return true;
            }
        }
        false
    }

    fn token(&self) -> &Token {
        self.tail.token()
    }

    fn token_mut(&mut self) -> &mut Token {
        self.tail.token_mut()
    }
}
