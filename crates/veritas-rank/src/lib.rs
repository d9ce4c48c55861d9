//! Page ranking for veritas.
//!
//! Selects the pages of a document most likely to answer a question. Pages and queries are
//! normalized into stemmed unigrams and bigrams, domain vocabulary gets its IDF boosted,
//! queries are expanded with related terms, and pages are scored with BM25+.
//!
//! Ranking is stateless: [`Bm25Ranker::rank_pages`] rebuilds the term statistics on every
//! call. Build a [`CorpusIndex`] with [`Bm25Ranker::index`] to rank many queries against the
//! same pages.

mod error;
mod language;
mod normalize;
mod ranker;
mod stats;
mod stopwords;
mod weights;

pub use error::RankError;
pub use language::Language;
pub use normalize::{BIGRAM_SEPARATOR, Normalizer};
pub use ranker::{Bm25Params, Bm25Ranker, RankedPage};
pub use stats::{CorpusIndex, IdfProvider, TermStats, bm25_idf};
pub use stopwords::Stopwords;
pub use weights::{DomainWeights, QueryExpander};
