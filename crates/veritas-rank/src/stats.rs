//! Term statistics over a corpus of pages.

use std::collections::HashMap;

use tracing::debug;

use crate::{DomainWeights, Normalizer};

/// Source of IDF values for terms.
///
/// Lets the scorer work against a freshly built corpus index or any other table of IDF values.
pub trait IdfProvider {
    /// Returns the IDF value for a term, or `None` if no page contains it.
    ///
    /// Terms without an IDF contribute nothing to a page score.
    fn idf(&self, term: &str) -> Option<f32>;
}

/// Boosted BM25+ inverse document frequency.
///
/// `ln((N - df + 0.5) / (df + 0.5) + 1)` stays positive even for terms on every page.
pub fn bm25_idf(num_pages: usize, doc_freq: usize, boost: f32) -> f32 {
    let n = num_pages as f32;
    let df = doc_freq as f32;
    ((n - df + 0.5) / (df + 0.5) + 1.0).ln() * boost
}

/// Document frequencies, IDF table and average length for one corpus.
#[derive(Debug, Clone, Default)]
pub struct TermStats {
    /// Pages containing each term at least once.
    doc_freq: HashMap<String, usize>,
    /// Boosted IDF per term.
    idf: HashMap<String, f32>,
    /// Mean page length in terms.
    avg_len: f32,
    /// Number of pages the statistics cover.
    num_pages: usize,
}

impl TermStats {
    /// Computes statistics from per-page term lists.
    pub fn from_page_terms<T: AsRef<[String]>>(pages: &[T], weights: &DomainWeights) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut total_len = 0usize;
        for terms in pages {
            let terms = terms.as_ref();
            total_len += terms.len();
            let mut distinct: Vec<&String> = terms.iter().collect();
            distinct.sort_unstable();
            distinct.dedup();
            for term in distinct {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
        }

        let num_pages = pages.len();
        let idf = doc_freq
            .iter()
            .map(|(term, &df)| (term.clone(), bm25_idf(num_pages, df, weights.boost(term))))
            .collect();

        Self {
            doc_freq,
            idf,
            avg_len: total_len as f32 / num_pages.max(1) as f32,
            num_pages,
        }
    }

    /// Number of pages containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Mean page length in terms.
    pub fn avg_len(&self) -> f32 {
        self.avg_len
    }

    /// Number of pages covered.
    pub fn num_pages(&self) -> usize {
        self.num_pages
    }

    /// Number of distinct terms.
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }
}

impl IdfProvider for TermStats {
    fn idf(&self, term: &str) -> Option<f32> {
        self.idf.get(term).copied()
    }
}

/// Term counts for one page.
#[derive(Debug, Clone, Default)]
struct PageTerms {
    /// Occurrences per term.
    freqs: HashMap<String, usize>,
    /// Total number of terms, bigrams included.
    len: usize,
}

/// A tokenized corpus with its statistics.
///
/// Built once and ranked against many times. Nothing is cached implicitly: rebuild the index
/// when the pages change.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    /// Per-page term counts, in page order.
    pages: Vec<PageTerms>,
    /// Corpus statistics.
    stats: TermStats,
}

impl CorpusIndex {
    /// Normalizes every page and computes corpus statistics.
    pub fn build<S: AsRef<str>>(
        pages: &[S],
        normalizer: &Normalizer,
        weights: &DomainWeights,
    ) -> Self {
        let page_terms: Vec<Vec<String>> =
            pages.iter().map(|p| normalizer.terms(p.as_ref())).collect();
        let stats = TermStats::from_page_terms(&page_terms, weights);

        let pages = page_terms
            .into_iter()
            .map(|terms| {
                let len = terms.len();
                let mut freqs: HashMap<String, usize> = HashMap::new();
                for term in terms {
                    *freqs.entry(term).or_insert(0) += 1;
                }
                PageTerms { freqs, len }
            })
            .collect();

        debug!(
            pages = stats.num_pages(),
            vocabulary = stats.vocabulary_len(),
            avg_len = stats.avg_len(),
            "built corpus index"
        );
        Self { pages, stats }
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true for an empty corpus.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Corpus statistics.
    pub fn stats(&self) -> &TermStats {
        &self.stats
    }

    /// Occurrences of `term` on `page`; 0 for unknown pages.
    pub fn term_freq(&self, page: usize, term: &str) -> usize {
        self.pages
            .get(page)
            .and_then(|p| p.freqs.get(term))
            .copied()
            .unwrap_or(0)
    }

    /// Length of `page` in terms; 0 for unknown pages.
    pub fn page_len(&self, page: usize) -> usize {
        self.pages.get(page).map_or(0, |p| p.len)
    }
}
