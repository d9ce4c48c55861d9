//! BM25+ page ranking.
//!
//! Each page is scored against the (expanded) query terms:
//!
//! ```text
//! norm_len   = page_len / avg_len
//! term_score = idf(t) * ((tf * (k1 + 1)) / (tf + k1 * (1 - b + b * norm_len)) + delta) * 1.2
//! ```
//!
//! Terms the corpus has never seen are skipped. A term present in the corpus but absent from
//! the page still contributes `idf * delta * 1.2`. Pages scoring at or below a tenth of the best
//! score are dropped.

use serde::Serialize;
use tracing::{debug, trace};
use veritas_config::Config;

use crate::{CorpusIndex, DomainWeights, IdfProvider, Normalizer, QueryExpander, RankError};

/// Fraction of the best score a page must exceed to be kept.
const RELEVANCE_FLOOR: f32 = 0.1;

/// Bonus for query terms matching index terms exactly. Every query term is an exact index term
/// after normalization, so this scales all scores uniformly.
const EXACT_MATCH_BONUS: f32 = 1.2;

/// BM25+ tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    k1: f32,
    /// Length normalization strength.
    b: f32,
    /// Lower bound added per matching term.
    delta: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            delta: 1.0,
        }
    }
}

impl Bm25Params {
    /// Validates and creates parameters.
    pub fn new(k1: f32, b: f32, delta: f32) -> Result<Self, RankError> {
        if !k1.is_finite() || k1 <= 0.0 {
            return Err(RankError::InvalidParameter {
                name: "k1",
                value: k1,
                expected: "a finite number > 0",
            });
        }
        if !(0.0..=1.0).contains(&b) {
            return Err(RankError::InvalidParameter {
                name: "b",
                value: b,
                expected: "a number between 0 and 1",
            });
        }
        if !delta.is_finite() || delta < 0.0 {
            return Err(RankError::InvalidParameter {
                name: "delta",
                value: delta,
                expected: "a finite number >= 0",
            });
        }
        Ok(Self { k1, b, delta })
    }

    /// Term-frequency saturation.
    pub fn k1(&self) -> f32 {
        self.k1
    }

    /// Length normalization strength.
    pub fn b(&self) -> f32 {
        self.b
    }

    /// BM25+ lower bound.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Score contribution of one query term occurrence.
    ///
    /// A term absent from an empty page (`tf == 0`, `norm_len == 0`, `b == 1`) has no
    /// saturation and scores `idf * delta * 1.2`.
    pub fn term_score(&self, idf: f32, tf: usize, norm_len: f32) -> f32 {
        let tf = tf as f32;
        let denominator = tf + self.k1 * (1.0 - self.b + self.b * norm_len);
        let saturation = if denominator > 0.0 {
            (tf * (self.k1 + 1.0)) / denominator
        } else {
            0.0
        };
        idf * (saturation + self.delta) * EXACT_MATCH_BONUS
    }
}

/// A page and its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedPage {
    /// Zero-based page index.
    pub page: usize,
    /// BM25+ score.
    pub score: f32,
}

/// Ranks pages of a corpus against a query.
#[derive(Clone)]
pub struct Bm25Ranker {
    /// Scoring parameters.
    params: Bm25Params,
    /// Shared text normalizer for pages and queries.
    normalizer: Normalizer,
    /// IDF boosts.
    weights: DomainWeights,
    /// Query expansion, when enabled.
    expander: Option<QueryExpander>,
}

impl Bm25Ranker {
    /// Creates a ranker with no domain boosts and no query expansion.
    pub fn new(normalizer: Normalizer, params: Bm25Params) -> Self {
        Self {
            params,
            normalizer,
            weights: DomainWeights::none(),
            expander: None,
        }
    }

    /// Builds a ranker from configuration.
    ///
    /// The domain tables are resolved against the configured language here, so a bad language
    /// name, parameter or weight is reported before any page is ranked.
    pub fn from_config(config: &Config) -> Result<Self, RankError> {
        let ranking = &config.ranking;
        let normalizer = Normalizer::from_settings(ranking)?;
        let params = Bm25Params::new(ranking.k1, ranking.b, ranking.delta)?;
        let weights = DomainWeights::new(&config.domain.weights, &normalizer)?;
        let expander = ranking
            .query_expansion
            .then(|| QueryExpander::new(&config.domain.synonyms, &normalizer));

        Ok(Self {
            params,
            normalizer,
            weights,
            expander,
        })
    }

    /// Sets the IDF boosts.
    pub fn with_domain_weights(mut self, weights: DomainWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Enables query expansion.
    pub fn with_query_expander(mut self, expander: QueryExpander) -> Self {
        self.expander = Some(expander);
        self
    }

    /// The ranker's normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// The scoring parameters.
    pub fn params(&self) -> Bm25Params {
        self.params
    }

    /// Builds a reusable index over `pages`.
    pub fn index<S: AsRef<str>>(&self, pages: &[S]) -> CorpusIndex {
        CorpusIndex::build(pages, &self.normalizer, &self.weights)
    }

    /// Normalizes and expands a query.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        let terms = self.normalizer.terms(query);
        match self.expander {
            Some(ref expander) => expander.expand(&terms),
            None => terms,
        }
    }

    /// Returns page indices, best first.
    ///
    /// When `top_k` is given and the corpus has no more than `top_k` pages, ranking is skipped
    /// and every page is returned in document order.
    pub fn rank_pages<S: AsRef<str>>(
        &self,
        pages: &[S],
        query: &str,
        top_k: Option<usize>,
    ) -> Vec<usize> {
        if pages.is_empty() {
            return Vec::new();
        }
        if let Some(k) = top_k
            && pages.len() <= k
        {
            debug!(pages = pages.len(), top_k = k, "corpus within limit, skipping ranking");
            return (0..pages.len()).collect();
        }
        self.rank(pages, query, top_k)
            .into_iter()
            .map(|r| r.page)
            .collect()
    }

    /// Scores and ranks `pages`, rebuilding the index for this call.
    pub fn rank<S: AsRef<str>>(
        &self,
        pages: &[S],
        query: &str,
        top_k: Option<usize>,
    ) -> Vec<RankedPage> {
        if pages.is_empty() {
            return Vec::new();
        }
        let index = self.index(pages);
        self.rank_index(&index, query, top_k)
    }

    /// Scores and ranks the pages of a prebuilt index.
    ///
    /// Results are sorted by descending score. Equal scores keep ascending page order, so the
    /// earlier page wins a tie (a reversed ascending argsort would prefer the later page).
    /// Pages at or below a tenth of the best score are dropped, then the list is cut to `top_k`.
    pub fn rank_index(
        &self,
        index: &CorpusIndex,
        query: &str,
        top_k: Option<usize>,
    ) -> Vec<RankedPage> {
        if index.is_empty() {
            return Vec::new();
        }
        let terms = self.query_terms(query);
        debug!(?terms, "ranking query terms");

        let mut ranked: Vec<RankedPage> = (0..index.len())
            .map(|page| {
                let score = self.score_page(index, page, &terms);
                trace!(page, score, "page score");
                RankedPage { page, score }
            })
            .collect();

        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.page.cmp(&b.page)));

        let threshold = ranked.first().map_or(0.0, |r| r.score) * RELEVANCE_FLOOR;
        ranked.retain(|r| r.score > threshold);
        if let Some(k) = top_k {
            ranked.truncate(k);
        }

        debug!(
            pages = index.len(),
            kept = ranked.len(),
            threshold,
            "ranked pages"
        );
        ranked
    }

    /// BM25+ score of one page for already normalized query terms.
    pub fn score_page(&self, index: &CorpusIndex, page: usize, terms: &[String]) -> f32 {
        let stats = index.stats();
        let avg_len = stats.avg_len();
        let norm_len = if avg_len > 0.0 {
            index.page_len(page) as f32 / avg_len
        } else {
            0.0
        };

        terms
            .iter()
            .filter_map(|term| {
                let idf = stats.idf(term)?;
                Some(
                    self.params
                        .term_score(idf, index.term_freq(page, term), norm_len),
                )
            })
            .sum()
    }
}
