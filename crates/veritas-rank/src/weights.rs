//! Domain vocabulary: IDF boosts and query synonyms.
//!
//! Both tables are keyed by plain words in configuration but the index holds normalized
//! terms. Each key is therefore registered twice: verbatim (lowercased) and in normalized
//! form, where a multi-word key becomes a bigram (`"durée de conservation"` -> `dur_conserv`).

use std::collections::HashMap;

use tracing::debug;

use crate::{BIGRAM_SEPARATOR, Normalizer, RankError};

/// Registers `key` under its verbatim and normalized forms.
fn lookup_keys(key: &str, normalizer: &Normalizer) -> Vec<String> {
    let verbatim = key.trim().to_lowercase();
    let normalized = normalizer
        .tokens(key)
        .join(&BIGRAM_SEPARATOR.to_string());
    let mut keys = vec![verbatim];
    if !normalized.is_empty() && normalized != keys[0] {
        keys.push(normalized);
    }
    keys
}

/// Multiplicative IDF boosts for domain vocabulary.
#[derive(Debug, Clone, Default)]
pub struct DomainWeights {
    /// Boost per lookup key.
    weights: HashMap<String, f32>,
}

impl DomainWeights {
    /// Resolves a weight table against a normalizer.
    ///
    /// Fails when any weight is below 1.0 or not finite. When two keys normalize to the same
    /// term the larger boost wins.
    pub fn new(table: &HashMap<String, f32>, normalizer: &Normalizer) -> Result<Self, RankError> {
        let mut weights: HashMap<String, f32> = HashMap::new();
        for (term, &weight) in table {
            if !weight.is_finite() || weight < 1.0 {
                return Err(RankError::InvalidDomainWeight {
                    term: term.clone(),
                    weight,
                });
            }
            for key in lookup_keys(term, normalizer) {
                let entry = weights.entry(key).or_insert(weight);
                *entry = entry.max(weight);
            }
        }
        debug!(
            terms = table.len(),
            keys = weights.len(),
            "resolved domain weights"
        );
        Ok(Self { weights })
    }

    /// A table that boosts nothing.
    pub fn none() -> Self {
        Self::default()
    }

    /// Boost for `term`, or 1.0 when it is not domain vocabulary.
    pub fn boost(&self, term: &str) -> f32 {
        self.weights.get(term).copied().unwrap_or(1.0)
    }

    /// Whether `term` is domain vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    /// Number of lookup keys.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns true if nothing is boosted.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Appends related terms to a normalized query.
#[derive(Debug, Clone, Default)]
pub struct QueryExpander {
    /// Normalized expansion terms per lookup key.
    synonyms: HashMap<String, Vec<String>>,
}

impl QueryExpander {
    /// Resolves a synonym table against a normalizer.
    ///
    /// Expansion terms are normalized the same way as page text, so a multi-word expansion
    /// contributes its unigrams and bigrams.
    pub fn new(table: &HashMap<String, Vec<String>>, normalizer: &Normalizer) -> Self {
        let mut synonyms: HashMap<String, Vec<String>> = HashMap::new();
        let mut keys: Vec<&String> = table.keys().collect();
        // Stable order for keys sharing a normalized form
        keys.sort();
        for term in keys {
            let expansions: Vec<String> = table[term]
                .iter()
                .flat_map(|related| normalizer.terms(related))
                .collect();
            if expansions.is_empty() {
                continue;
            }
            for key in lookup_keys(term, normalizer) {
                synonyms
                    .entry(key)
                    .or_default()
                    .extend(expansions.iter().cloned());
            }
        }
        Self { synonyms }
    }

    /// Returns `terms` followed by the expansions of every matching term.
    ///
    /// A term occurring twice is expanded twice. Repeated terms count once per occurrence when
    /// scoring, which is what makes expansion a boost as well as a recall aid.
    pub fn expand(&self, terms: &[String]) -> Vec<String> {
        let mut expanded = terms.to_vec();
        for term in terms {
            if let Some(related) = self.synonyms.get(term) {
                expanded.extend(related.iter().cloned());
            }
        }
        expanded
    }

    /// Expansion terms registered for a lookup key.
    pub fn related(&self, term: &str) -> Option<&[String]> {
        self.synonyms.get(term).map(Vec::as_slice)
    }

    /// Returns true if no term expands.
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}
