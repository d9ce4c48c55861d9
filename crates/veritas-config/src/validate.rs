//! Configuration validation.
//!
//! Reports settings that load fine but are probably not what the user meant.

use std::fmt;

use crate::Config;

/// Similarity floor for near matches in the alignment engine.
const NEAR_MATCH_FLOOR: f32 = 0.4;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// A synonym entry expands to nothing.
    EmptySynonymList {
        /// Term with no related terms.
        term: String,
    },
    /// The domain weight table is empty, so no term is boosted.
    NoDomainWeights,
    /// The primary alignment threshold is unusually permissive.
    LowPrimaryThreshold {
        /// Configured threshold.
        threshold: f32,
    },
    /// Query expansion is enabled but there is nothing to expand with.
    ExpansionWithoutSynonyms,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySynonymList { term } => {
                write!(f, "synonym entry '{term}' has no related terms")
            }
            Self::NoDomainWeights => {
                write!(f, "no domain weights are defined; all terms rank equally")
            }
            Self::LowPrimaryThreshold { threshold } => {
                write!(
                    f,
                    "alignment.primary_threshold = {threshold} is below the near-match floor \
                     ({NEAR_MATCH_FLOOR}); every near match will be reported as verified"
                )
            }
            Self::ExpansionWithoutSynonyms => {
                write!(f, "query expansion is enabled but the synonym table is empty")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
///
/// This checks for:
/// - Synonym entries with no related terms
/// - An empty domain weight table
/// - A primary alignment threshold below the 0.4 near-match floor
/// - Query expansion enabled with no synonyms
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    let mut empty: Vec<&String> = config
        .domain
        .synonyms
        .iter()
        .filter(|(_, related)| related.is_empty())
        .map(|(term, _)| term)
        .collect();
    empty.sort();
    warnings.extend(
        empty
            .into_iter()
            .map(|term| ConfigWarning::EmptySynonymList { term: term.clone() }),
    );

    if config.domain.weights.is_empty() {
        warnings.push(ConfigWarning::NoDomainWeights);
    }

    if config.alignment.primary_threshold < NEAR_MATCH_FLOOR {
        warnings.push(ConfigWarning::LowPrimaryThreshold {
            threshold: config.alignment.primary_threshold,
        });
    }

    if config.ranking.query_expansion && config.domain.synonyms.is_empty() {
        warnings.push(ConfigWarning::ExpansionWithoutSynonyms);
    }

    warnings
}
