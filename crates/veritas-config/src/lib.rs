//! Configuration system for veritas.
//!
//! veritas uses TOML configuration files named `.veritas.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.veritas.toml` files found, then loading `~/.veritas.toml` as the global config with lowest
//! precedence.
//!
//! Every tunable of the ranking and alignment engines lives here: BM25+ parameters, the page
//! selection limit, the alignment threshold, and the domain tables (IDF boosts and query
//! synonyms). Nothing in the engines reads global state; callers build them from a [`Config`].

#![warn(missing_docs)]

mod defaults;
mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

pub use defaults::{default_domain_weights, default_synonyms};
pub use discovery::{
    CONFIG_FILENAME, ConfigScope, ConfigSource, discover_config_files, discover_config_sources,
    global_config_path,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawAlignmentSettings, RawConfig, RawDomainSettings, RawRankingSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{InitOptions, global_template, init_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for veritas.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.veritas.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Page ranking settings.
    pub ranking: RankingSettings,
    /// Answer alignment settings.
    pub alignment: AlignmentSettings,
    /// Domain vocabulary tables.
    pub domain: DomainSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.veritas.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.veritas.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.veritas.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// Hard range errors are rejected while loading; this only reports settings that are
    /// legal but probably unintended.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// Tables are sorted so the output is stable across runs.
    pub fn settings_to_toml(&self) -> Result<String, toml::ser::Error> {
        let serializable = SerializableSettings {
            ranking: self.ranking.clone(),
            alignment: self.alignment.clone(),
            domain: SerializableDomainSettings::from(&self.domain),
        };
        toml::to_string_pretty(&serializable)
    }
}

/// Page ranking settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RankingSettings {
    /// Term-frequency saturation.
    pub k1: f32,
    /// Length normalization strength (0.0-1.0).
    pub b: f32,
    /// BM25+ lower bound added to every matching term.
    pub delta: f32,
    /// Maximum pages kept after ranking. Documents with at most this many pages skip ranking.
    pub top_k: usize,
    /// Whether query terms are expanded with the synonym table.
    pub query_expansion: bool,
    /// Language used for stopwords and stemming.
    pub language: String,
    /// Whether tokens are stemmed.
    pub stemming: bool,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            k1: 1.5,
            b: 0.75,
            delta: 1.0,
            top_k: 20,
            query_expansion: true,
            language: String::from("french"),
            stemming: true,
        }
    }
}

/// Answer alignment settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AlignmentSettings {
    /// Minimum similarity for a generated sentence to count as verified (0.0-1.0).
    pub primary_threshold: f32,
}

impl Default for AlignmentSettings {
    fn default() -> Self {
        Self {
            primary_threshold: 0.70,
        }
    }
}

/// Domain vocabulary used to bias ranking.
#[derive(Debug, Clone)]
pub struct DomainSettings {
    /// IDF boost factor per term (>= 1.0).
    pub weights: HashMap<String, f32>,
    /// Related terms appended to matching query terms.
    pub synonyms: HashMap<String, Vec<String>>,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            weights: default_domain_weights(),
            synonyms: default_synonyms(),
        }
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Ranking settings.
    ranking: RankingSettings,
    /// Alignment settings.
    alignment: AlignmentSettings,
    /// Domain tables.
    domain: SerializableDomainSettings,
}

/// Domain settings with sorted tables for deterministic TOML output.
#[derive(Serialize)]
struct SerializableDomainSettings {
    /// IDF boost factors (sorted).
    weights: BTreeMap<String, f32>,
    /// Synonym table (sorted).
    synonyms: BTreeMap<String, Vec<String>>,
}

impl From<&DomainSettings> for SerializableDomainSettings {
    fn from(domain: &DomainSettings) -> Self {
        Self {
            weights: domain
                .weights
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            synonyms: domain
                .synonyms
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}
