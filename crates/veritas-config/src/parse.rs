//! Configuration file parsing.
//!
//! Parses individual `.veritas.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::HashMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Ranking section.
    pub ranking: Option<RawRankingSettings>,
    /// Alignment section.
    pub alignment: Option<RawAlignmentSettings>,
    /// Domain vocabulary section.
    pub domain: Option<RawDomainSettings>,
}

/// Raw ranking settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRankingSettings {
    /// Term-frequency saturation.
    pub k1: Option<f32>,
    /// Length normalization strength.
    pub b: Option<f32>,
    /// BM25+ lower bound.
    pub delta: Option<f32>,
    /// Page selection limit.
    pub top_k: Option<usize>,
    /// Whether to expand queries with synonyms.
    pub query_expansion: Option<bool>,
    /// Stopword and stemmer language.
    #[serde(alias = "stemmer")]
    pub language: Option<String>,
    /// Whether to stem tokens.
    pub stemming: Option<bool>,
}

/// Raw alignment settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAlignmentSettings {
    /// Similarity required for a verified sentence.
    #[serde(alias = "min_similarity_threshold")]
    pub primary_threshold: Option<f32>,
}

/// Raw domain tables.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawDomainSettings {
    /// When false, tables from lower-precedence layers (and the built-in ones) are dropped.
    pub inherit_defaults: Option<bool>,
    /// IDF boost factor per term.
    pub weights: Option<HashMap<String, f32>>,
    /// Related terms per query term.
    /// Each value accepts either a single string or an array of strings.
    #[serde_as(as = "Option<HashMap<_, OneOrMany<_>>>")]
    pub synonyms: Option<HashMap<String, Vec<String>>>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// This is used during discovery to stop traversal at root configs.
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
