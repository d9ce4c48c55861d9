//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules and range checks.

use std::path::{Path, PathBuf};

use crate::{
    AlignmentSettings, Config, ConfigError, DomainSettings, RankingSettings,
    parse::{RawAlignmentSettings, RawConfig, RawDomainSettings, RawRankingSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Domain tables: merged key-wise on top of the built-in tables, first definition for each
///   key wins; `inherit_defaults = false` discards everything of lower precedence
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let ranking = merge_ranking_settings(configs)?;
    let alignment = merge_alignment_settings(configs)?;
    let domain = merge_domain_settings(configs)?;
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(Path::to_path_buf);

    Ok(Config {
        ranking,
        alignment,
        domain,
        config_root,
    })
}

/// Merges ranking settings, taking first defined value for each field.
fn merge_ranking_settings(configs: &[ParsedConfig]) -> Result<RankingSettings, ConfigError> {
    let mut result = RankingSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref ranking) = parsed.config.ranking {
            apply_raw_ranking(&mut result, ranking, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies raw ranking settings to result, overwriting any present values.
fn apply_raw_ranking(
    result: &mut RankingSettings,
    raw: &RawRankingSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(v) = raw.k1 {
        result.k1 = check_positive(v, "ranking.k1", path)?;
    }
    if let Some(v) = raw.b {
        result.b = check_unit_interval(v, "ranking.b", path)?;
    }
    if let Some(v) = raw.delta {
        result.delta = check_non_negative(v, "ranking.delta", path)?;
    }
    if let Some(v) = raw.top_k {
        if v == 0 {
            return Err(ConfigError::invalid(
                path,
                "ranking.top_k",
                "must be at least 1",
            ));
        }
        result.top_k = v;
    }
    if let Some(v) = raw.query_expansion {
        result.query_expansion = v;
    }
    if let Some(ref v) = raw.language {
        result.language = v.to_lowercase();
    }
    if let Some(v) = raw.stemming {
        result.stemming = v;
    }
    Ok(())
}

/// Merges alignment settings.
fn merge_alignment_settings(configs: &[ParsedConfig]) -> Result<AlignmentSettings, ConfigError> {
    let mut result = AlignmentSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref alignment) = parsed.config.alignment {
            apply_raw_alignment(&mut result, alignment, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies raw alignment settings to result.
fn apply_raw_alignment(
    result: &mut AlignmentSettings,
    raw: &RawAlignmentSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(v) = raw.primary_threshold {
        result.primary_threshold = check_unit_interval(v, "alignment.primary_threshold", path)?;
    }
    Ok(())
}

/// Merges the domain tables.
fn merge_domain_settings(configs: &[ParsedConfig]) -> Result<DomainSettings, ConfigError> {
    let mut result = DomainSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref domain) = parsed.config.domain {
            apply_raw_domain(&mut result, domain, &parsed.path)?;
        }
    }

    Ok(result)
}

/// Applies a raw domain section, clearing inherited tables first when requested.
fn apply_raw_domain(
    result: &mut DomainSettings,
    raw: &RawDomainSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if raw.inherit_defaults == Some(false) {
        result.weights.clear();
        result.synonyms.clear();
    }

    if let Some(ref weights) = raw.weights {
        for (term, weight) in weights {
            if !weight.is_finite() || *weight < 1.0 {
                return Err(ConfigError::invalid(
                    path,
                    format!("domain.weights.{term}"),
                    format!("boost factor must be a finite number >= 1.0, got {weight}"),
                ));
            }
            result.weights.insert(term.to_lowercase(), *weight);
        }
    }

    if let Some(ref synonyms) = raw.synonyms {
        for (term, related) in synonyms {
            let related = related.iter().map(|r| r.to_lowercase()).collect();
            result.synonyms.insert(term.to_lowercase(), related);
        }
    }

    Ok(())
}

/// Rejects zero, negative and non-finite values.
fn check_positive(value: f32, key: &str, path: &Path) -> Result<f32, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            path,
            key,
            format!("expected a finite number > 0.0, got {value}"),
        ))
    }
}

/// Rejects negative and non-finite values.
fn check_non_negative(value: f32, key: &str, path: &Path) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            path,
            key,
            format!("expected a finite number >= 0.0, got {value}"),
        ))
    }
}

/// Rejects values outside `[0, 1]`.
fn check_unit_interval(value: f32, key: &str, path: &Path) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::invalid(
            path,
            key,
            format!("expected a number between 0.0 and 1.0, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ConfigTree;

    #[test]
    fn test_merge_empty_configs() {
        let result = merge_configs(&[]).unwrap();
        assert_eq!(result.ranking.top_k, 20);
        assert!(result.config_root.is_none());
    }

    #[test]
    fn test_merge_single_config() {
        let tree = ConfigTree::new();
        let config = tree.parsed(
            "",
            r#"
[ranking]
top_k = 5
k1 = 1.2

[alignment]
primary_threshold = 0.8
"#,
        );

        let result = merge_configs(&[config]).unwrap();
        assert_eq!(result.ranking.top_k, 5);
        assert!((result.ranking.k1 - 1.2).abs() < f32::EPSILON);
        assert!((result.ranking.b - 0.75).abs() < f32::EPSILON);
        assert!((result.alignment.primary_threshold - 0.8).abs() < f32::EPSILON);
        assert_eq!(result.config_root.as_deref(), Some(tree.path()));
    }

    #[test]
    fn test_merge_scalar_override() {
        let tree = ConfigTree::new();

        let high_prec = tree.parsed("project", "[ranking]\ntop_k = 3\n");
        let low_prec = tree.parsed("", "[ranking]\ntop_k = 50\nlanguage = \"English\"\n");

        let result = merge_configs(&[high_prec, low_prec]).unwrap();
        assert_eq!(result.ranking.top_k, 3);
        // Value only set in the lower layer survives, lowercased
        assert_eq!(result.ranking.language, "english");
        assert_eq!(
            result.config_root.as_deref(),
            Some(tree.path().join("project").as_path())
        );
    }

    #[test]
    fn test_merge_domain_tables_extend_defaults() {
        let tree = ConfigTree::new();
        let config = tree.parsed(
            "",
            r#"
[domain.weights]
"Préavis" = 2.0
"durée" = 4.0

[domain.synonyms]
"préavis" = "notification"
"#,
        );

        let result = merge_configs(&[config]).unwrap();
        assert_eq!(result.domain.weights.get("préavis"), Some(&2.0));
        assert_eq!(result.domain.weights.get("durée"), Some(&4.0));
        assert!(result.domain.weights.contains_key("conservation"));
        assert_eq!(
            result.domain.synonyms.get("préavis").unwrap(),
            &vec!["notification"]
        );
        assert!(result.domain.synonyms.contains_key("rgpd"));
    }

    #[test]
    fn test_merge_domain_without_defaults() {
        let tree = ConfigTree::new();
        let high_prec = tree.parsed(
            "project",
            r#"
[domain]
inherit_defaults = false

[domain.weights]
bail = 2.0
"#,
        );
        let low_prec = tree.parsed("", "[domain.weights]\nloyer = 3.0\n");

        let result = merge_configs(&[high_prec, low_prec]).unwrap();
        assert_eq!(result.domain.weights.len(), 1);
        assert_eq!(result.domain.weights.get("bail"), Some(&2.0));
        assert!(result.domain.synonyms.is_empty());
    }

    #[test]
    fn test_merge_domain_higher_layer_wins_per_key() {
        let tree = ConfigTree::new();
        let high_prec = tree.parsed("a", "[domain.weights]\nloyer = 1.5\n");
        let low_prec = tree.parsed("", "[domain.weights]\nloyer = 3.0\nbail = 2.0\n");

        let result = merge_configs(&[high_prec, low_prec]).unwrap();
        assert_eq!(result.domain.weights.get("loyer"), Some(&1.5));
        assert_eq!(result.domain.weights.get("bail"), Some(&2.0));
    }

    #[test]
    fn test_merge_rejects_out_of_range_values() {
        let tree = ConfigTree::new();
        let cases = [
            ("[ranking]\nb = 1.5\n", "ranking.b"),
            ("[ranking]\nk1 = -0.1\n", "ranking.k1"),
            ("[ranking]\nk1 = 0.0\n", "ranking.k1"),
            ("[ranking]\ndelta = -1.0\n", "ranking.delta"),
            ("[ranking]\ntop_k = 0\n", "ranking.top_k"),
            (
                "[alignment]\nprimary_threshold = 1.2\n",
                "alignment.primary_threshold",
            ),
            ("[domain.weights]\nloyer = 0.5\n", "domain.weights.loyer"),
        ];

        for (toml, expected_key) in cases {
            let config = tree.parsed("", toml);
            match merge_configs(&[config]) {
                Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, expected_key),
                other => panic!("expected InvalidValue for {expected_key}, got {other:?}"),
            }
        }
    }
}
