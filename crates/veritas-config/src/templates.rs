//! Configuration templates for `veritas init`.
//!
//! Templates are stored as valid TOML files and returned as commented-out
//! example configurations. Settings chosen at init time are appended below
//! them as active TOML.

use std::collections::BTreeMap;

use serde::Serialize;
use toml::ser;

use crate::{ConfigScope, default_domain_weights, default_synonyms};

/// Default local configuration template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global configuration template (valid TOML).
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the local configuration template as a commented-out example.
pub fn local_template() -> String {
    comment_template(LOCAL_TEMPLATE)
}

/// Returns the global configuration template as a commented-out example.
pub fn global_template() -> String {
    comment_template(GLOBAL_TEMPLATE)
}

/// Settings chosen when running `veritas init`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Stopword and stemmer language to set. Left commented out when `None`.
    pub language: Option<String>,
    /// Write the built-in domain tables as active, editable tables.
    pub domain_tables: bool,
}

/// Settings written uncommented below the template.
#[derive(Serialize)]
struct ActiveSettings {
    /// Ranking overrides.
    #[serde(skip_serializing_if = "Option::is_none")]
    ranking: Option<ActiveRanking>,
    /// Domain tables.
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<ActiveDomain>,
}

/// Ranking settings chosen at init.
#[derive(Serialize)]
struct ActiveRanking {
    /// Lowercased language name.
    language: String,
}

/// A full copy of the built-in domain tables.
#[derive(Serialize)]
struct ActiveDomain {
    /// Always false: the copy replaces the built-in tables.
    inherit_defaults: bool,
    /// IDF boosts (sorted).
    weights: BTreeMap<String, f32>,
    /// Synonyms (sorted).
    synonyms: BTreeMap<String, Vec<String>>,
}

impl ActiveDomain {
    /// Copies the built-in tables.
    fn builtin() -> Self {
        Self {
            inherit_defaults: false,
            weights: default_domain_weights().into_iter().collect(),
            synonyms: default_synonyms().into_iter().collect(),
        }
    }
}

/// Renders the file `veritas init` writes for `scope`.
///
/// Without options this is the commented template. A chosen language and the domain
/// tables are appended as active settings.
pub fn init_template(
    scope: ConfigScope,
    options: &InitOptions,
) -> Result<String, ser::Error> {
    let mut template = match scope {
        ConfigScope::Project => local_template(),
        ConfigScope::Global => global_template(),
    };

    let active = ActiveSettings {
        ranking: options.language.as_ref().map(|language| ActiveRanking {
            language: language.trim().to_lowercase(),
        }),
        domain: options.domain_tables.then(ActiveDomain::builtin),
    };
    if active.ranking.is_none() && active.domain.is_none() {
        return Ok(template);
    }

    template.push_str("\n# Settings chosen at init.\n\n");
    template.push_str(&toml::to_string_pretty(&active)?);
    Ok(template)
}

/// Prefixes every non-empty, non-comment line with "# ".
fn comment_template(template: &str) -> String {
    let mut result = String::with_capacity(template.len() + template.lines().count() * 2);
    for line in template.lines() {
        if !line.is_empty() && !line.starts_with('#') {
            result.push_str("# ");
        }
        result.push_str(line);
        result.push('\n');
    }
    result
}
