//! Implementation of `veritas status`.

use std::process::ExitCode;

use veritas_config::{ConfigWarning, discover_config_sources};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Shows configuration files, the resolved engine settings and validation warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let sources = discover_config_sources(&ctx.cwd);

    println!("{}", subheader("Config files:"));
    if sources.is_empty() {
        println!("   {}", dim("(none, using built-in defaults)"));
        println!(
            "   Run {} to create a configuration file.",
            subheader("veritas init")
        );
    }
    for source in &sources {
        let label = if source.root {
            format!("({}, root)", source.scope.label())
        } else {
            format!("({})", source.scope.label())
        };
        println!("   {} {}", source.path.display(), dim(&label));
    }
    println!();

    let config = &ctx.config;
    let ranking = &config.ranking;
    println!("{}", subheader("Ranking:"));
    println!(
        "   BM25+ k1={} b={} delta={}, top {} pages",
        ranking.k1, ranking.b, ranking.delta, ranking.top_k
    );
    println!(
        "   language {}, stemming {}, query expansion {}",
        ranking.language,
        on_off(ranking.stemming),
        on_off(ranking.query_expansion)
    );
    println!(
        "   {} domain weights, {} synonym entries",
        config.domain.weights.len(),
        config.domain.synonyms.len()
    );
    println!();

    println!("{}", subheader("Alignment:"));
    println!(
        "   primary threshold {}",
        config.alignment.primary_threshold
    );
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Renders a flag.
fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::EmptySynonymList { .. } => {
                "Hint: give each [domain.synonyms] entry at least one related term"
            }
            ConfigWarning::NoDomainWeights => {
                "Hint: add [domain.weights] entries or set domain.inherit_defaults = true"
            }
            ConfigWarning::LowPrimaryThreshold { .. } => {
                "Hint: raise alignment.primary_threshold to at least 0.4"
            }
            ConfigWarning::ExpansionWithoutSynonyms => {
                "Hint: add [domain.synonyms] entries or set ranking.query_expansion = false"
            }
        })
        .collect();
    hints.dedup();

    for hint in hints {
        println!("{}", dim(hint));
    }
}
