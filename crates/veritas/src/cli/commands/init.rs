//! Implementation of `veritas init`.

use std::{fs, path::PathBuf, process::ExitCode};

use veritas_config::{
    CONFIG_FILENAME, ConfigScope, InitOptions, default_domain_weights, default_synonyms,
    global_config_path, init_template,
};

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{dim, subheader, success},
};

/// Writes a `.veritas.toml` for the project or the home directory.
///
/// The file is the commented template, plus the language and domain tables when asked for.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let scope = target_scope(ctx, cmd);
    let Some(config_path) = target_path(ctx, scope) else {
        eprintln!("error: could not determine home directory");
        return ExitCode::FAILURE;
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let options = InitOptions {
        language: cmd.language.map(|language| language.to_string()),
        domain_tables: cmd.domain_tables,
    };
    let contents = match init_template(scope, &options) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("error: failed to render configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = fs::write(&config_path, &contents) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!(
        "{} {} {}",
        success("Created"),
        config_path.display(),
        dim(&format!("({})", scope.label()))
    );
    println!();
    println!("{}", subheader("Active settings:"));
    print_active_settings(&options);
    println!();
    println!(
        "Edit the file to tune ranking and alignment, then run {} to check it.",
        subheader("veritas status")
    );

    ExitCode::SUCCESS
}

/// Global when asked for, or when run from the home directory itself.
fn target_scope(ctx: &CommandContext, cmd: &InitCommand) -> ConfigScope {
    let in_home = global_config_path()
        .as_deref()
        .and_then(|path| path.parent())
        .is_some_and(|home| home == ctx.cwd);
    if cmd.global || in_home {
        ConfigScope::Global
    } else {
        ConfigScope::Project
    }
}

/// Path of the file to write for `scope`.
fn target_path(ctx: &CommandContext, scope: ConfigScope) -> Option<PathBuf> {
    match scope {
        ConfigScope::Project => Some(ctx.cwd.join(CONFIG_FILENAME)),
        ConfigScope::Global => global_config_path(),
    }
}

/// Lists what the written file changes from the built-in defaults.
fn print_active_settings(options: &InitOptions) {
    if options.language.is_none() && !options.domain_tables {
        println!(
            "   {}",
            dim("none, every setting is commented out and built-in defaults apply")
        );
        return;
    }
    if let Some(ref language) = options.language {
        println!("   ranking.language = {language}");
    }
    if options.domain_tables {
        println!(
            "   domain tables: {} weights, {} synonym entries {}",
            default_domain_weights().len(),
            default_synonyms().len(),
            dim("(built-in tables no longer inherited)")
        );
    }
}
