//! Shared context for running CLI commands.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use veritas_config::Config;

use crate::{Document, Pipeline};

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Resolves a command-line path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }

    /// Loads a text document or exits with an error.
    pub fn document(&self, path: &Path) -> Result<Document, ExitCode> {
        Document::load(&self.resolve(path)).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })
    }

    /// Builds the pipeline for a document or exits with an error.
    pub fn pipeline(&self, document: Document) -> Result<Pipeline, ExitCode> {
        Pipeline::from_config(document, &self.config).map_err(|e| {
            eprintln!("error: invalid configuration: {e}");
            ExitCode::FAILURE
        })
    }

    /// Reads a file argument to a string or exits with an error.
    pub fn read_file(&self, path: &Path) -> Result<String, ExitCode> {
        let path = self.resolve(path);
        fs::read_to_string(&path).map_err(|e| {
            eprintln!("error: failed to read {}: {e}", path.display());
            ExitCode::FAILURE
        })
    }

    /// Expands a text argument: `@FILE` reads the file, anything else is literal.
    pub fn text_arg(&self, value: &str) -> Result<String, ExitCode> {
        match value.strip_prefix('@') {
            Some(path) => self.read_file(Path::new(path)),
            None => Ok(value.to_string()),
        }
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
