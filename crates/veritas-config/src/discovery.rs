//! Locating the `.veritas.toml` files that apply to a working directory.
//!
//! Project files are found on the way from the working directory to the filesystem root. The
//! home directory's file comes last unless a `root = true` file ends the search first.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".veritas.toml";

/// Where a configuration file applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// A file in the working directory or one of its parents.
    Project,
    /// The file in the home directory.
    Global,
}

impl ConfigScope {
    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Global => "global",
        }
    }
}

/// A configuration file that applies to a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    /// Path of the file.
    pub path: PathBuf,
    /// Where the file applies.
    pub scope: ConfigScope,
    /// Whether the file sets `root = true`.
    pub root: bool,
}

/// Finds the configuration files for `cwd`, highest precedence first.
pub fn discover_config_sources(cwd: &Path) -> Vec<ConfigSource> {
    let home = BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    sources_for(cwd, home.as_deref())
}

/// Paths of [`discover_config_sources`], highest precedence first.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    discover_config_sources(cwd)
        .into_iter()
        .map(|source| source.path)
        .collect()
}

/// Returns the path of the global configuration file, if there is a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Discovery against an explicit home directory.
fn sources_for(cwd: &Path, home: Option<&Path>) -> Vec<ConfigSource> {
    let scope_of = |dir: &Path| {
        if home == Some(dir) {
            ConfigScope::Global
        } else {
            ConfigScope::Project
        }
    };

    let mut sources = Vec::new();
    for dir in cwd.ancestors() {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            continue;
        }
        let root = is_root_config(&path);
        sources.push(ConfigSource {
            path,
            scope: scope_of(dir),
            root,
        });
        if root {
            return sources;
        }
    }

    if let Some(home) = home {
        let path = home.join(CONFIG_FILENAME);
        if path.is_file() && !sources.iter().any(|source| source.path == path) {
            let root = is_root_config(&path);
            sources.push(ConfigSource {
                path,
                scope: ConfigScope::Global,
                root,
            });
        }
    }
    sources
}
