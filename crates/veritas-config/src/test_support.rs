//! Test helpers shared across veritas-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::{discovery::CONFIG_FILENAME, merge::ParsedConfig, parse::parse_config_str};

/// A temporary directory tree holding `.veritas.toml` files.
pub struct ConfigTree {
    /// Owned temporary directory, removed on drop.
    root: TempDir,
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Returns the path to the root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory relative to the root.
    pub fn dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// The directory standing in for the home directory.
    pub fn home(&self) -> PathBuf {
        self.dir("home")
    }

    /// Writes `rel_path/.veritas.toml`.
    pub fn config(&self, rel_path: &str, content: &str) -> PathBuf {
        let config = self.dir(rel_path).join(CONFIG_FILENAME);
        fs::write(&config, content).unwrap();
        config
    }

    /// Writes a `root = true` file in `rel_path`.
    pub fn root_config(&self, rel_path: &str) -> PathBuf {
        self.config(rel_path, "root = true\n")
    }

    /// Parses `content` as if it were read from `rel_path/.veritas.toml`, without writing it.
    pub fn parsed(&self, rel_path: &str, content: &str) -> ParsedConfig {
        let path = self.root.path().join(rel_path).join(CONFIG_FILENAME);
        ParsedConfig {
            config: parse_config_str(content, &path).unwrap(),
            path,
        }
    }
}
