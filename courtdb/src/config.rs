//! Configuration for a merge run.
//!
//! Value resolution order:
//! 1. Explicit override applied by the caller (CLI flags)
//! 2. TOML config file (`--config`, or `cmerge.toml` in the working directory)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the config file picked up from the working directory.
pub const CONFIG_FILE_NAME: &str = "cmerge.toml";

/// Merge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Manifest listing the source stores, one per line.
    #[serde(default = "default_list_path")]
    pub list_path: PathBuf,

    /// Destination (combined) store.
    #[serde(default = "default_out_path")]
    pub out_path: PathBuf,

    /// Remove an existing destination before merging.
    #[serde(default)]
    pub fresh: bool,
}

fn default_list_path() -> PathBuf {
    PathBuf::from("offline_training/db_list.txt")
}

fn default_out_path() -> PathBuf {
    PathBuf::from("db/combined_offline_training.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            list_path: default_list_path(),
            out_path: default_out_path(),
            fresh: false,
        }
    }
}

impl Config {
    /// Create a config with explicit manifest and destination paths.
    pub fn new(list_path: impl Into<PathBuf>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            list_path: list_path.into(),
            out_path: out_path.into(),
            fresh: false,
        }
    }

    /// Set whether an existing destination is removed first.
    pub fn with_fresh(mut self, fresh: bool) -> Self {
        self.fresh = fresh;
        self
    }

    /// Load config from a TOML file, or return defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Load `cmerge.toml` from the given directory, or defaults.
    pub fn load_in(dir: &Path) -> Result<Self> {
        Self::load_from(&dir.join(CONFIG_FILE_NAME))
    }

    /// Save config as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
