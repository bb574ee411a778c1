//! Configuration loading
//!
//! Handles parsing of `config.toml` in the yearwheel data directory. Every key is
//! optional; a missing file yields the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::fields::Locale;

/// Name of the configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Name of the default task file inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Label table for descriptions and listings
    #[serde(default)]
    pub locale: Locale,

    /// Calendar display settings
    #[serde(default)]
    pub calendar: CalendarConfig,
}

/// Calendar display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// List tasks already marked done
    #[serde(default = "default_show_done")]
    pub show_done: bool,

    /// Print ISO week numbers beside the month grid
    #[serde(default)]
    pub week_numbers: bool,
}

fn default_show_done() -> bool {
    true
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            show_done: default_show_done(),
            week_numbers: false,
        }
    }
}

impl Config {
    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `config.toml` from the data directory, defaulting when absent.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let config = Self::load(&path)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }
}

/// Data directory: the parent of an explicit task file, else `$HOME/.yearwheel`.
pub fn data_dir(db: Option<&Path>) -> PathBuf {
    match db {
        Some(path) => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
        None => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".yearwheel")
        }
    }
}
