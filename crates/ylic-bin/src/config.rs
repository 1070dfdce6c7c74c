//! Configuration loading and parsing.
//!
//! Parses `ylic.toml` (or an override path) into [`ConfigFile`]. Every field
//! has a default so a missing or partial file still yields a usable
//! configuration. Unknown fields are ignored (TOML deserialization tolerance)
//! to allow forward evolution without immediate warnings.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleConfig {
    #[serde(default = "ConsoleConfig::default_prompt")]
    pub prompt: String,
    /// Drawing width in character cells. `0` means "use the terminal width".
    #[serde(default)]
    pub columns: u16,
    /// Drawing height in rows. `0` means "use the terminal height".
    #[serde(default)]
    pub rows: u16,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            prompt: Self::default_prompt(),
            columns: 0,
            rows: 0,
        }
    }
}

impl ConsoleConfig {
    fn default_prompt() -> String {
        "$ ".to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file")]
    pub file: String,
    /// Default filter directive used when `RUST_LOG` is unset.
    #[serde(default = "LogConfig::default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
            filter: Self::default_filter(),
        }
    }
}

impl LogConfig {
    fn default_file() -> String {
        "ylic.log".to_string()
    }
    fn default_filter() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Config path: `ylic.toml` in the working directory.
pub fn discover() -> PathBuf {
    PathBuf::from("ylic.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<ConfigFile> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => {
                info!(target: "config", path = %path.display(), "config_loaded");
                Ok(file)
            }
            Err(_e) => {
                // On parse error fall back to defaults.
                Ok(ConfigFile::default())
            }
        }
    } else {
        Ok(ConfigFile::default())
    }
}
