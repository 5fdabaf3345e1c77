//! `sift.toml` configuration.
//!
//! A single optional TOML file in the working directory supplies defaults
//! for flags the user did not pass. A missing file means defaults; a broken
//! file is an error rather than a silent fallback.

use std::{fs, io, num::NonZeroUsize, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "sift.toml";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

/// Defaults applied when the corresponding CLI flags are absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Stemmer language for indexing and query analysis.
    pub language: String,
    /// Default page size for search results.
    pub page_size: NonZeroUsize,
    /// Per-query execution deadline in milliseconds.
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "english".to_string(),
            page_size: NonZeroUsize::new(10).expect("nonzero literal"),
            timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Loads `sift.toml` from `cwd`, falling back to defaults when absent.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let path = cwd.join(CONFIG_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::ParseToml { path, source })
    }

    /// The execution deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
