//! Run configuration.
//!
//! Resolved from, in increasing precedence: built-in defaults, a JSON file,
//! environment variables, then command-line flags.
//!
//! - `CODERBOT_DELAY_MS` - simulated work delay in milliseconds
//! - `CODERBOT_EXTENSIONS` - comma-separated source extensions for directory discovery

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::emitter::{Limits, EXCERPT_CHARS, LISTING_LIMIT};
use crate::error::{Error, Result};

const APP_NAME: &str = "coderbot";
const CONFIG_FILE: &str = "config.json";

pub const ENV_DELAY_MS: &str = "CODERBOT_DELAY_MS";
pub const ENV_EXTENSIONS: &str = "CODERBOT_EXTENSIONS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pause before reporting completion, in milliseconds. 0 disables it.
    pub delay_ms: u64,
    /// File extensions (without the dot) picked up by directory discovery.
    pub extensions: Vec<String>,
    pub listing_limit: usize,
    pub excerpt_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            extensions: vec!["py".to_string(), "js".to_string(), "ts".to_string()],
            listing_limit: LISTING_LIMIT,
            excerpt_chars: EXCERPT_CHARS,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the per-user
    /// config file is used if present; a broken per-user file is logged and
    /// ignored.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path).unwrap_or_else(|e| {
                    warn!("Failed to load config, using defaults: {}", e);
                    Self::default()
                }),
                _ => Self::default(),
            },
        };
        Ok(config.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay environment variables read through `lookup`. Unparseable
    /// values are logged and skipped.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DELAY_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.delay_ms = ms,
                Err(_) => warn!("Ignoring {}={:?}: not a number", ENV_DELAY_MS, raw),
            }
        }
        if let Some(raw) = lookup(ENV_EXTENSIONS) {
            let extensions: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if extensions.is_empty() {
                warn!("Ignoring empty {}", ENV_EXTENSIONS);
            } else {
                self.extensions = extensions;
            }
        }
        self
    }

    pub fn limits(&self) -> Limits {
        Limits {
            listing_limit: self.listing_limit,
            excerpt_chars: self.excerpt_chars,
        }
    }
}

/// `<config dir>/coderbot/config.json`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
