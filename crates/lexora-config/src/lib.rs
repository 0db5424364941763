//! Configuration loading for Lexora classifiers.
//! Reads lexora.toml from the current directory or the path in the LEXORA_CONFIG env var,
//! then applies environment overrides.

use std::path::{Path, PathBuf};

use lexora_common::ConfidenceThresholds;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const CONFIG_ENV: &str = "LEXORA_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "lexora.toml";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ConfigLoadError>;

/// Construction-time settings for a classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Characters of context captured on each side of a match
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Verbose per-match logging
    #[serde(default)]
    pub debug: bool,

    /// Explicit keyword file; auto-detect when absent
    #[serde(default)]
    pub keywords_path: Option<PathBuf>,

    /// Compiled program size limit for each pattern, in bytes
    #[serde(default = "default_regex_size_limit")]
    pub regex_size_limit: usize,

    /// Batches larger than this are classified on the rayon pool
    #[serde(default = "default_batch_parallel_threshold")]
    pub batch_parallel_threshold: usize,

    /// Confidence bucket thresholds
    #[serde(default)]
    pub thresholds: ConfidenceThresholds,
}

fn default_context_window()           -> usize { 100 }
fn default_regex_size_limit()         -> usize { 10 * (1 << 20) }
fn default_batch_parallel_threshold() -> usize { 10 }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            debug: false,
            keywords_path: None,
            regex_size_limit: default_regex_size_limit(),
            batch_parallel_threshold: default_batch_parallel_threshold(),
            thresholds: ConfidenceThresholds::default(),
        }
    }
}

impl ClassifierConfig {
    /// Load configuration, then apply environment overrides.
    ///
    /// Uses the file named by `LEXORA_CONFIG` (which must exist) or
    /// `lexora.toml` in the working directory (defaults when absent).
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_path(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_path(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => {
                debug!("No {} found, using default classifier configuration", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from a file, choosing the format from its extension
    /// (`.yaml`/`.yml`, `.json`, anything else is TOML).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => Self::from_toml(path),
        }
    }

    /// Load from TOML file
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load from JSON file
    pub fn from_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Apply `CLASSIFIER_DEBUG`, `LEXORA_KEYWORDS` and `LEXORA_CONTEXT_WINDOW`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|var| std::env::var(var).ok())
    }

    /// Same as [`apply_env_overrides`](Self::apply_env_overrides) with an
    /// injectable variable lookup.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("CLASSIFIER_DEBUG") {
            self.debug = parse_flag(&value);
        }

        if let Some(path) = lookup("LEXORA_KEYWORDS") {
            if !path.trim().is_empty() {
                self.keywords_path = Some(PathBuf::from(path));
            }
        }

        if let Some(value) = lookup("LEXORA_CONTEXT_WINDOW") {
            self.context_window = value.trim().parse().map_err(|_| ConfigLoadError::InvalidEnv {
                var: "LEXORA_CONTEXT_WINDOW",
                value: value.clone(),
            })?;
        }

        if !self.thresholds.is_monotonic() {
            warn!(thresholds = ?self.thresholds, "Confidence thresholds are not non-decreasing");
        }

        Ok(())
    }

    /// Save to TOML file
    pub fn to_toml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `true`, `1`, `yes` and `on` (any case) enable a flag.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

fn read_config(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ConfigLoadError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "Loaded classifier configuration");
    Ok(content)
}
