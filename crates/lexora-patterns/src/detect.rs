//! Keyword source auto-detection.
//!
//! A [`DetectChain`] is an ordered list of named providers. Each provider
//! either reports "not available" (`None`) or hands back a parsed document.
//! The first provider whose document yields a non-empty keyword table wins.

use std::fmt;
use std::path::{Path, PathBuf};

use lexora_common::{ConfigError, Result};
use serde_json::Value;
use tracing::debug;

use crate::loader::{parse_document, LoadReport};
use crate::table::KeywordTables;

/// File name looked up beside the executable and in the working directory.
pub const KEYWORDS_FILE_NAME: &str = "legal_keywords.json";

#[cfg(feature = "embedded-keywords")]
const EMBEDDED_KEYWORDS: &str = include_str!("../data/legal_keywords.json");

/// A parsed keyword document and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordDocument {
    pub origin: String,
    pub value: Value,
}

impl KeywordDocument {
    pub fn from_json_str(origin: impl Into<String>, content: &str) -> Result<Self> {
        let origin = origin.into();
        let value = serde_json::from_str(content).map_err(|source| ConfigError::Json {
            origin: origin.clone(),
            source,
        })?;
        Ok(Self { origin, value })
    }

    pub fn from_yaml_str(origin: impl Into<String>, content: &str) -> Result<Self> {
        let origin = origin.into();
        let value = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            origin: origin.clone(),
            source,
        })?;
        Ok(Self { origin, value })
    }

    /// Read a keyword file. `.yaml` / `.yml` parse as YAML, everything else as JSON.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = path.display().to_string();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(origin, &content),
            _ => Self::from_json_str(origin, &content),
        }
    }
}

type Provider = Box<dyn Fn() -> Option<Result<KeywordDocument>> + Send + Sync>;

/// Ordered keyword source providers.
pub struct DetectChain {
    providers: Vec<(String, Provider)>,
}

impl DetectChain {
    pub fn empty() -> Self {
        Self { providers: Vec::new() }
    }

    /// Embedded dictionary (when compiled in), then `legal_keywords.json`
    /// beside the executable, then in the working directory.
    pub fn standard() -> Self {
        let chain = Self::empty();

        #[cfg(feature = "embedded-keywords")]
        let chain = chain.push("embedded", || {
            Some(KeywordDocument::from_json_str("embedded", EMBEDDED_KEYWORDS))
        });

        chain
            .push("sibling", || {
                let exe = std::env::current_exe().ok()?;
                existing_file(exe.parent()?.join(KEYWORDS_FILE_NAME))
            })
            .push("project-root", || {
                existing_file(std::env::current_dir().ok()?.join(KEYWORDS_FILE_NAME))
            })
    }

    /// Append a provider.
    pub fn push<F>(mut self, name: impl Into<String>, provider: F) -> Self
    where
        F: Fn() -> Option<Result<KeywordDocument>> + Send + Sync + 'static,
    {
        self.providers.push((name.into(), Box::new(provider)));
        self
    }

    /// Append a provider reading `path` when it exists.
    pub fn push_file(self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.push(name, move || existing_file(path.clone()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Walk the providers in order.
    ///
    /// A malformed document from an available provider is fatal. A document
    /// with no subcategories is skipped like an unavailable provider.
    pub fn resolve(&self) -> Result<(KeywordTables, LoadReport)> {
        let mut tried = Vec::with_capacity(self.providers.len());

        for (name, provider) in &self.providers {
            tried.push(name.clone());

            let Some(document) = provider() else {
                debug!(provider = %name, "Keyword provider not available");
                continue;
            };
            let document = document?;

            let mut report = LoadReport::new(document.origin.clone());
            let tables = parse_document(&document, &mut report)?;
            if tables.keywords.is_empty() {
                debug!(
                    provider = %name,
                    origin = %document.origin,
                    "Keyword provider yielded an empty table"
                );
                continue;
            }

            debug!(provider = %name, origin = %document.origin, "Resolved keyword source");
            return Ok((tables, report));
        }

        Err(ConfigError::SourceNotFound { tried })
    }
}

impl Default for DetectChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for DetectChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn existing_file(path: PathBuf) -> Option<Result<KeywordDocument>> {
    path.is_file().then(|| KeywordDocument::read(&path))
}
