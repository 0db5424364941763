//! Pattern Loader: resolves a [`KeywordSource`] into canonical [`KeywordTables`].

use std::path::{Path, PathBuf};

use lexora_common::{ConfigError, PatternWarning, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::detect::{DetectChain, KeywordDocument};
use crate::entry::PatternEntrySource;
use crate::table::{CategoryMapping, KeywordTables, SubcategoryTable};

/// Where a classifier's keyword tables come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum KeywordSource {
    /// Walk the auto-detect chain.
    #[default]
    AutoDetect,
    /// JSON or YAML keyword file.
    File(PathBuf),
    /// Tables supplied directly by the caller, in order.
    InMemory {
        keywords: Vec<(String, Vec<PatternEntrySource>)>,
        category_mapping: Vec<(String, Vec<String>)>,
    },
}

impl KeywordSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        KeywordSource::File(path.into())
    }

    pub fn in_memory<K, E, C, S>(
        keywords: impl IntoIterator<Item = (K, Vec<E>)>,
        category_mapping: impl IntoIterator<Item = (C, Vec<S>)>,
    ) -> Self
    where
        K: Into<String>,
        E: Into<PatternEntrySource>,
        C: Into<String>,
        S: Into<String>,
    {
        KeywordSource::InMemory {
            keywords: keywords
                .into_iter()
                .map(|(k, entries)| (k.into(), entries.into_iter().map(Into::into).collect()))
                .collect(),
            category_mapping: category_mapping
                .into_iter()
                .map(|(c, subs)| (c.into(), subs.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }
}

/// Warnings raised while loading and compiling one keyword source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub origin: String,
    pub warnings: Vec<PatternWarning>,
}

impl LoadReport {
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into(), warnings: Vec::new() }
    }

    /// Record and log a warning.
    pub fn push(&mut self, warning: PatternWarning) {
        warn!(origin = %self.origin, "{}", warning);
        self.warnings.push(warning);
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Entries dropped during normalisation or compilation.
    pub fn dropped_entries(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| {
                !matches!(
                    w,
                    PatternWarning::DanglingSubcategory { .. }
                        | PatternWarning::UnmappedSubcategory { .. }
                )
            })
            .count()
    }
}

/// Loads keyword tables for any [`KeywordSource`].
#[derive(Debug, Default)]
pub struct KeywordsLoader {
    chain: DetectChain,
}

impl KeywordsLoader {
    /// Loader using the standard auto-detect chain.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(chain: DetectChain) -> Self {
        Self { chain }
    }

    pub fn load(&self, source: &KeywordSource) -> Result<(KeywordTables, LoadReport)> {
        match source {
            KeywordSource::AutoDetect => self.chain.resolve(),
            KeywordSource::File(path) => Self::load_from_file(path),
            KeywordSource::InMemory { keywords, category_mapping } => {
                let mut report = LoadReport::new("in-memory");
                let tables = assemble(
                    keywords.iter().map(|(name, entries)| (name.as_str(), entries.clone())),
                    category_mapping.iter().map(|(c, subs)| (c.clone(), subs.clone())),
                    &mut report,
                );
                Ok((tables, report))
            }
        }
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<(KeywordTables, LoadReport)> {
        let document = KeywordDocument::read(path)?;
        let mut report = LoadReport::new(document.origin.clone());
        let tables = parse_document(&document, &mut report)?;
        debug!(
            origin = %report.origin,
            subcategories = tables.keywords.len(),
            "Loaded keywords file"
        );
        Ok((tables, report))
    }

    /// Check a document's structure and entries without keeping the tables.
    /// Structural problems are errors, per-entry problems come back as warnings.
    pub fn validate(document: &KeywordDocument) -> Result<Vec<PatternWarning>> {
        let mut report = LoadReport::new(document.origin.clone());
        parse_document(document, &mut report)?;
        Ok(report.warnings)
    }
}

/// Turn a parsed keyword document into tables, collecting per-entry warnings.
pub fn parse_document(
    document: &KeywordDocument,
    report: &mut LoadReport,
) -> Result<KeywordTables> {
    let origin = &document.origin;
    let root = document.value.as_object().ok_or_else(|| ConfigError::Malformed {
        origin: origin.clone(),
        reason: "top-level value must be an object".to_string(),
    })?;

    let keywords = required_object(root, "keywords", origin)?;
    let mapping = required_object(root, "category_mapping", origin)?;

    let mut raw_keywords = Vec::with_capacity(keywords.len());
    for (subcategory, entries) in keywords {
        let list = entries.as_array().ok_or_else(|| ConfigError::Malformed {
            origin: origin.clone(),
            reason: format!("entries for subcategory '{subcategory}' must be a list"),
        })?;
        let sources: Vec<PatternEntrySource> =
            list.iter().cloned().map(PatternEntrySource::from_value).collect();
        raw_keywords.push((subcategory.as_str(), sources));
    }

    let mut raw_mapping = Vec::with_capacity(mapping.len());
    for (category, members) in mapping {
        let list = members.as_array().ok_or_else(|| ConfigError::Malformed {
            origin: origin.clone(),
            reason: format!("subcategories of category '{category}' must be a list"),
        })?;
        let names = list
            .iter()
            .map(|m| {
                m.as_str().map(str::to_string).ok_or_else(|| ConfigError::Malformed {
                    origin: origin.clone(),
                    reason: format!("category '{category}' lists a non-string subcategory"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        raw_mapping.push((category.clone(), names));
    }

    Ok(assemble(raw_keywords.into_iter(), raw_mapping.into_iter(), report))
}

fn required_object<'a>(
    root: &'a Map<String, Value>,
    key: &'static str,
    origin: &str,
) -> Result<&'a Map<String, Value>> {
    match root.get(key) {
        None => Err(ConfigError::MissingKey { origin: origin.to_string(), key }),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ConfigError::Malformed {
            origin: origin.to_string(),
            reason: format!("'{key}' must be an object"),
        }),
    }
}

fn assemble<'a>(
    keywords: impl Iterator<Item = (&'a str, Vec<PatternEntrySource>)>,
    category_mapping: impl Iterator<Item = (String, Vec<String>)>,
    report: &mut LoadReport,
) -> KeywordTables {
    let mut table = SubcategoryTable::new();
    for (subcategory, sources) in keywords {
        let mut entries = Vec::with_capacity(sources.len());
        for (index, source) in sources.into_iter().enumerate() {
            match source.normalize(subcategory, index) {
                Ok(entry) => entries.push(entry),
                Err(warning) => report.push(warning),
            }
        }
        table.insert(subcategory, entries);
    }

    let mut mapping = CategoryMapping::new();
    for (category, subcategories) in category_mapping {
        mapping.insert(category, subcategories);
    }

    let tables = KeywordTables::new(table, mapping);
    for warning in tables.reference_warnings() {
        report.push(warning);
    }
    tables
}
