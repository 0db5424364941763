//! Keyword entry formats and their normalised form.

use lexora_common::PatternWarning;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One keyword entry as it appears in a source.
///
/// Keyword files allow either a bare string (`"sale deed"`) or an object
/// (`{"pattern": "hon'?ble\\s+justice", "weight": 3.0, "is_regex": true}`).
/// Anything else found in a file is kept as `Unsupported` so it can be
/// reported and dropped during normalisation.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternEntrySource {
    Literal(String),
    Extended {
        pattern: Option<String>,
        weight: Option<f64>,
        is_regex: Option<bool>,
    },
    Unsupported(Value),
}

impl PatternEntrySource {
    /// A structured entry with every field given.
    pub fn extended(pattern: impl Into<String>, weight: f64, is_regex: bool) -> Self {
        PatternEntrySource::Extended {
            pattern: Some(pattern.into()),
            weight: Some(weight),
            is_regex: Some(is_regex),
        }
    }

    /// Weighted regex entry.
    pub fn regex(pattern: impl Into<String>, weight: f64) -> Self {
        Self::extended(pattern, weight, true)
    }

    /// Interpret one element of a keyword list from a parsed document.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => PatternEntrySource::Literal(s),
            Value::Object(map) => {
                let pattern = match map.get("pattern") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(_) => return PatternEntrySource::Unsupported(Value::Object(map)),
                };
                let weight = match map.get("weight") {
                    None | Some(Value::Null) => None,
                    Some(Value::Number(n)) => n.as_f64(),
                    Some(_) => return PatternEntrySource::Unsupported(Value::Object(map)),
                };
                let is_regex = match map.get("is_regex") {
                    None | Some(Value::Null) => None,
                    Some(Value::Bool(b)) => Some(*b),
                    Some(_) => return PatternEntrySource::Unsupported(Value::Object(map)),
                };
                PatternEntrySource::Extended { pattern, weight, is_regex }
            }
            other => PatternEntrySource::Unsupported(other),
        }
    }

    /// Resolve into a [`PatternEntry`], or the reason the entry is dropped.
    ///
    /// A pattern that is empty or contains only whitespace counts as empty.
    pub fn normalize(
        self,
        subcategory: &str,
        index: usize,
    ) -> Result<PatternEntry, PatternWarning> {
        let (pattern, weight, is_regex) = match self {
            PatternEntrySource::Literal(pattern) => (pattern, 1.0, false),
            PatternEntrySource::Extended { pattern, weight, is_regex } => (
                pattern.unwrap_or_default(),
                weight.unwrap_or(1.0),
                is_regex.unwrap_or(false),
            ),
            PatternEntrySource::Unsupported(value) => {
                return Err(PatternWarning::UnsupportedEntry {
                    subcategory: subcategory.to_string(),
                    index,
                    found: json_type_name(&value).to_string(),
                });
            }
        };

        if pattern.trim().is_empty() {
            return Err(PatternWarning::EmptyPattern {
                subcategory: subcategory.to_string(),
                index,
            });
        }

        if !(weight.is_finite() && weight > 0.0) {
            return Err(PatternWarning::InvalidWeight {
                subcategory: subcategory.to_string(),
                pattern,
                weight,
            });
        }

        Ok(PatternEntry { pattern, weight, is_regex })
    }
}

impl From<&str> for PatternEntrySource {
    fn from(s: &str) -> Self {
        PatternEntrySource::Literal(s.to_string())
    }
}

impl From<String> for PatternEntrySource {
    fn from(s: String) -> Self {
        PatternEntrySource::Literal(s)
    }
}

impl From<PatternEntry> for PatternEntrySource {
    fn from(e: PatternEntry) -> Self {
        PatternEntrySource::extended(e.pattern, e.weight, e.is_regex)
    }
}

/// Normalised keyword entry. `pattern` has at least one non-whitespace
/// character and `weight` is finite and > 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub pattern: String,
    pub weight: f64,
    pub is_regex: bool,
}

impl PatternEntry {
    pub fn pattern_type(&self) -> &'static str {
        if self.is_regex { "regex" } else { "string" }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object with invalid field types",
    }
}
