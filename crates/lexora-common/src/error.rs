use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal, construction-time failures. A classifier is never handed out
/// when one of these is returned.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No keywords source found (tried: {}). Please either:\n\
             1. Build with the `embedded-keywords` feature to use the bundled legal dictionary\n\
             2. Place legal_keywords.json next to the executable or in the working directory\n\
             3. Specify the keywords source explicitly",
             .tried.join(", "))]
    SourceNotFound { tried: Vec<String> },

    #[error("Keywords file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read keywords file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON format in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML format in {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Keywords data in {origin} must contain '{key}'")]
    MissingKey { origin: String, key: &'static str },

    #[error("Malformed keywords data in {origin}: {reason}")]
    Malformed { origin: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Non-fatal, per-entry problems found while loading or compiling patterns.
/// The offending entry is dropped and loading continues.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternWarning {
    EmptyPattern { subcategory: String, index: usize },
    InvalidWeight { subcategory: String, pattern: String, weight: f64 },
    UnsupportedEntry { subcategory: String, index: usize, found: String },
    InvalidRegex { subcategory: String, pattern: String, reason: String },
    DanglingSubcategory { category: String, subcategory: String },
    UnmappedSubcategory { subcategory: String },
}

impl fmt::Display for PatternWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternWarning::EmptyPattern { subcategory, index } => {
                write!(f, "Skipping entry #{index} in '{subcategory}': pattern is required")
            }
            PatternWarning::InvalidWeight { subcategory, pattern, weight } => {
                write!(f, "Skipping '{pattern}' in '{subcategory}': weight {weight} must be > 0")
            }
            PatternWarning::UnsupportedEntry { subcategory, index, found } => {
                write!(
                    f,
                    "Skipping entry #{index} in '{subcategory}': invalid keyword entry format ({found})"
                )
            }
            PatternWarning::InvalidRegex { subcategory, pattern, reason } => {
                write!(
                    f,
                    "Failed to compile pattern '{pattern}' in subcategory '{subcategory}': {reason}"
                )
            }
            PatternWarning::DanglingSubcategory { category, subcategory } => {
                write!(
                    f,
                    "Subcategory '{subcategory}' in category '{category}' not found in keywords"
                )
            }
            PatternWarning::UnmappedSubcategory { subcategory } => {
                write!(f, "No category found for subcategory '{subcategory}'")
            }
        }
    }
}

/// Non-fatal, per-call input problems. `classify` answers these with the
/// Unclassified verdict instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputWarning {
    Empty,
    NotUtf8,
}

impl InputWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputWarning::Empty => "Empty or invalid input text",
            InputWarning::NotUtf8 => "Input is not valid UTF-8 text",
        }
    }
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
