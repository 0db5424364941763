//! lexora-common — Shared types, errors, and logging setup used across all Lexora crates.

pub mod error;
pub mod confidence;
pub mod ordered;
pub mod telemetry;

// Re-export commonly used types
pub use confidence::{ConfidenceLevel, ConfidenceThresholds};
pub use error::{ConfigError, InputWarning, PatternWarning, Result};
pub use ordered::OrderedScores;
