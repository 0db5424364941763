//! Weighted pattern classification for legal document text.
//!
//! A [`WeightedClassifier`] loads and compiles a keyword source once, then
//! classifies any number of texts:
//!
//! 1. scan: every compiled pattern is run over the text ([`matcher`])
//! 2. score: per-category weighted frequency plus diversity ([`scoring`])
//! 3. verdict: label, confidence bucket and summary ([`verdict`])

pub mod classifier;
pub mod matcher;
pub mod scoring;
pub mod verdict;

pub use classifier::{WeightedClassifier, WeightedClassifierBuilder};
pub use scoring::{ScoreCard, DIVERSITY_WEIGHT, FREQUENCY_WEIGHT, UNCLASSIFIED};
pub use verdict::{
    ClassificationResult, DocumentMetadata, MatchedPattern, ProcessingMetadata, Statistics, Summary,
    Verdict,
};

pub use lexora_common::{ConfidenceLevel, ConfidenceThresholds, ConfigError, OrderedScores};
pub use lexora_config::ClassifierConfig;
pub use lexora_patterns::{DetectChain, KeywordSource, PatternEntrySource};
