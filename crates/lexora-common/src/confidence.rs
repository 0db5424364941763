//! Confidence buckets for classification verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete confidence grade attached to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    VeryLow,
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::VeryLow => "very_low",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bound of each confidence bucket.
///
/// Monotonicity (`very_low <= low <= medium <= high`) is expected but not
/// enforced; see [`ConfidenceThresholds::is_monotonic`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    #[serde(default = "default_very_low")]
    pub very_low: f64,
    #[serde(default = "default_low")]
    pub low: f64,
    #[serde(default = "default_medium")]
    pub medium: f64,
    #[serde(default = "default_high")]
    pub high: f64,
}

fn default_very_low() -> f64 { 0.0 }
fn default_low()      -> f64 { 0.1 }
fn default_medium()   -> f64 { 0.4 }
fn default_high()     -> f64 { 0.7 }

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            very_low: default_very_low(),
            low: default_low(),
            medium: default_medium(),
            high: default_high(),
        }
    }
}

impl ConfidenceThresholds {
    pub fn new(very_low: f64, low: f64, medium: f64, high: f64) -> Self {
        Self { very_low, low, medium, high }
    }

    /// Highest bucket whose threshold is `<= score`.
    /// Checked from `high` downwards, so a non-monotone table resolves to the
    /// first bucket that admits the score. Anything below `low` is `very_low`.
    pub fn bucket(&self, score: f64) -> ConfidenceLevel {
        if score >= self.high {
            ConfidenceLevel::High
        } else if score >= self.medium {
            ConfidenceLevel::Medium
        } else if score >= self.low {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }

    pub fn is_monotonic(&self) -> bool {
        self.very_low <= self.low && self.low <= self.medium && self.medium <= self.high
    }
}
