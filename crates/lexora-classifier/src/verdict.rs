//! Classification results and the exported verdict document.

use chrono::{DateTime, Utc};
use lexora_common::{ConfidenceLevel, ConfidenceThresholds, OrderedScores};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Caller-supplied metadata, echoed back unmodified.
pub type DocumentMetadata = Map<String, Value>;

pub const CLASSIFIER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CLASSIFICATION_METHOD: &str = "weighted_regex_pattern_matching";

/// Number of keywords listed in [`Summary::top_keywords`].
pub const TOP_KEYWORDS: usize = 5;

/// One pattern that matched at least once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedPattern {
    pub keyword: String,
    pub category: String,
    pub subcategory: String,
    pub frequency: usize,
    pub weight: f64,
    /// `frequency * weight`
    pub weighted_score: f64,
    /// Byte offsets of each match start
    pub positions: Vec<usize>,
    pub context_snippets: Vec<String>,
    pub is_regex: bool,
    pub pattern_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub classifier_version: String,
    pub classification_method: String,
    pub total_patterns_checked: usize,
    pub confidence_thresholds: ConfidenceThresholds,
    pub document_metadata: DocumentMetadata,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessingMetadata {
    pub fn new(
        total_patterns_checked: usize,
        confidence_thresholds: ConfidenceThresholds,
        document_metadata: DocumentMetadata,
    ) -> Self {
        Self {
            classifier_version: CLASSIFIER_VERSION.to_string(),
            classification_method: CLASSIFICATION_METHOD.to_string(),
            total_patterns_checked,
            confidence_thresholds,
            document_metadata,
            timestamp: Utc::now(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub primary_label: String,
    pub confidence: ConfidenceLevel,
    /// Winning score rounded to 3 decimals
    pub score: f64,
    pub top_keywords: Vec<String>,
    pub total_matches: usize,
    pub categories_considered: usize,
}

impl Summary {
    pub fn new(
        label: &str,
        confidence: ConfidenceLevel,
        score: f64,
        matched_patterns: &[MatchedPattern],
        category_scores: &OrderedScores,
    ) -> Self {
        // stable sort: equal scores keep scan order
        let mut ranked: Vec<&MatchedPattern> = matched_patterns.iter().collect();
        ranked.sort_by(|a, b| b.weighted_score.total_cmp(&a.weighted_score));

        Self {
            primary_label: label.to_string(),
            confidence,
            score: round_to(score, 3),
            top_keywords: ranked.iter().take(TOP_KEYWORDS).map(|p| p.keyword.clone()).collect(),
            total_matches: matched_patterns.iter().map(|p| p.frequency).sum(),
            categories_considered: category_scores.count_positive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub label: String,
    pub score: f64,
    pub confidence: ConfidenceLevel,
    pub matched_patterns: Vec<MatchedPattern>,
    /// Length in characters
    pub text_length: usize,
    pub total_matches: usize,
    pub total_weighted_score: f64,
    pub category_scores: OrderedScores,
    pub diversity_scores: OrderedScores,
    pub processing_metadata: ProcessingMetadata,
    pub summary: Summary,
}

impl ClassificationResult {
    pub fn is_classified(&self) -> bool {
        !self.matched_patterns.is_empty() && self.score > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_patterns_matched: usize,
    pub unique_categories_found: usize,
    pub average_pattern_weight: f64,
    pub text_coverage_ratio: f64,
}

impl Statistics {
    pub fn from_result(result: &ClassificationResult) -> Self {
        let matched = &result.matched_patterns;
        let average_pattern_weight = if matched.is_empty() {
            0.0
        } else {
            matched.iter().map(|p| p.weight).sum::<f64>() / matched.len() as f64
        };
        let text_coverage_ratio = if result.text_length == 0 {
            0.0
        } else {
            result.total_matches as f64 / result.text_length as f64
        };

        Self {
            total_patterns_matched: matched.len(),
            unique_categories_found: result.category_scores.count_positive(),
            average_pattern_weight,
            text_coverage_ratio,
        }
    }
}

/// Exported verdict: every result field plus derived statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(flatten)]
    pub result: ClassificationResult,
    pub statistics: Statistics,
}

impl Verdict {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

pub fn export(result: ClassificationResult) -> Verdict {
    let statistics = Statistics::from_result(&result);
    Verdict { result, statistics }
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
