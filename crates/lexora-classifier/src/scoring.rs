//! Scoring Engine: weighted frequency plus diversity coverage per category.
//!
//! For a category C with subcategories S:
//!
//! ```text
//! frequency(C) = Σ weighted_score(S) / max(text_length / 1000, 1)
//! diversity(C) = unique_keywords(C) / max(max unique_keywords over categories, 1)
//! score(C)     = 0.6 * frequency(C) + 0.4 * diversity(C)
//! ```

use std::collections::HashSet;

use lexora_common::{ConfidenceLevel, ConfidenceThresholds, OrderedScores};
use lexora_patterns::CategoryMapping;

use crate::verdict::MatchedPattern;

pub const FREQUENCY_WEIGHT: f64 = 0.6;
pub const DIVERSITY_WEIGHT: f64 = 0.4;

/// Label reported when no category scores above zero.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Characters per normalisation unit for the frequency component.
const LENGTH_UNIT: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub category_scores: OrderedScores,
    pub diversity_scores: OrderedScores,
    pub label: String,
    pub score: f64,
    pub confidence: ConfidenceLevel,
}

pub fn score(
    matched: &[MatchedPattern],
    text_length: usize,
    mapping: &CategoryMapping,
    thresholds: &ConfidenceThresholds,
) -> ScoreCard {
    let mut weighted = Vec::with_capacity(mapping.len());
    let mut unique = Vec::with_capacity(mapping.len());

    for (category, subcategories) in mapping.iter() {
        let mut total = 0.0;
        let mut keywords: HashSet<&str> = HashSet::new();
        for m in matched.iter().filter(|m| subcategories.contains(&m.subcategory)) {
            total += m.weighted_score;
            keywords.insert(m.keyword.as_str());
        }
        weighted.push((category, total));
        unique.push(keywords.len());
    }

    let max_unique = unique.iter().copied().max().unwrap_or(0).max(1) as f64;
    let length_norm = (text_length as f64 / LENGTH_UNIT).max(1.0);

    let mut category_scores = OrderedScores::with_capacity(mapping.len());
    let mut diversity_scores = OrderedScores::with_capacity(mapping.len());
    for ((category, total), unique) in weighted.into_iter().zip(unique) {
        let diversity = unique as f64 / max_unique;
        let frequency = total / length_norm;
        diversity_scores.insert(category, diversity);
        let score = FREQUENCY_WEIGHT * frequency + DIVERSITY_WEIGHT * diversity;
        category_scores.insert(category, score);
    }

    let (label, score, confidence) = select_label(&category_scores, thresholds);
    ScoreCard { category_scores, diversity_scores, label, score, confidence }
}

/// Strictly highest score wins, so ties go to the category declared first.
pub fn select_label(
    scores: &OrderedScores,
    thresholds: &ConfidenceThresholds,
) -> (String, f64, ConfidenceLevel) {
    let mut best: Option<(&str, f64)> = None;
    for (category, score) in scores.iter() {
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((category, score));
        }
    }

    match best {
        Some((category, score)) if score > 0.0 => {
            (category.to_string(), score, thresholds.bucket(score))
        }
        _ => (UNCLASSIFIED.to_string(), 0.0, ConfidenceLevel::VeryLow),
    }
}
