//! `WeightedClassifier`: compiled keyword state plus the per-call pipeline
//! scan → score → verdict.

use lexora_common::{ConfidenceLevel, ConfidenceThresholds, InputWarning, OrderedScores, Result};
use lexora_config::ClassifierConfig;
use lexora_patterns::{
    CategoryMapping, CompileOptions, CompiledPatterns, DetectChain, KeywordSource, KeywordTables,
    KeywordsLoader, KeywordsSummary, LoadReport,
};
use tracing::{debug, info, warn};

use crate::matcher;
use crate::scoring::{self, UNCLASSIFIED};
use crate::verdict::{
    self, ClassificationResult, DocumentMetadata, MatchedPattern, ProcessingMetadata, Summary,
    Verdict,
};

/// Immutable after construction; share freely across threads.
#[derive(Debug)]
pub struct WeightedClassifier {
    tables: KeywordTables,
    compiled: CompiledPatterns,
    report: LoadReport,
    thresholds: ConfidenceThresholds,
    context_window: usize,
    debug: bool,
    #[cfg(feature = "parallel")]
    batch_parallel_threshold: usize,
}

impl WeightedClassifier {
    /// Load `source` and compile it with the settings in `config`.
    /// `config.keywords_path` is ignored; `source` decides.
    pub fn new(source: KeywordSource, config: &ClassifierConfig) -> Result<Self> {
        Self::builder().config(config.clone()).source(source).build()
    }

    /// Use `config.keywords_path` when set, otherwise auto-detect.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let source = match &config.keywords_path {
            Some(path) => KeywordSource::File(path.clone()),
            None => KeywordSource::AutoDetect,
        };
        Self::new(source, config)
    }

    /// Auto-detected keywords with default settings.
    ///
    /// Debug logging follows `CLASSIFIER_DEBUG`. The other environment
    /// overrides only apply through [`ClassifierConfig::load`].
    pub fn with_defaults() -> Result<Self> {
        let config = default_config(|var| std::env::var(var).ok());
        Self::new(KeywordSource::AutoDetect, &config)
    }

    pub fn builder() -> WeightedClassifierBuilder {
        WeightedClassifierBuilder::default()
    }

    pub fn classify(&self, text: &str) -> ClassificationResult {
        self.classify_with_metadata(text, DocumentMetadata::new())
    }

    pub fn classify_with_metadata(
        &self,
        text: &str,
        metadata: DocumentMetadata,
    ) -> ClassificationResult {
        if text.is_empty() {
            return self.unclassified(InputWarning::Empty, metadata);
        }

        let text_length = text.chars().count();
        let mapping = &self.tables.category_mapping;
        let matched = matcher::scan(&self.compiled, mapping, text, self.context_window);

        if self.debug {
            for m in &matched {
                debug!(
                    keyword = %m.keyword,
                    category = %m.category,
                    subcategory = %m.subcategory,
                    frequency = m.frequency,
                    weight = m.weight,
                    score = %format!("{:.2}", m.weighted_score),
                    "Pattern matched"
                );
            }
        }

        let card = scoring::score(&matched, text_length, mapping, &self.thresholds);
        let total_matches: usize = matched.iter().map(|m| m.frequency).sum();
        let total_weighted_score: f64 = matched.iter().map(|m| m.weighted_score).sum();
        let summary =
            Summary::new(&card.label, card.confidence, card.score, &matched, &card.category_scores);

        info!(
            label = %card.label,
            score = %format!("{:.3}", card.score),
            confidence = %card.confidence,
            "Document classified"
        );
        debug!(
            total_matches,
            total_weighted_score = %format!("{:.2}", total_weighted_score),
            "Match totals"
        );

        if self.debug {
            let mut ranked: Vec<(&str, f64)> = card.category_scores.iter().collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            for (category, score) in ranked.into_iter().take(3) {
                let diversity = card.diversity_scores.get(category).unwrap_or(0.0);
                debug!(
                    category,
                    score = %format!("{:.3}", score),
                    diversity = %format!("{:.3}", diversity),
                    "Category score"
                );
            }
        }

        ClassificationResult {
            label: card.label,
            score: card.score,
            confidence: card.confidence,
            matched_patterns: matched,
            text_length,
            total_matches,
            total_weighted_score,
            category_scores: card.category_scores,
            diversity_scores: card.diversity_scores,
            processing_metadata: self.metadata(metadata),
            summary,
        }
    }

    /// Classify raw bytes; input that is not UTF-8 is Unclassified.
    pub fn classify_bytes(&self, bytes: &[u8], metadata: DocumentMetadata) -> ClassificationResult {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.classify_with_metadata(text, metadata),
            Err(_) => self.unclassified(InputWarning::NotUtf8, metadata),
        }
    }

    /// Classify many documents, in input order.
    /// A `batch_parallel_threshold` of 0 keeps every batch sequential.
    pub fn classify_batch<S>(&self, texts: &[S]) -> Vec<ClassificationResult>
    where
        S: AsRef<str> + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            let threshold = self.batch_parallel_threshold;
            if texts.len() > threshold && threshold > 0 {
                use rayon::prelude::*;
                return texts.par_iter().map(|text| self.classify(text.as_ref())).collect();
            }
        }
        texts.iter().map(|text| self.classify(text.as_ref())).collect()
    }

    pub fn export(&self, result: &ClassificationResult) -> Verdict {
        verdict::export(result.clone())
    }

    pub fn compiled_pattern_count(&self) -> usize {
        self.compiled.total_patterns()
    }

    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.thresholds
    }

    pub fn category_mapping(&self) -> &CategoryMapping {
        &self.tables.category_mapping
    }

    pub fn keywords_summary(&self) -> KeywordsSummary {
        self.tables.summary()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    fn metadata(&self, document_metadata: DocumentMetadata) -> ProcessingMetadata {
        ProcessingMetadata::new(self.compiled.total_patterns(), self.thresholds, document_metadata)
    }

    fn unclassified(
        &self,
        warning: InputWarning,
        metadata: DocumentMetadata,
    ) -> ClassificationResult {
        warn!("{}", warning);

        let mut processing_metadata = self.metadata(metadata);
        processing_metadata.error = Some(warning.to_string());

        let empty: &[MatchedPattern] = &[];
        let category_scores = OrderedScores::new();
        ClassificationResult {
            label: UNCLASSIFIED.to_string(),
            score: 0.0,
            confidence: ConfidenceLevel::VeryLow,
            matched_patterns: Vec::new(),
            text_length: 0,
            total_matches: 0,
            total_weighted_score: 0.0,
            summary: Summary::new(
                UNCLASSIFIED,
                ConfidenceLevel::VeryLow,
                0.0,
                empty,
                &category_scores,
            ),
            diversity_scores: OrderedScores::new(),
            category_scores,
            processing_metadata,
        }
    }
}

fn default_config<F>(lookup: F) -> ClassifierConfig
where
    F: Fn(&str) -> Option<String>,
{
    ClassifierConfig {
        debug: lookup("CLASSIFIER_DEBUG").map_or(false, |v| lexora_config::parse_flag(&v)),
        ..Default::default()
    }
}

/// Builder for [`WeightedClassifier`].
#[derive(Debug, Default)]
pub struct WeightedClassifierBuilder {
    source: KeywordSource,
    config: ClassifierConfig,
    chain: Option<DetectChain>,
}

impl WeightedClassifierBuilder {
    pub fn source(mut self, source: KeywordSource) -> Self {
        self.source = source;
        self
    }

    /// Replace every setting at once.
    pub fn config(mut self, config: ClassifierConfig) -> Self {
        self.config = config;
        self
    }

    pub fn thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.config.thresholds = thresholds;
        self
    }

    pub fn context_window(mut self, chars: usize) -> Self {
        self.config.context_window = chars;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn regex_size_limit(mut self, bytes: usize) -> Self {
        self.config.regex_size_limit = bytes;
        self
    }

    pub fn batch_parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.batch_parallel_threshold = threshold;
        self
    }

    /// Providers walked for [`KeywordSource::AutoDetect`].
    pub fn detect_chain(mut self, chain: DetectChain) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn build(self) -> Result<WeightedClassifier> {
        let config = self.config;
        let loader = match self.chain {
            Some(chain) => KeywordsLoader::with_chain(chain),
            None => KeywordsLoader::new(),
        };

        let (tables, mut report) = loader.load(&self.source)?;
        info!(
            origin = %report.origin,
            subcategories = tables.keywords.len(),
            "Keyword source loaded"
        );

        let options = CompileOptions { size_limit: config.regex_size_limit };
        let compiled = CompiledPatterns::compile(&tables.keywords, &options, &mut report);

        if !config.thresholds.is_monotonic() {
            warn!(thresholds = ?config.thresholds, "Confidence thresholds are not non-decreasing");
        }
        if config.debug {
            debug!(summary = ?tables.summary(), "Keywords summary");
        }

        Ok(WeightedClassifier {
            tables,
            compiled,
            report,
            thresholds: config.thresholds,
            context_window: config.context_window,
            debug: config.debug,
            #[cfg(feature = "parallel")]
            batch_parallel_threshold: config.batch_parallel_threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexora_patterns::PatternEntrySource;

    fn judicial_property() -> KeywordSource {
        KeywordSource::in_memory(
            [
                ("sc1", vec!["justice", "judgment", "plaintiff"]),
                ("sc2", vec!["sale deed"]),
            ],
            [("Judicial", vec!["sc1"]), ("Property", vec!["sc2"])],
        )
    }

    fn classifier() -> WeightedClassifier {
        WeightedClassifier::builder()
            .source(judicial_property())
            .detect_chain(DetectChain::empty())
            .build()
            .unwrap()
    }

    #[test]
    fn test_classifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WeightedClassifier>();
    }

    #[test]
    fn test_basic_classification() {
        let result =
            classifier().classify("Hon'ble Justice delivered judgment. The plaintiff filed suit.");
        assert_eq!(result.label, "Judicial");
        assert_eq!(result.matched_patterns.len(), 3);
        assert!(result.matched_patterns.iter().all(|m| m.category == "Judicial"));
        assert_eq!(result.summary.primary_label, "Judicial");
        assert!(result.processing_metadata.error.is_none());
    }

    #[test]
    fn test_empty_input() {
        let c = classifier();
        let result = c.classify("");
        assert_eq!(result.label, UNCLASSIFIED);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, ConfidenceLevel::VeryLow);
        assert!(result.matched_patterns.is_empty());
        assert!(result.category_scores.is_empty());
        assert_eq!(
            result.processing_metadata.error.as_deref(),
            Some("Empty or invalid input text")
        );
        assert_eq!(result.processing_metadata.total_patterns_checked, c.compiled_pattern_count());
    }

    #[test]
    fn test_invalid_utf8_bytes() {
        let c = classifier();
        let result = c.classify_bytes(&[0x66, 0xff, 0xfe], DocumentMetadata::new());
        assert_eq!(result.label, UNCLASSIFIED);
        assert_eq!(
            result.processing_metadata.error.as_deref(),
            Some("Input is not valid UTF-8 text")
        );

        let result = c.classify_bytes("sale deed".as_bytes(), DocumentMetadata::new());
        assert_eq!(result.label, "Property");
    }

    #[test]
    fn test_metadata_passthrough() {
        let mut metadata = DocumentMetadata::new();
        metadata.insert("file_name".to_string(), serde_json::json!("deed.pdf"));
        metadata.insert("pages".to_string(), serde_json::json!(3));
        let result = classifier().classify_with_metadata("sale deed", metadata.clone());
        assert_eq!(result.processing_metadata.document_metadata, metadata);
    }

    #[test]
    fn test_builder_settings() {
        let c = WeightedClassifier::builder()
            .source(judicial_property())
            .thresholds(ConfidenceThresholds::new(0.0, 0.5, 2.0, 5.0))
            .context_window(4)
            .debug(true)
            .build()
            .unwrap();
        assert_eq!(c.thresholds().high, 5.0);
        assert_eq!(c.context_window(), 4);

        let result = c.classify("The plaintiff appeared.");
        assert_eq!(result.confidence, ConfidenceLevel::Low);
        assert_eq!(result.matched_patterns[0].context_snippets[0], "The plaintiff app");
    }

    #[test]
    fn test_load_report_and_summary() {
        let source = KeywordSource::in_memory(
            [(
                "sc",
                vec![
                    PatternEntrySource::from("decree"),
                    PatternEntrySource::extended("", 1.0, false),
                    PatternEntrySource::regex("(broken", 2.0),
                ],
            )],
            [("Judicial", vec!["sc", "ghost"])],
        );
        let c = WeightedClassifier::new(source, &ClassifierConfig::default()).unwrap();
        assert_eq!(c.compiled_pattern_count(), 1);
        assert_eq!(c.load_report().warnings.len(), 3);
        assert_eq!(c.keywords_summary().total_keywords, 2);
        assert_eq!(c.category_mapping().len(), 1);
    }

    #[test]
    fn test_from_config_with_missing_file() {
        let config = ClassifierConfig {
            keywords_path: Some("/nonexistent/legal_keywords.json".into()),
            ..Default::default()
        };
        assert!(matches!(
            WeightedClassifier::from_config(&config),
            Err(lexora_common::ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_default_config_reads_debug_flag() {
        assert!(default_config(|var| (var == "CLASSIFIER_DEBUG").then(|| "on".to_string())).debug);
        assert!(!default_config(|var| (var == "CLASSIFIER_DEBUG").then(|| "0".to_string())).debug);

        let config = default_config(|_| None);
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_zero_threshold_batch_matches_single_calls() {
        let c = WeightedClassifier::builder()
            .source(judicial_property())
            .batch_parallel_threshold(0)
            .build()
            .unwrap();
        let texts: Vec<String> = (0..25).map(|i| format!("plaintiff {i} and sale deed")).collect();
        let batch = c.classify_batch(&texts);
        assert_eq!(batch.len(), 25);
        for (text, result) in texts.iter().zip(&batch) {
            assert_eq!(result.matched_patterns, c.classify(text).matched_patterns);
        }
    }

    #[test]
    fn test_batch_matches_single_calls() {
        let c = WeightedClassifier::builder()
            .source(judicial_property())
            .batch_parallel_threshold(2)
            .build()
            .unwrap();
        let texts = vec!["plaintiff", "sale deed", "", "justice and judgment", "nothing"];
        let batch = c.classify_batch(&texts);
        assert_eq!(batch.len(), texts.len());
        for (text, result) in texts.iter().zip(&batch) {
            let single = c.classify(text);
            assert_eq!(result.label, single.label);
            assert_eq!(result.score, single.score);
            assert_eq!(result.matched_patterns, single.matched_patterns);
        }
    }
}
