//! End-to-end classification behaviour over small in-memory and on-disk
//! keyword sources.

use lexora_classifier::{
    ClassifierConfig, ConfidenceLevel, DetectChain, KeywordSource, PatternEntrySource, Verdict,
    WeightedClassifier, UNCLASSIFIED,
};
use lexora_test_utils::pretty_assertions::assert_eq;
use lexora_test_utils::{
    scenario_json, scenario_source, tied_source, weighted_source, write_keywords_file,
    write_keywords_json, SCENARIO_TEXT,
};

fn classifier(source: KeywordSource) -> WeightedClassifier {
    WeightedClassifier::builder()
        .source(source)
        .detect_chain(DetectChain::empty())
        .build()
        .expect("keyword source should load")
}

#[test]
fn test_scenario_judicial_only() {
    let result = classifier(scenario_source()).classify(SCENARIO_TEXT);

    assert_eq!(result.label, "Judicial");
    assert_eq!(result.matched_patterns.len(), 3);
    assert!(result.matched_patterns.iter().all(|m| m.category == "Judicial"));

    let keywords: Vec<&str> = result.matched_patterns.iter().map(|m| m.keyword.as_str()).collect();
    assert_eq!(keywords, vec!["justice", "judgment", "plaintiff"]);

    let justice = &result.matched_patterns[0];
    assert!(SCENARIO_TEXT[justice.positions[0]..].starts_with("Justice"));
    assert_eq!(justice.context_snippets[0], SCENARIO_TEXT);

    assert_eq!(result.category_scores.get("Property"), Some(0.0));
    assert_eq!(result.diversity_scores.get("Judicial"), Some(1.0));
    // 0.6 * 3 / 1 + 0.4 * 1
    assert!((result.score - 2.2).abs() < 1e-9);
    assert_eq!(result.confidence, ConfidenceLevel::High);
    assert_eq!(result.text_length, SCENARIO_TEXT.chars().count());
    assert!(result.is_classified());
}

#[test]
fn test_weighted_score_is_frequency_times_weight() {
    let c = classifier(weighted_source());
    let result = c.classify(
        "Bail refused. Anticipatory   bail granted; the bail bond and the First Information Report.",
    );

    for m in &result.matched_patterns {
        assert_eq!(m.weighted_score, m.frequency as f64 * m.weight);
    }

    let bail = result.matched_patterns.iter().find(|m| m.keyword == "bail").unwrap();
    assert_eq!(bail.frequency, 3);
    let regex = result.matched_patterns.iter().find(|m| m.is_regex).unwrap();
    assert_eq!(regex.frequency, 1);
    assert_eq!(regex.weighted_score, 3.0);
    assert_eq!(regex.pattern_type, "regex");
    let fir = result
        .matched_patterns
        .iter()
        .find(|m| m.keyword == "first information report")
        .unwrap();
    assert_eq!(fir.weighted_score, 2.0);
    assert_eq!(result.total_matches, 5);
    assert_eq!(result.total_weighted_score, 8.0);
}

#[test]
fn test_empty_input_is_unclassified() {
    let c = classifier(scenario_source());
    let verdict = c.export(&c.classify(""));
    let result = &verdict.result;

    assert_eq!(result.label, UNCLASSIFIED);
    assert_eq!(result.score, 0.0);
    assert_eq!(result.confidence, ConfidenceLevel::VeryLow);
    assert!(result.matched_patterns.is_empty());
    assert_eq!(result.summary.primary_label, UNCLASSIFIED);
    assert!(result.summary.top_keywords.is_empty());
    assert_eq!(verdict.statistics.text_coverage_ratio, 0.0);

    let value: serde_json::Value = serde_json::from_str(&verdict.to_json().unwrap()).unwrap();
    for key in ["label", "score", "confidence", "matched_patterns", "category_scores", "summary"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["category_scores"], serde_json::json!({}));
    assert_eq!(value["processing_metadata"]["error"], "Empty or invalid input text");
}

#[test]
fn test_text_without_keywords_is_unclassified() {
    let result = classifier(scenario_source()).classify("Nothing of interest here.");
    assert_eq!(result.label, UNCLASSIFIED);
    assert_eq!(result.confidence, ConfidenceLevel::VeryLow);
    assert_eq!(result.category_scores.len(), 2);
    assert!(result.processing_metadata.error.is_none());
    assert!(!result.is_classified());
}

#[test]
fn test_exact_tie_goes_to_first_category() {
    let text = "A summons and a warrant were issued.";

    let result = classifier(tied_source("Zeta", "Alpha")).classify(text);
    assert_eq!(result.category_scores.get("Zeta"), result.category_scores.get("Alpha"));
    assert_eq!(result.label, "Zeta");

    let result = classifier(tied_source("Alpha", "Zeta")).classify(text);
    assert_eq!(result.label, "Alpha");
}

#[test]
fn test_empty_pattern_dropped_silently() {
    let source = KeywordSource::in_memory(
        [(
            "sc1",
            vec![
                PatternEntrySource::from("justice"),
                PatternEntrySource::Extended {
                    pattern: Some(String::new()),
                    weight: None,
                    is_regex: None,
                },
            ],
        )],
        [("Judicial", vec!["sc1"])],
    );
    let c = classifier(source);
    assert_eq!(c.compiled_pattern_count(), 1);
    assert_eq!(c.load_report().dropped_entries(), 1);
    assert_eq!(c.classify("justice").label, "Judicial");
}

#[test]
fn test_export_roundtrip() {
    let c = classifier(scenario_source());
    let result = c.classify(SCENARIO_TEXT);
    let json = c.export(&result).to_json_pretty().unwrap();
    let parsed = Verdict::from_json(&json).unwrap();

    assert_eq!(parsed.result.label, result.label);
    assert_eq!(parsed.result.score, result.score);
    assert_eq!(parsed.result.confidence, result.confidence);
    assert_eq!(parsed.result.matched_patterns, result.matched_patterns);
    assert_eq!(parsed.result, result);
}

#[test]
fn test_repeated_calls_identical_except_timestamp() {
    let c = classifier(scenario_source());
    let first = c.classify(SCENARIO_TEXT);
    let mut second = c.classify(SCENARIO_TEXT);
    second.processing_metadata.timestamp = first.processing_metadata.timestamp;
    assert_eq!(first, second);
}

#[test]
fn test_json_and_yaml_files_load_identically() {
    let json_file = write_keywords_json(&scenario_json()).unwrap();
    let yaml = "\
keywords:
  sc1:
    - justice
    - judgment
    - pattern: plaintiff
      weight: 1.0
  sc2:
    - sale deed
category_mapping:
  Judicial: [sc1]
  Property: [sc2]
";
    let yaml_file = write_keywords_file("legal_keywords.yaml", yaml).unwrap();

    let from_json = classifier(KeywordSource::file(&json_file.path)).classify(SCENARIO_TEXT);
    let from_yaml = classifier(KeywordSource::file(&yaml_file.path)).classify(SCENARIO_TEXT);
    let from_memory = classifier(scenario_source()).classify(SCENARIO_TEXT);

    assert_eq!(from_json.matched_patterns, from_memory.matched_patterns);
    assert_eq!(from_yaml.matched_patterns, from_memory.matched_patterns);
    assert_eq!(from_json.category_scores, from_memory.category_scores);
}

#[test]
fn test_malformed_file_fails_construction() {
    let content = r#"{"keywords": {"sc1": ["justice"]}}"#;
    let file = write_keywords_file("legal_keywords.json", content).unwrap();
    let source = KeywordSource::file(&file.path);
    let err = WeightedClassifier::new(source, &ClassifierConfig::default()).unwrap_err();
    assert!(err.to_string().contains("category_mapping"));
}

#[test]
fn test_from_config_uses_keywords_path() {
    let file = write_keywords_json(&scenario_json()).unwrap();
    let config = ClassifierConfig {
        keywords_path: Some(file.path.clone()),
        context_window: 8,
        ..Default::default()
    };
    let c = WeightedClassifier::from_config(&config).unwrap();
    let result = c.classify(SCENARIO_TEXT);
    assert_eq!(result.label, "Judicial");
    assert_eq!(result.matched_patterns[0].context_snippets[0], "Hon'ble Justice deliver");
}

#[test]
fn test_auto_detect_chain_order() {
    let first = write_keywords_json(&scenario_json()).unwrap();
    let chain = DetectChain::empty()
        .push_file("absent", first.dir.path().join("missing.json"))
        .push_file("present", &first.path);
    let c = WeightedClassifier::builder().detect_chain(chain).build().unwrap();
    assert_eq!(c.load_report().origin, first.path.display().to_string());
    assert_eq!(c.compiled_pattern_count(), 4);
}

#[test]
fn test_auto_detect_nothing_found() {
    let err = WeightedClassifier::builder()
        .detect_chain(DetectChain::empty().push("nowhere", || None))
        .build()
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("nowhere"));
    assert!(message.contains("legal_keywords.json"));
}
