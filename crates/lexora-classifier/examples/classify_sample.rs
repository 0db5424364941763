//! Example: classify a sample judgment, or any text file given as the first argument.
//!
//! ```bash
//! CLASSIFIER_DEBUG=1 cargo run -p lexora-classifier --example classify_sample -- judgment.txt
//! ```

use lexora_classifier::{ClassifierConfig, WeightedClassifier};
use lexora_common::telemetry::init_tracing;

const SAMPLE: &str = "Hon'ble Justice Smith delivered this judgment in Civil Appeal No. 123/2024. \
The appellant filed a writ petition under Article 226 of the Constitution of India. \
Accordingly, this appeal is allowed and the impugned order is set aside.";

fn main() -> anyhow::Result<()> {
    let config = ClassifierConfig::load()?;
    init_tracing(config.debug);

    let classifier = WeightedClassifier::from_config(&config)?;
    let summary = classifier.keywords_summary();
    println!(
        "Loaded {} keywords in {} subcategories from {}",
        summary.total_keywords,
        summary.total_subcategories,
        classifier.load_report().origin
    );

    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)?,
        None => SAMPLE.to_string(),
    };

    let mut metadata = lexora_classifier::DocumentMetadata::new();
    metadata.insert("source".to_string(), serde_json::json!("classify_sample"));

    let result = classifier.classify_with_metadata(&text, metadata);
    println!("{} ({}, score {:.3})", result.label, result.confidence, result.score);
    println!("Top keywords: {}", result.summary.top_keywords.join(", "));
    println!("{}", classifier.export(&result).to_json_pretty()?);

    Ok(())
}
