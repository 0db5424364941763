//! Shared fixtures for Lexora tests: keyword tables, sample documents and
//! temporary keyword files.

use std::path::PathBuf;

use lexora_patterns::{KeywordSource, PatternEntrySource};
use serde_json::{json, Value};
use tempfile::TempDir;

pub use pretty_assertions;

/// Text of the two-category scenario: three Judicial keywords, no Property ones.
pub const SCENARIO_TEXT: &str = "Hon'ble Justice delivered judgment. The plaintiff filed suit.";

pub const JUDICIAL_SAMPLE: &str = "
        Hon'ble Justice Smith delivered this judgment in Civil Appeal No. 123/2024.
        The appellant filed a writ petition under Article 226 of the Constitution of India.
        After hearing the learned counsel for both parties, this Court finds that the
        plaintiff has made out a prima facie case. The respondent's contentions are hereby rejected.
        The ratio decidendi of this case establishes that procedural fairness must be observed.
        Accordingly, this appeal is allowed and the impugned order dated 15.01.2024 is set aside.
        ";

pub const CONSTITUTIONAL_SAMPLE: &str = "
        The Constitution of India guarantees fundamental rights under Part III.
        Article 14 provides for equality before law and equal protection of laws.
        Parliament has enacted the Indian Contract Act under its legislative powers.
        Section 15 of the Act deals with coercion as defined in this statute.
        The Central Government issued notification No. 123/2024 in the Gazette of India.
        This amendment to the rules came into effect from the date of publication.
        ";

pub const PROPERTY_SAMPLE: &str = "
        This sale deed is executed between the vendor Ramesh Kumar and vendee Suresh Patel.
        The consideration amount of Rs. 50,00,000/- has been paid by the purchaser.
        The property bearing survey number 123/4 in Village Anand is hereby conveyed.
        Clear and marketable title is warranted by the vendor to the vendee.
        The original title deed and all property documents are handed over.
        Registration of this conveyance deed was completed at the Sub-Registrar office.
        ";

pub const NON_LEGAL_SAMPLE: &str = "This is just random text with no legal keywords.";

/// `{Judicial: sc1 [justice, judgment, plaintiff], Property: sc2 [sale deed]}`
pub fn scenario_source() -> KeywordSource {
    KeywordSource::in_memory(
        [
            ("sc1", vec!["justice", "judgment", "plaintiff"]),
            ("sc2", vec!["sale deed"]),
        ],
        [("Judicial", vec!["sc1"]), ("Property", vec!["sc2"])],
    )
}

/// Two categories whose keywords score identically for the same counts.
pub fn tied_source(first: &str, second: &str) -> KeywordSource {
    KeywordSource::in_memory(
        [("first_sc", vec!["summons"]), ("second_sc", vec!["warrant"])],
        [(first, vec!["first_sc"]), (second, vec!["second_sc"])],
    )
}

/// Mixed literal and weighted regex entries.
pub fn weighted_source() -> KeywordSource {
    KeywordSource::in_memory(
        [
            (
                "bail_documents",
                vec![
                    PatternEntrySource::from("bail"),
                    PatternEntrySource::regex(r"anticipatory\s+bail", 3.0),
                ],
            ),
            (
                "fir_documents",
                vec![PatternEntrySource::extended("first information report", 2.0, false)],
            ),
        ],
        [("Criminal", vec!["bail_documents", "fir_documents"])],
    )
}

/// Keyword document in the on-disk format for [`scenario_source`].
pub fn scenario_json() -> Value {
    json!({
        "keywords": {
            "sc1": ["justice", "judgment", {"pattern": "plaintiff", "weight": 1.0}],
            "sc2": ["sale deed"]
        },
        "category_mapping": {
            "Judicial": ["sc1"],
            "Property": ["sc2"]
        }
    })
}

/// A keyword file inside a temporary directory that lives as long as the value.
pub struct TempKeywordsFile {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Write `content` to `<tempdir>/<file_name>`.
pub fn write_keywords_file(file_name: &str, content: &str) -> std::io::Result<TempKeywordsFile> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(file_name);
    std::fs::write(&path, content)?;
    Ok(TempKeywordsFile { dir, path })
}

/// Serialize `value` as JSON into a temporary keyword file.
pub fn write_keywords_json(value: &Value) -> std::io::Result<TempKeywordsFile> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    write_keywords_file("legal_keywords.json", &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_keywords_json() {
        let file = write_keywords_json(&scenario_json()).unwrap();
        let content = std::fs::read_to_string(&file.path).unwrap();
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, scenario_json());
        assert!(file.path.starts_with(file.dir.path()));
    }
}
