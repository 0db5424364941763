//! Canonical keyword tables.
//!
//! Both tables keep insertion order: subcategory order fixes the order of
//! matched patterns, category order fixes tie-breaks between categories.

use serde::Serialize;

use crate::entry::PatternEntry;
use lexora_common::PatternWarning;

/// Subcategory name -> ordered pattern entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubcategoryTable {
    entries: Vec<(String, Vec<PatternEntry>)>,
}

impl SubcategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a subcategory. A repeated name replaces the earlier entries
    /// but keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, patterns: Vec<PatternEntry>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = patterns,
            None => self.entries.push((name, patterns)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[PatternEntry]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PatternEntry])> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_patterns(&self) -> usize {
        self.entries.iter().map(|(_, p)| p.len()).sum()
    }
}

/// Category name -> subcategory names, in declared order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryMapping {
    categories: Vec<(String, Vec<String>)>,
}

impl CategoryMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, subcategories: Vec<String>) {
        let category = category.into();
        match self.categories.iter_mut().find(|(c, _)| *c == category) {
            Some(slot) => slot.1 = subcategories,
            None => self.categories.push((category, subcategories)),
        }
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, s)| s.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories.iter().map(|(c, s)| (c.as_str(), s.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(c, _)| c.as_str())
    }

    /// First category (in declared order) listing `subcategory`.
    pub fn category_of(&self, subcategory: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|(_, subs)| subs.iter().any(|s| s == subcategory))
            .map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// A loaded keyword source: patterns per subcategory plus the category mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordTables {
    pub keywords: SubcategoryTable,
    pub category_mapping: CategoryMapping,
}

/// Summary statistics over a keyword source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordsSummary {
    pub total_keywords: usize,
    pub total_subcategories: usize,
    pub total_categories: usize,
    pub regex_patterns: usize,
    pub string_patterns: usize,
    pub average_weight: f64,
    pub weight_range: [f64; 2],
}

impl KeywordTables {
    pub fn new(keywords: SubcategoryTable, category_mapping: CategoryMapping) -> Self {
        Self { keywords, category_mapping }
    }

    /// Cross-reference warnings: mapped subcategories missing from the
    /// keyword table, and keyword subcategories no category lists.
    pub fn reference_warnings(&self) -> Vec<PatternWarning> {
        let mut warnings = Vec::new();

        for (category, subcategories) in self.category_mapping.iter() {
            for subcategory in subcategories {
                if !self.keywords.contains(subcategory) {
                    warnings.push(PatternWarning::DanglingSubcategory {
                        category: category.to_string(),
                        subcategory: subcategory.clone(),
                    });
                }
            }
        }

        for (subcategory, _) in self.keywords.iter() {
            if self.category_mapping.category_of(subcategory).is_none() {
                warnings.push(PatternWarning::UnmappedSubcategory {
                    subcategory: subcategory.to_string(),
                });
            }
        }

        warnings
    }

    pub fn summary(&self) -> KeywordsSummary {
        let weights: Vec<f64> = self
            .keywords
            .iter()
            .flat_map(|(_, entries)| entries.iter().map(|e| e.weight))
            .collect();
        let regex_patterns = self
            .keywords
            .iter()
            .flat_map(|(_, entries)| entries.iter())
            .filter(|e| e.is_regex)
            .count();
        let total_keywords = weights.len();

        let (average_weight, weight_range) = if weights.is_empty() {
            (0.0, [0.0, 0.0])
        } else {
            let avg = weights.iter().sum::<f64>() / weights.len() as f64;
            let min = weights.iter().copied().fold(f64::INFINITY, f64::min);
            let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            ((avg * 100.0).round() / 100.0, [min, max])
        };

        KeywordsSummary {
            total_keywords,
            total_subcategories: self.keywords.len(),
            total_categories: self.category_mapping.len(),
            regex_patterns,
            string_patterns: total_keywords - regex_patterns,
            average_weight,
            weight_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(pattern: &str, weight: f64, is_regex: bool) -> PatternEntry {
        PatternEntry { pattern: pattern.to_string(), weight, is_regex }
    }

    fn sample() -> KeywordTables {
        let mut keywords = SubcategoryTable::new();
        keywords.insert(
            "judgments",
            vec![entry("judgment", 1.0, false), entry(r"hon'?ble", 3.0, true)],
        );
        keywords.insert("orphans", vec![entry("stray", 2.0, false)]);

        let mut mapping = CategoryMapping::new();
        mapping.insert("Judicial", vec!["judgments".to_string(), "missing".to_string()]);
        mapping.insert("Appellate", vec!["judgments".to_string()]);

        KeywordTables::new(keywords, mapping)
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut table = SubcategoryTable::new();
        table.insert("b", vec![]);
        table.insert("a", vec![]);
        table.insert("b", vec![entry("x", 1.0, false)]);
        let names: Vec<&str> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(table.get("b").map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_category_of_is_first_listing() {
        let tables = sample();
        assert_eq!(tables.category_mapping.category_of("judgments"), Some("Judicial"));
        assert_eq!(tables.category_mapping.category_of("orphans"), None);
    }

    #[test]
    fn test_reference_warnings() {
        let warnings = sample().reference_warnings();
        assert_eq!(
            warnings,
            vec![
                PatternWarning::DanglingSubcategory {
                    category: "Judicial".to_string(),
                    subcategory: "missing".to_string(),
                },
                PatternWarning::UnmappedSubcategory { subcategory: "orphans".to_string() },
            ]
        );
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.total_keywords, 3);
        assert_eq!(summary.total_subcategories, 2);
        assert_eq!(summary.total_categories, 2);
        assert_eq!(summary.regex_patterns, 1);
        assert_eq!(summary.string_patterns, 2);
        assert_eq!(summary.average_weight, 2.0);
        assert_eq!(summary.weight_range, [1.0, 3.0]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = KeywordTables::default().summary();
        assert_eq!(summary.total_keywords, 0);
        assert_eq!(summary.average_weight, 0.0);
        assert_eq!(summary.weight_range, [0.0, 0.0]);
    }
}
