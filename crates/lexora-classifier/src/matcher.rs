//! Match Engine: runs every compiled pattern over a text.

use lexora_patterns::{CategoryMapping, CompiledPattern, CompiledPatterns};

use crate::verdict::MatchedPattern;

/// Scan `text` with every compiled pattern of every mapped subcategory.
///
/// Output follows subcategory table order, then entry order. Patterns with
/// no match are left out.
pub fn scan(
    compiled: &CompiledPatterns,
    mapping: &CategoryMapping,
    text: &str,
    context_window: usize,
) -> Vec<MatchedPattern> {
    let candidates = compiled.candidates(text);
    let mut matched = Vec::new();

    for subcategory in compiled.subcategories() {
        let Some(category) = mapping.category_of(&subcategory.name) else {
            continue;
        };

        for pattern in &subcategory.patterns {
            if !candidates.admits(pattern) {
                continue;
            }
            let name = subcategory.name.as_str();
            if let Some(m) = match_pattern(pattern, category, name, text, context_window) {
                matched.push(m);
            }
        }
    }

    matched
}

fn match_pattern(
    pattern: &CompiledPattern,
    category: &str,
    subcategory: &str,
    text: &str,
    context_window: usize,
) -> Option<MatchedPattern> {
    let mut positions = Vec::new();
    let mut context_snippets = Vec::new();

    for m in pattern.regex.find_iter(text) {
        positions.push(m.start());
        context_snippets.push(snippet(text, m.start(), m.end(), context_window));
    }

    if positions.is_empty() {
        return None;
    }

    let entry = &pattern.entry;
    let frequency = positions.len();
    Some(MatchedPattern {
        keyword: entry.pattern.clone(),
        category: category.to_string(),
        subcategory: subcategory.to_string(),
        frequency,
        weight: entry.weight,
        weighted_score: frequency as f64 * entry.weight,
        positions,
        context_snippets,
        is_regex: entry.is_regex,
        pattern_type: entry.pattern_type().to_string(),
    })
}

/// `window` characters either side of `start..end`, line breaks flattened to spaces.
pub fn snippet(text: &str, start: usize, end: usize, window: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(i, _)| end + i);

    text[from..to].replace(&['\n', '\r'][..], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexora_patterns::{CompileOptions, KeywordSource, KeywordsLoader, DetectChain};

    fn compiled(source: KeywordSource) -> (CompiledPatterns, CategoryMapping) {
        let loader = KeywordsLoader::with_chain(DetectChain::empty());
        let (tables, mut report) = loader.load(&source).unwrap();
        let options = CompileOptions::default();
        let compiled = CompiledPatterns::compile(&tables.keywords, &options, &mut report);
        (compiled, tables.category_mapping)
    }

    #[test]
    fn test_snippet_window() {
        let text = "0123456789KEY0123456789";
        assert_eq!(snippet(text, 10, 13, 3), "789KEY012");
        assert_eq!(snippet(text, 10, 13, 100), text);
        assert_eq!(snippet(text, 10, 13, 0), "KEY");
    }

    #[test]
    fn test_snippet_counts_characters() {
        let text = "ééé\nKEY\rüüü";
        let start = text.find("KEY").unwrap();
        assert_eq!(snippet(text, start, start + 3, 2), "é KEY ü");
    }

    #[test]
    fn test_scan_frequency_positions() {
        let (compiled, mapping) = compiled(KeywordSource::in_memory(
            [("sc1", vec!["decree"])],
            [("Judicial", vec!["sc1"])],
        ));
        let text = "Decree passed. The decree holder executed the DECREE.";
        let matched = scan(&compiled, &mapping, text, 100);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].frequency, 3);
        assert_eq!(matched[0].weighted_score, 3.0);
        assert_eq!(matched[0].positions, vec![0, 19, 46]);
        assert!(text[matched[0].positions[2]..].starts_with("DECREE"));
    }

    #[test]
    fn test_unmapped_subcategory_not_scanned() {
        let (compiled, mapping) = compiled(KeywordSource::in_memory(
            [("mapped", vec!["bail"]), ("orphan", vec!["bail"])],
            [("Criminal", vec!["mapped"])],
        ));
        let matched = scan(&compiled, &mapping, "bail granted", 10);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].subcategory, "mapped");
    }

    #[test]
    fn test_shared_subcategory_attributed_to_first_category() {
        let (compiled, mapping) = compiled(KeywordSource::in_memory(
            [("shared", vec!["notice"])],
            [("First", vec!["shared"]), ("Second", vec!["shared"])],
        ));
        let matched = scan(&compiled, &mapping, "legal notice", 10);
        assert_eq!(matched[0].category, "First");
    }

    #[test]
    fn test_non_ascii_text_matches_same_as_ascii() {
        let (compiled, mapping) = compiled(KeywordSource::in_memory(
            [("sc", vec!["sale deed"])],
            [("Property", vec!["sc"])],
        ));
        let ascii = scan(&compiled, &mapping, "the sale deed", 5);
        let unicode = scan(&compiled, &mapping, "the sale deed विक्रय", 5);
        assert_eq!(ascii[0].frequency, unicode[0].frequency);
        assert_eq!(ascii[0].positions, unicode[0].positions);
    }
}
