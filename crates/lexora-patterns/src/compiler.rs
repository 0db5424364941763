//! Pattern Compiler.
//!
//! Every entry is compiled once into a `regex::Regex`:
//! - literals become `\b<escaped>\b`, case-insensitive
//! - regex entries are used verbatim with case-insensitive + multi-line flags
//!
//! ASCII literals are additionally loaded into one Aho-Corasick automaton
//! used as a prefilter: a literal that does not occur as a substring cannot
//! match its whole-word regex, so that regex is never run.

use aho_corasick::{AhoCorasick, MatchKind};
use lexora_common::PatternWarning;
use regex::{Regex, RegexBuilder};
use tracing::{info, warn};

use crate::entry::PatternEntry;
use crate::loader::LoadReport;
use crate::table::SubcategoryTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Compiled program size limit per pattern, in bytes
    pub size_limit: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { size_limit: 10 * (1 << 20) }
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub entry: PatternEntry,
    /// Index into the literal prefilter, for ASCII literal entries
    literal_id: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CompiledSubcategory {
    pub name: String,
    pub patterns: Vec<CompiledPattern>,
}

/// All compiled matchers of one keyword table, in table order.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    subcategories: Vec<CompiledSubcategory>,
    prefilter: Option<AhoCorasick>,
    literal_count: usize,
}

/// Which prefiltered literals can match a given text.
#[derive(Debug, Clone)]
pub struct Candidates {
    present: Option<Vec<bool>>,
}

impl Candidates {
    /// `false` only when the pattern is known not to occur.
    pub fn admits(&self, pattern: &CompiledPattern) -> bool {
        match (&self.present, pattern.literal_id) {
            (Some(present), Some(id)) => present.get(id).copied().unwrap_or(true),
            _ => true,
        }
    }
}

/// Regex source for an entry.
pub fn pattern_source(entry: &PatternEntry) -> String {
    if entry.is_regex {
        entry.pattern.clone()
    } else {
        format!(r"\b{}\b", regex::escape(&entry.pattern))
    }
}

impl CompiledPatterns {
    /// Compile `table`. Entries that fail to compile are reported and skipped;
    /// subcategories left without a matcher are omitted.
    pub fn compile(
        table: &SubcategoryTable,
        options: &CompileOptions,
        report: &mut LoadReport,
    ) -> Self {
        let mut subcategories = Vec::with_capacity(table.len());
        let mut literals: Vec<&str> = Vec::new();

        for (name, entries) in table.iter() {
            let mut patterns = Vec::with_capacity(entries.len());

            for entry in entries {
                let built = RegexBuilder::new(&pattern_source(entry))
                    .case_insensitive(true)
                    .multi_line(true)
                    .size_limit(options.size_limit)
                    .build();

                match built {
                    Ok(regex) => {
                        let literal_id = if !entry.is_regex && entry.pattern.is_ascii() {
                            literals.push(&entry.pattern);
                            Some(literals.len() - 1)
                        } else {
                            None
                        };
                        patterns.push(CompiledPattern { regex, entry: entry.clone(), literal_id });
                    }
                    Err(e) => report.push(PatternWarning::InvalidRegex {
                        subcategory: name.to_string(),
                        pattern: entry.pattern.clone(),
                        reason: e.to_string(),
                    }),
                }
            }

            if !patterns.is_empty() {
                subcategories.push(CompiledSubcategory { name: name.to_string(), patterns });
            }
        }

        let literal_count = literals.len();
        let prefilter = if literals.is_empty() {
            None
        } else {
            match AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .match_kind(MatchKind::Standard)
                .build(&literals)
            {
                Ok(automaton) => Some(automaton),
                Err(e) => {
                    warn!(error = %e, "Literal prefilter unavailable, scanning every pattern");
                    None
                }
            }
        };

        let compiled = Self { subcategories, prefilter, literal_count };
        info!(
            patterns = compiled.total_patterns(),
            subcategories = compiled.subcategories.len(),
            "Compiled keyword patterns"
        );
        compiled
    }

    pub fn total_patterns(&self) -> usize {
        self.subcategories.iter().map(|s| s.patterns.len()).sum()
    }

    pub fn subcategories(&self) -> &[CompiledSubcategory] {
        &self.subcategories
    }

    pub fn get(&self, name: &str) -> Option<&CompiledSubcategory> {
        self.subcategories.iter().find(|s| s.name == name)
    }

    /// Run the literal prefilter over `text`.
    ///
    /// Only ASCII text is prefiltered: Unicode case folding can match
    /// non-ASCII characters against ASCII literals.
    pub fn candidates(&self, text: &str) -> Candidates {
        let present = match &self.prefilter {
            Some(automaton) if text.is_ascii() => {
                let mut present = vec![false; self.literal_count];
                for mat in automaton.find_overlapping_iter(text) {
                    present[mat.pattern().as_usize()] = true;
                }
                Some(present)
            }
            _ => None,
        };
        Candidates { present }
    }
}
