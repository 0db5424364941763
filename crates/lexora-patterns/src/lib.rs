//! Keyword pattern tables for the Lexora classifier.
//!
//! Normalises heterogeneous keyword sources (embedded dictionary, JSON/YAML
//! files, in-memory tables) into one canonical table, then compiles every
//! entry into a matcher exactly once.

pub mod entry;
pub mod table;
pub mod loader;
pub mod detect;
pub mod compiler;

pub use compiler::{CompileOptions, CompiledPattern, CompiledPatterns, CompiledSubcategory};
pub use detect::{DetectChain, KeywordDocument};
pub use entry::{PatternEntry, PatternEntrySource};
pub use loader::{KeywordSource, KeywordsLoader, LoadReport};
pub use table::{CategoryMapping, KeywordTables, KeywordsSummary, SubcategoryTable};
