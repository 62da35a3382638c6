//! Text search over a Spanmark document: term compilation, text node
//! scanning and match collection.

mod engine;
mod matcher;
mod pattern;
mod scanner;

pub use engine::{
    DEFAULT_MAX_HIGHLIGHTS, FindOptions, SLOW_SEARCH_THRESHOLD_MS, find_matches,
    find_text_matches,
};
pub use matcher::{MatchRecord, SearchResults};
pub use pattern::{
    CompiledPattern, PatternError, SearchConfig, compile_patterns, normalize_search_terms,
};
pub use scanner::{IGNORED_TAG_NAMES, IgnoredTags, scan_text_nodes};
