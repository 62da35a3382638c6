use std::time::{Duration, Instant};

use log::{debug, warn};
use spanmark_dom::{Document, DomError, NodeId, TextSpan};

use crate::matcher::{MatchRecord, SearchResults};
use crate::pattern::{CompiledPattern, SearchConfig, compile_patterns};
use crate::scanner::{IgnoredTags, scan_text_nodes};

/// Default cap on the number of matches a single scan produces.
pub const DEFAULT_MAX_HIGHLIGHTS: usize = 1000;

/// Scans slower than this are reported in debug builds.
pub const SLOW_SEARCH_THRESHOLD_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct FindOptions {
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub max_matches: usize,
    pub ignored_tags: IgnoredTags,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            whole_word: false,
            max_matches: DEFAULT_MAX_HIGHLIGHTS,
            ignored_tags: IgnoredTags::default(),
        }
    }
}

impl FindOptions {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
        }
    }
}

/// Finds every occurrence of `terms` under `root`.
///
/// Terms are compiled fresh on each call. A missing root yields no matches.
pub fn find_text_matches<S: AsRef<str>>(
    document: &Document,
    root: Option<NodeId>,
    terms: &[S],
    options: &FindOptions,
) -> SearchResults {
    let started = Instant::now();
    let Some(root) = root else {
        return SearchResults::new();
    };

    let patterns = compile_patterns(terms, options.search_config());
    let results = find_matches(
        document,
        root,
        &patterns,
        &options.ignored_tags,
        options.max_matches,
    );

    log_slow_search(started.elapsed(), results.count(), terms.len());
    results
}

/// Applies already compiled patterns to the text under `root`.
///
/// Patterns run one after another in the given order, each walking the tree
/// from the start. The match count is shared across patterns and the scan
/// stops as soon as it reaches `max_matches`.
pub fn find_matches(
    document: &Document,
    root: NodeId,
    patterns: &[CompiledPattern],
    ignored: &IgnoredTags,
    max_matches: usize,
) -> SearchResults {
    collect_matches(document, root, patterns, ignored, max_matches, |node, start, end| {
        document.create_span(node, start, end)
    })
}

fn collect_matches<F>(
    document: &Document,
    root: NodeId,
    patterns: &[CompiledPattern],
    ignored: &IgnoredTags,
    max_matches: usize,
    create_span: F,
) -> SearchResults
where
    F: Fn(NodeId, usize, usize) -> Result<TextSpan, DomError>,
{
    if patterns.is_empty() {
        return SearchResults::new();
    }

    let mut matches = Vec::new();

    'patterns: for pattern in patterns {
        for (node, text) in scan_text_nodes(document, root, ignored) {
            if matches.len() >= max_matches {
                break 'patterns;
            }

            for found in pattern.regex().find_iter(text) {
                if matches.len() >= max_matches {
                    break 'patterns;
                }

                let span = match create_span(node, found.start(), found.end()) {
                    Ok(span) => span,
                    Err(error) => {
                        debug!("Skipping match in {}: {}", node, error);
                        continue;
                    }
                };

                matches.push(MatchRecord {
                    text: found.as_str().to_string(),
                    span,
                    index: matches.len(),
                    search_term: pattern.term().to_string(),
                });
            }
        }
    }

    debug!(
        "Found {} matches for {} patterns under {}",
        matches.len(),
        patterns.len(),
        root
    );
    SearchResults::from_matches(matches)
}

fn log_slow_search(duration: Duration, match_count: usize, term_count: usize) {
    if !cfg!(debug_assertions) {
        return;
    }

    if duration > Duration::from_millis(SLOW_SEARCH_THRESHOLD_MS) {
        warn!(
            "Slow search detected: {:.2}ms for {} matches across {} terms",
            duration.as_secs_f64() * 1000.0,
            match_count,
            term_count
        );
    }
}
