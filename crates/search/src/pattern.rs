use log::warn;
use regex::{Regex, RegexBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchConfig {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("empty or whitespace-only search term")]
    Empty,

    #[error("search term {0:?} would match an empty string")]
    MatchesEmpty(String),

    #[error("invalid search pattern: {0}")]
    Regex(#[from] regex::Error),
}

/// A search term together with the matcher built for it.
///
/// The matcher never matches a zero-length string, so scanning a text with
/// repeated `find_iter` always advances.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    term: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn compile(term: &str, config: SearchConfig) -> Result<Self, PatternError> {
        if term.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let escaped = regex::escape(term);
        let pattern = if config.whole_word {
            format!(r"\b{escaped}\b")
        } else {
            escaped
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!config.case_sensitive)
            .build()?;

        if regex.is_match("") {
            return Err(PatternError::MatchesEmpty(term.to_string()));
        }

        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compiles every usable term, preserving input order.
///
/// Blank terms are skipped silently; terms that fail to compile are logged
/// and dropped.
pub fn compile_patterns<S: AsRef<str>>(terms: &[S], config: SearchConfig) -> Vec<CompiledPattern> {
    terms
        .iter()
        .map(AsRef::as_ref)
        .filter(|term| !term.trim().is_empty())
        .filter_map(|term| match CompiledPattern::compile(term, config) {
            Ok(pattern) => Some(pattern),
            Err(error) => {
                warn!("Ignoring invalid search term {:?}: {}", term, error);
                None
            }
        })
        .collect()
}

/// Drops blank entries from a list of search terms.
pub fn normalize_search_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(AsRef::as_ref)
        .filter(|term| !term.trim().is_empty())
        .map(str::to_string)
        .collect()
}
