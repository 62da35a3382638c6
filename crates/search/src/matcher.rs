use spanmark_dom::TextSpan;

/// One occurrence of a search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// The matched text as it appears in the document.
    pub text: String,
    pub span: TextSpan,
    /// Position in the scan, counted across all terms.
    pub index: usize,
    pub search_term: String,
}

/// Matches from one scan, grouped by term in the order the terms were given.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    matches: Vec<MatchRecord>,
}

impl SearchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_matches(matches: Vec<MatchRecord>) -> Self {
        Self { matches }
    }

    pub fn count(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn spans(&self) -> Vec<TextSpan> {
        self.matches.iter().map(|m| m.span).collect()
    }

    pub fn into_spans(self) -> Vec<TextSpan> {
        self.matches.into_iter().map(|m| m.span).collect()
    }

    pub fn into_matches(self) -> Vec<MatchRecord> {
        self.matches
    }
}
