use spanmark_search::{DEFAULT_MAX_HIGHLIGHTS, FindOptions, IgnoredTags, normalize_search_terms};

pub const DEFAULT_HIGHLIGHT_NAME: &str = "highlight";

/// Delay before a scheduled scan runs.
pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// One search term or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Search {
    One(String),
    Many(Vec<String>),
}

impl Default for Search {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl Search {
    /// The non-blank terms, in order.
    pub fn terms(&self) -> Vec<String> {
        match self {
            Self::One(term) => normalize_search_terms(std::slice::from_ref(term)),
            Self::Many(terms) => normalize_search_terms(terms),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.terms().is_empty()
    }
}

impl From<&str> for Search {
    fn from(term: &str) -> Self {
        Self::One(term.to_string())
    }
}

impl From<String> for Search {
    fn from(term: String) -> Self {
        Self::One(term)
    }
}

impl From<Vec<String>> for Search {
    fn from(terms: Vec<String>) -> Self {
        Self::Many(terms)
    }
}

impl From<Vec<&str>> for Search {
    fn from(terms: Vec<&str>) -> Self {
        Self::Many(terms.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Search {
    fn from(terms: [&str; N]) -> Self {
        Self::Many(terms.iter().map(|term| term.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    pub search: Search,
    pub highlight_name: String,
    pub case_sensitive: bool,
    pub whole_word: bool,
    pub max_highlights: usize,
    /// Added to the built-in ignored tags, never replacing them.
    pub ignored_tags: Vec<String>,
    pub debounce_ms: u64,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            search: Search::default(),
            highlight_name: DEFAULT_HIGHLIGHT_NAME.to_string(),
            case_sensitive: false,
            whole_word: false,
            max_highlights: DEFAULT_MAX_HIGHLIGHTS,
            ignored_tags: Vec::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl HighlightOptions {
    pub fn new(search: impl Into<Search>) -> Self {
        Self {
            search: search.into(),
            ..Self::default()
        }
    }

    pub fn find_options(&self) -> FindOptions {
        FindOptions {
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            max_matches: self.max_highlights,
            ignored_tags: IgnoredTags::with_extra(&self.ignored_tags),
        }
    }

    /// Merges the fields set in `update`. A blank highlight name is ignored.
    pub fn apply(&mut self, update: OptionsUpdate) {
        if let Some(search) = update.search {
            self.search = search;
        }
        if let Some(name) = update.highlight_name
            && !name.trim().is_empty()
        {
            self.highlight_name = name.trim().to_string();
        }
        if let Some(case_sensitive) = update.case_sensitive {
            self.case_sensitive = case_sensitive;
        }
        if let Some(whole_word) = update.whole_word {
            self.whole_word = whole_word;
        }
        if let Some(max_highlights) = update.max_highlights {
            self.max_highlights = max_highlights;
        }
        if let Some(ignored_tags) = update.ignored_tags {
            self.ignored_tags = ignored_tags;
        }
        if let Some(debounce_ms) = update.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
    }
}

/// Partial options; unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionsUpdate {
    pub search: Option<Search>,
    pub highlight_name: Option<String>,
    pub case_sensitive: Option<bool>,
    pub whole_word: Option<bool>,
    pub max_highlights: Option<usize>,
    pub ignored_tags: Option<Vec<String>>,
    pub debounce_ms: Option<u64>,
}

impl OptionsUpdate {
    pub fn search(search: impl Into<Search>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    pub fn highlight_name(name: impl Into<String>) -> Self {
        Self {
            highlight_name: Some(name.into()),
            ..Self::default()
        }
    }
}
