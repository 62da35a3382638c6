//! Spanmark finds search terms in the text of a document subtree and
//! registers the matches as named highlight sets.
//!
//! ```no_run
//! use spanmark::{Document, HighlightController, HighlightOptions, shared};
//!
//! let (document, body) = Document::from_json(
//!     r#"{ "tag": "body", "children": [{ "tag": "p", "children": ["disk error"] }] }"#,
//! )
//! .unwrap();
//!
//! let controller = HighlightController::new(
//!     shared(document),
//!     Some(body),
//!     HighlightOptions::new(["error", "warning"]),
//! );
//! controller.on_highlight_change(|count| println!("{count} matches"));
//! controller.refresh();
//! ```

mod config;
mod controller;
mod error;
mod options;

pub use config::{ConfigWarning, DEFAULT_CONFIG, HighlightConfig, config_path};
pub use controller::{HighlightController, ScanToken};
pub use error::HighlightError;
pub use options::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_HIGHLIGHT_NAME, HighlightOptions, OptionsUpdate, Search,
};

pub use spanmark_dom::{Document, DomError, NodeId, SharedDocument, TextSpan, shared};
pub use spanmark_highlight::{
    HighlightBackend, HighlightRegistry, HighlightTable, InstanceId, SharedRegistry, Unsupported,
    global as global_registry, highlight_spans, install_global, is_highlighting_supported,
    register_highlight, unregister_highlight,
};
pub use spanmark_search::{
    DEFAULT_MAX_HIGHLIGHTS, FindOptions, IGNORED_TAG_NAMES, IgnoredTags, MatchRecord,
    SearchResults, find_text_matches,
};
