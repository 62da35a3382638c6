use std::collections::BTreeSet;

use spanmark_dom::{Document, NodeId};

/// Elements whose text content is never searched.
pub const IGNORED_TAG_NAMES: &[&str] = &["script", "style", "noscript", "iframe", "textarea"];

/// Tag names whose direct text children are skipped during a scan.
///
/// Always contains [`IGNORED_TAG_NAMES`]; extra tags only add to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredTags {
    tags: BTreeSet<String>,
}

impl Default for IgnoredTags {
    fn default() -> Self {
        Self {
            tags: IGNORED_TAG_NAMES.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

impl IgnoredTags {
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Self {
        let mut tags = Self::default();
        for tag in extra {
            tags.insert(tag.as_ref());
        }
        tags
    }

    pub fn insert(&mut self, tag: &str) {
        let tag = tag.trim().to_ascii_lowercase();
        if !tag.is_empty() {
            self.tags.insert(tag);
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(&tag.to_ascii_lowercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

/// Yields the searchable text nodes under `root` in document order.
///
/// A text node is searchable when its parent is an element whose tag is not
/// ignored and its data holds something other than whitespace. The walk is
/// rebuilt on every call.
pub fn scan_text_nodes<'a>(
    document: &'a Document,
    root: NodeId,
    ignored: &'a IgnoredTags,
) -> impl Iterator<Item = (NodeId, &'a str)> + 'a {
    document.descendants(root).filter_map(move |id| {
        let text = document.text(id)?;
        if text.trim().is_empty() {
            return None;
        }

        let parent = document.parent_element(id)?;
        let tag = document.tag_name(parent)?;
        if ignored.contains(tag) {
            return None;
        }

        Some((id, text))
    })
}
