use std::collections::BTreeMap;

use spanmark_dom::TextSpan;

/// The facility that makes named span sets visible, such as a renderer's
/// highlight table.
///
/// The registry always hands over the complete span set for a name, never
/// a delta.
pub trait HighlightBackend: Send {
    fn is_supported(&self) -> bool {
        true
    }

    /// Replaces the visible span set for `name`.
    fn set(&mut self, name: &str, spans: Vec<TextSpan>);

    /// Removes the span set for `name` entirely.
    fn delete(&mut self, name: &str);

    /// Reads back the visible set, for backends that keep one.
    fn get(&self, _name: &str) -> Option<&[TextSpan]> {
        None
    }
}

/// In-memory name to span-set table.
#[derive(Debug, Default, Clone)]
pub struct HighlightTable {
    highlights: BTreeMap<String, Vec<TextSpan>>,
}

impl HighlightTable {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighlightBackend for HighlightTable {
    fn set(&mut self, name: &str, spans: Vec<TextSpan>) {
        self.highlights.insert(name.to_string(), spans);
    }

    fn delete(&mut self, name: &str) {
        self.highlights.remove(name);
    }

    fn get(&self, name: &str) -> Option<&[TextSpan]> {
        self.highlights.get(name).map(Vec::as_slice)
    }
}

/// Backend for environments without a highlighting facility.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

impl HighlightBackend for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn set(&mut self, _name: &str, _spans: Vec<TextSpan>) {}

    fn delete(&mut self, _name: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use spanmark_dom::NodeId;

    fn span(node: u32) -> TextSpan {
        TextSpan {
            node: NodeId(node),
            start: 0,
            end: 1,
        }
    }

    #[test]
    fn test_table_set_replaces() {
        let mut table = HighlightTable::new();
        table.set("highlight", vec![span(1), span(2)]);
        table.set("highlight", vec![span(3)]);
        assert_eq!(table.get("highlight"), Some(&[span(3)][..]));
    }

    #[test]
    fn test_table_delete() {
        let mut table = HighlightTable::new();
        table.set("a", vec![span(1)]);
        table.set("b", vec![span(2)]);
        table.delete("a");
        assert!(table.get("a").is_none());
        assert_eq!(table.get("b"), Some(&[span(2)][..]));
    }

    #[test]
    fn test_unsupported_keeps_nothing() {
        let mut backend = Unsupported;
        backend.set("a", vec![span(1)]);
        assert!(!backend.is_supported());
        assert!(backend.get("a").is_none());
    }
}
