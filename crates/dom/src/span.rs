use crate::{Document, DomError, NodeId};

/// A `[start, end)` byte range inside a single text node.
///
/// Spans are plain values: they do not borrow the document and are not
/// updated when the tree changes. Resolve them with [`TextSpan::text`] to see
/// whether they still describe valid text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextSpan {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered text, or `None` if the node no longer holds a valid range.
    pub fn text<'a>(&self, document: &'a Document) -> Option<&'a str> {
        document.text(self.node)?.get(self.start..self.end)
    }
}

impl Document {
    /// Builds a span over `node[start..end]`.
    ///
    /// Fails unless the node is an attached text node and
    /// `start < end <= len`, with both offsets on character boundaries.
    pub fn create_span(
        &self,
        node: NodeId,
        start: usize,
        end: usize,
    ) -> Result<TextSpan, DomError> {
        self.node(node).ok_or(DomError::UnknownNode(node))?;
        let text = self.text(node).ok_or(DomError::NotText(node))?;
        if !self.is_attached(node) {
            return Err(DomError::Detached(node));
        }

        let len = text.len();
        if start >= end
            || end > len
            || !text.is_char_boundary(start)
            || !text.is_char_boundary(end)
        {
            return Err(DomError::InvalidOffsets {
                node,
                start,
                end,
                len,
            });
        }

        Ok(TextSpan { node, start, end })
    }
}
