use crate::{Document, NodeId};

/// Pre-order, depth-first iterator over a node and its subtree.
///
/// Each call to [`Document::descendants`] starts a fresh walk; the iterator
/// never yields a node outside the subtree it was started on.
pub struct Descendants<'a> {
    document: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(document: &'a Document, root: NodeId) -> Self {
        let stack = if document.node(root).is_some() {
            vec![root]
        } else {
            Vec::new()
        };
        Self { document, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Children are pushed in reverse so the first child is visited next.
        self.stack
            .extend(self.document.children(id).iter().rev().copied());
        Some(id)
    }
}
