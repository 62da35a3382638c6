//! Owned text tree for Spanmark.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Only the two node kinds the matching engine cares about are
//! modelled: elements (with a canonical lowercase tag name) and text leaves.

mod document;
mod error;
mod json;
mod span;
mod walker;

use std::sync::Arc;

use parking_lot::RwLock;

pub use document::{Document, Node, NodeKind};
pub use error::DomError;
pub use span::TextSpan;
pub use walker::Descendants;

/// Document handle shared between a controller and whoever mutates the tree.
pub type SharedDocument = Arc<RwLock<Document>>;

/// Node identifier - 4 bytes, an index into the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub fn shared(document: Document) -> SharedDocument {
    Arc::new(RwLock::new(document))
}
