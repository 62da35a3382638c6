use crate::NodeId;

#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {0} is not a text node")]
    NotText(NodeId),

    #[error("node {0} is detached from the document")]
    Detached(NodeId),

    #[error("invalid offsets {start}..{end} for node {node} of length {len}")]
    InvalidOffsets {
        node: NodeId,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("cannot insert {child} under {parent}: {reason}")]
    HierarchyRequest {
        parent: NodeId,
        child: NodeId,
        reason: &'static str,
    },

    #[error("document json error: {0}")]
    Json(#[from] serde_json::Error),
}
