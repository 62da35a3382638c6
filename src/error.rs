use spanmark_dom::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    #[error("highlighting is not supported in this environment")]
    Unsupported,

    #[error("root {0} is not part of the document")]
    UnknownRoot(NodeId),

    #[error("config error: {0}")]
    Config(String),
}
