use crate::{DomError, NodeId, walker::Descendants};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document node. Never has a parent and is not an element.
    Document,
    Element { tag: String },
    Text { text: String },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text { .. })
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

/// Arena-backed text tree.
///
/// Invariants:
/// - `nodes[0]` is the document node and is always attached.
/// - A node has at most one parent; `append_child` and `insert_before`
///   move a node that already has a parent.
/// - Removed nodes stay in the arena so their ids remain valid handles,
///   but they are no longer attached.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node_or_err(&self, id: NodeId) -> Result<&Node, DomError> {
        self.node(id).ok_or(DomError::UnknownNode(id))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind));
        id
    }

    /// Creates a detached element. Tag names are stored ASCII-lowercase.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.trim().to_ascii_lowercase(),
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text { text: text.into() })
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_text(
        &mut self,
        parent: NodeId,
        text: impl Into<String>,
    ) -> Result<NodeId, DomError> {
        let id = self.create_text(text);
        self.append_child(parent, id)?;
        Ok(id)
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.node_or_err(parent)?;
        self.node_or_err(child)?;

        if parent_node.is_text() {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "text nodes cannot have children",
            });
        }
        if child == Self::ROOT {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "the document node cannot be inserted",
            });
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "a node cannot be inserted under itself",
            });
        }
        Ok(())
    }

    /// Appends `child` as the last child of `parent`, moving it if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        self.detach(child);
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Inserts `child` before `before`, which must be a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: NodeId,
    ) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        if self.node_or_err(before)?.parent != Some(parent) {
            return Err(DomError::HierarchyRequest {
                parent,
                child,
                reason: "reference node is not a child of the parent",
            });
        }
        if child == before {
            return Ok(());
        }

        self.detach(child);
        let siblings = &mut self.nodes[parent.index()].children;
        let position = siblings
            .iter()
            .position(|id| *id == before)
            .unwrap_or(siblings.len());
        siblings.insert(position, child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Removes a node and its subtree from the tree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DomError> {
        self.node_or_err(id)?;
        if id == Self::ROOT {
            return Err(DomError::HierarchyRequest {
                parent: id,
                child: id,
                reason: "the document node cannot be removed",
            });
        }
        self.detach(id);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.index()].parent.take() {
            self.nodes[parent.index()].children.retain(|child| *child != id);
        }
    }

    /// Replaces the data of a text node. Spans created earlier against this
    /// node may no longer describe the same characters.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DomError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(DomError::UnknownNode(id))?;
        match &mut node.kind {
            NodeKind::Text { text: current } => {
                *current = text.into();
                Ok(())
            }
            _ => Err(DomError::NotText(id)),
        }
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// The parent node if and only if it is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.node(parent)?.is_element().then_some(parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Whether the node is reachable from the document node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some() && self.contains(Self::ROOT, id)
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants::new(self, root)
    }

    /// Concatenated text of every text node under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }
}
