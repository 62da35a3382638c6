use serde::Deserialize;

use crate::{Document, DomError, NodeId};

/// JSON shape of a document fragment: a string is a text node, an object is
/// an element with optional children.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeSource {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        children: Vec<NodeSource>,
    },
}

impl Document {
    /// Parses a JSON fragment and attaches it under the document node.
    ///
    /// Returns the document together with the id of the fragment's top node.
    ///
    /// ```json
    /// { "tag": "body", "children": [
    ///     { "tag": "p", "children": ["The cat sat"] },
    ///     { "tag": "script", "children": ["var cat = 1;"] }
    /// ] }
    /// ```
    pub fn from_json(source: &str) -> Result<(Document, NodeId), DomError> {
        let node: NodeSource = serde_json::from_str(source)?;
        let mut document = Document::new();
        let top = document.insert_source(Document::ROOT, node)?;
        Ok((document, top))
    }

    fn insert_source(&mut self, parent: NodeId, node: NodeSource) -> Result<NodeId, DomError> {
        match node {
            NodeSource::Text(text) => self.append_text(parent, text),
            NodeSource::Element { tag, children } => {
                let id = self.append_element(parent, &tag)?;
                for child in children {
                    self.insert_source(id, child)?;
                }
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_fragment() {
        let (doc, body) = Document::from_json(
            r#"{ "tag": "BODY", "children": [
                { "tag": "p", "children": ["The ", { "tag": "b", "children": ["cat"] }] },
                "tail"
            ] }"#,
        )
        .unwrap();

        assert_eq!(doc.tag_name(body), Some("body"));
        assert_eq!(doc.parent(body), Some(Document::ROOT));
        assert_eq!(doc.text_content(body), "The cattail");
        assert_eq!(doc.children(body).len(), 2);
    }

    #[test]
    fn test_bare_string_is_a_text_node() {
        let (doc, top) = Document::from_json(r#""just text""#).unwrap();
        assert_eq!(doc.text(top), Some("just text"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Document::from_json(r#"{ "children": [] }"#),
            Err(DomError::Json(_))
        ));
    }
}
