//! Read-only document snapshot consumed from the editing surface
//!
//! The editor hands over its model as a tree of [`DocumentNode`]s. The caret
//! position is implicit: it is wherever the empty [`CURSOR_PLACEHOLDER`]
//! element sits.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Name of the empty element the editor places at the caret
pub const CURSOR_PLACEHOLDER: &str = "ghostText";

/// Name a root node answers to when treated as an element
pub const ROOT_NAME: &str = "$root";

/// A node of the editor's document model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentNode {
    Text(TextNode),
    Element(ElementNode),
    Root(RootNode),
    /// A node kind this model does not know about
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementNode {
    pub name: String,
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl ElementNode {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RootNode {
    #[serde(default)]
    pub children: Vec<DocumentNode>,
}

impl RootNode {
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl DocumentNode {
    pub fn text(data: impl Into<String>) -> Self {
        DocumentNode::Text(TextNode { data: data.into() })
    }

    pub fn element(name: impl Into<String>, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Element(ElementNode {
            name: name.into(),
            children,
        })
    }

    pub fn root(children: Vec<DocumentNode>) -> Self {
        DocumentNode::Root(RootNode { children })
    }

    /// The empty caret placeholder element
    pub fn cursor() -> Self {
        Self::element(CURSOR_PLACEHOLDER, Vec::new())
    }

    /// Parse a snapshot serialized by the host
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, DocumentNode::Text(_))
    }

    /// Roots count as elements, mirroring the editor model
    pub fn is_element(&self) -> bool {
        matches!(self, DocumentNode::Element(_) | DocumentNode::Root(_))
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            DocumentNode::Element(element) => Some(&element.name),
            DocumentNode::Root(_) => Some(ROOT_NAME),
            _ => None,
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Element(element) => &element.children,
            DocumentNode::Root(root) => &root.children,
            _ => &[],
        }
    }

    pub fn is_cursor_placeholder(&self) -> bool {
        matches!(self, DocumentNode::Element(element)
            if element.is_empty() && element.name == CURSOR_PLACEHOLDER)
    }

    /// Return a copy of the tree with `text` inserted right before the caret
    ///
    /// The placeholder itself is kept so the caret stays after the inserted
    /// text. Returns `None` when the tree has no placeholder; `self` is never
    /// modified.
    pub fn insert_at_cursor(&self, text: &str) -> Option<DocumentNode> {
        let mut inserted = false;
        let updated = self.with_insertion(text, &mut inserted);
        inserted.then_some(updated)
    }

    fn with_insertion(&self, text: &str, inserted: &mut bool) -> DocumentNode {
        match self {
            DocumentNode::Element(element) => DocumentNode::Element(ElementNode {
                name: element.name.clone(),
                children: insert_into_children(&element.children, text, inserted),
            }),
            DocumentNode::Root(root) => DocumentNode::Root(RootNode {
                children: insert_into_children(&root.children, text, inserted),
            }),
            other => other.clone(),
        }
    }
}

fn insert_into_children(
    children: &[DocumentNode],
    text: &str,
    inserted: &mut bool,
) -> Vec<DocumentNode> {
    let mut out = Vec::with_capacity(children.len() + 1);
    for child in children {
        if !*inserted && child.is_cursor_placeholder() {
            if !text.is_empty() {
                out.push(DocumentNode::text(text));
            }
            out.push(child.clone());
            *inserted = true;
        } else {
            out.push(child.with_insertion(text, inserted));
        }
    }
    out
}
