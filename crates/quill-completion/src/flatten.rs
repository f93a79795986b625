//! Tree-to-text flattening with an embedded caret marker
//!
//! The flattened form is what the trigger policy inspects and what gets sent
//! to the backend. Every block element ends with a line break so word and
//! sentence boundary patterns also match at block edges.

use tracing::trace;

use crate::document::{DocumentNode, CURSOR_PLACEHOLDER};

/// Literal emitted where the caret is
pub const CURSOR_MARKER: &str = "[[cursor]]";

/// Appended after the children of every non-empty element
pub const LINE_BREAK: &str = "\r\n";

/// Flatten a document node into plain text with the caret marker
///
/// Pure: the tree is only read, and flattening the same snapshot twice
/// yields the same string.
pub fn flatten(node: &DocumentNode) -> String {
    let mut flattener = Flattener::default();
    flattener.visit(node);
    flattener.finish()
}

/// Walk state for [`flatten`]
///
/// Typed text is held back in `pending` until a caret marker or line break
/// is emitted, so marker literals are removed from whole text runs rather
/// than from single nodes. Neither the marker nor the line break can form
/// part of another marker, which makes them safe flush points.
#[derive(Default)]
struct Flattener {
    out: String,
    pending: String,
}

impl Flattener {
    fn visit(&mut self, node: &DocumentNode) {
        match node {
            DocumentNode::Text(text) => self.pending.push_str(&text.data),
            DocumentNode::Element(element) if element.is_empty() => {
                if element.name == CURSOR_PLACEHOLDER {
                    self.flush();
                    self.out.push_str(CURSOR_MARKER);
                }
            }
            DocumentNode::Element(element) => self.visit_block(&element.children),
            DocumentNode::Root(root) if root.is_empty() => {}
            DocumentNode::Root(root) => self.visit_block(&root.children),
            DocumentNode::Unknown => {
                trace!("Skipping unknown node kind while flattening");
            }
        }
    }

    fn visit_block(&mut self, children: &[DocumentNode]) {
        for child in children {
            self.visit(child);
        }
        self.flush();
        self.out.push_str(LINE_BREAK);
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = strip_markers(std::mem::take(&mut self.pending));
            self.out.push_str(&text);
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out
    }
}

/// Remove marker literals until none are left
///
/// A single pass is not enough: removing the inner copy of
/// `"[[cur[[cursor]]sor]]"` joins its halves into a new marker.
fn strip_markers(mut text: String) -> String {
    while text.contains(CURSOR_MARKER) {
        text = text.replace(CURSOR_MARKER, "");
    }
    text
}

/// Number of caret markers in a flattened text
pub fn cursor_count(text: &str) -> usize {
    text.matches(CURSOR_MARKER).count()
}
