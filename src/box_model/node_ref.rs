//! Owned provenance handles for syntax nodes
//!
//! Boxes outlive the tree they were extracted from, so every reference to a
//! syntax node is captured as a `NodeRef` at construction time. A `NodeRef`
//! stores positions only; its text is a slice of the one shared source buffer,
//! so cloning a provenance stack never copies source text.

use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tree_sitter::Node;

/// Snapshot of a tree-sitter node: identity, kind and position
#[derive(Clone, Serialize)]
pub struct NodeRef {
    /// `Node::id()` of the originating node, unique within one tree
    #[serde(skip)]
    pub id: usize,
    /// Grammar kind (`jsx_attribute`, `call_expression`, ...)
    pub kind: &'static str,
    pub start_byte: usize,
    pub end_byte: usize,
    /// 1-based line
    pub line: u32,
    /// 0-based column
    pub column: u32,
    #[serde(skip)]
    source: Arc<str>,
}

impl NodeRef {
    pub fn new(node: Node<'_>, source: &Arc<str>) -> Self {
        let start = node.start_position();
        Self {
            id: node.id(),
            kind: node.kind(),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            line: (start.row + 1) as u32,
            column: start.column as u32,
            source: Arc::clone(source),
        }
    }

    /// Source text covered by the node
    pub fn text(&self) -> &str {
        self.source
            .get(self.start_byte..self.end_byte)
            .unwrap_or_default()
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("kind", &self.kind)
            .field("line", &self.line)
            .field("column", &self.column)
            .field("text", &self.text())
            .finish_non_exhaustive()
    }
}

// Equality is positional; two refs into the same source are equal when they
// name the same node.
impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.start_byte == other.start_byte
            && self.end_byte == other.end_byte
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.kind.hash(state);
        self.start_byte.hash(state);
        self.end_byte.hash(state);
    }
}
