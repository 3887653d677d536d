//! Arena-backed markup tree
//!
//! The parser owns the whole document as a single `MarkupTree`. Nodes refer to
//! each other through `NodeId` indices into the arena, so the parent link is a
//! plain lookup key and never shares ownership of the parent.
//!
//! # Examples
//!
//! ```rust
//! use html_layout_planner::tree::MarkupTree;
//!
//! let mut tree = MarkupTree::new();
//! let table = tree.append_element(tree.root(), "TABLE", &[("border", "2")]);
//! let row = tree.append_element(table, "tr", &[]);
//! let cell = tree.append_element(row, "td", &[("colspan", "2")]);
//! tree.append_text(cell, "Total");
//!
//! assert_eq!(tree.node(table).tag_name(), "table");
//! assert_eq!(tree.parent(cell), Some(row));
//! assert_eq!(tree.node(cell).attribute_or("colspan", 1), 2);
//! assert_eq!(tree.inner_text(table), "Total");
//! ```

use serde::Serialize;
use std::str::FromStr;

/// Tag name used for the document root
pub const DOCUMENT_TAG: &str = "#document";

/// Tag name used for text nodes
pub const TEXT_TAG: &str = "#text";

/// Index of a node inside its `MarkupTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena (document order of creation)
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of markup node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
}

/// A single attribute on an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// One node of the markup tree
#[derive(Debug, Clone)]
pub struct MarkupNode {
    kind: NodeKind,
    tag: String,
    attributes: Vec<Attribute>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    text: Option<String>,
}

impl MarkupNode {
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Lower-cased tag name (`#text` for text nodes, `#document` for the root)
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Raw text of a text node
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Look up an attribute value by name (case-insensitive)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// Parse an attribute into `T`, falling back to `default` when the
    /// attribute is absent or does not parse
    pub fn attribute_or<T: FromStr>(&self, name: &str, default: T) -> T {
        self.attribute(name)
            .and_then(|value| value.trim().parse::<T>().ok())
            .unwrap_or(default)
    }
}

/// Singly-owned markup document
///
/// Node `0` is always the document root. Every other node is created through
/// `append_element` / `append_text`, which keeps parent links consistent with
/// child lists and rules out cycles.
#[derive(Debug, Clone)]
pub struct MarkupTree {
    nodes: Vec<MarkupNode>,
}

impl MarkupTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![MarkupNode {
                kind: NodeKind::Document,
                tag: DOCUMENT_TAG.to_string(),
                attributes: Vec::new(),
                children: Vec::new(),
                parent: None,
                text: None,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &MarkupNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Append an element under `parent`
    ///
    /// The tag and attribute names are lower-cased; a repeated attribute name
    /// keeps its first value.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let mut attrs: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for (name, value) in attributes {
            let name = name.to_ascii_lowercase();
            if attrs.iter().any(|attr| attr.name == name) {
                continue;
            }
            attrs.push(Attribute {
                name,
                value: (*value).to_string(),
            });
        }

        self.push(
            parent,
            MarkupNode {
                kind: NodeKind::Element,
                tag: tag.to_ascii_lowercase(),
                attributes: attrs,
                children: Vec::new(),
                parent: Some(parent),
                text: None,
            },
        )
    }

    /// Append a text node under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(
            parent,
            MarkupNode {
                kind: NodeKind::Text,
                tag: TEXT_TAG.to_string(),
                attributes: Vec::new(),
                children: Vec::new(),
                parent: Some(parent),
                text: Some(text.to_string()),
            },
        )
    }

    fn push(&mut self, parent: NodeId, node: MarkupNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Iterate over the ancestors of `id`, nearest first (excluding `id`)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// All descendants of `id` in document order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Concatenated text of every text node below `id`
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(own) = self.node(id).text() {
            text.push_str(own);
        }
        for descendant in self.descendants(id) {
            if let Some(part) = self.node(descendant).text() {
                text.push_str(part);
            }
        }
        text
    }
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`MarkupTree::ancestors`]
pub struct Ancestors<'a> {
    tree: &'a MarkupTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
