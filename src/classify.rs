//! Node classification and composer selection
//!
//! Stateless predicates over a node's tag name (compared lower-cased) and,
//! where needed, its descendants. [`ComposerKind`] maps a tag onto the closed
//! set of composer behaviors used by the converter; tags it does not know
//! fall back to [`ComposerKind::Unknown`] instead of failing the lookup.

use crate::tree::{MarkupTree, NodeId};

/// Tags that start a new layout line
const BLOCK_ELEMENTS: &[&str] = &[
    "#document",
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "center",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Tags that flow within the current line
const LINE_ELEMENTS: &[&str] = &[
    "#text", "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "del", "dfn", "em",
    "font", "i", "img", "ins", "kbd", "label", "mark", "q", "s", "samp", "small", "span",
    "strike", "strong", "sub", "sup", "time", "tt", "u", "var",
];

/// Composer behavior selected for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerKind {
    GenericBlock,
    GenericInline,
    LineBreak,
    Image,
    Table,
    List,
    ListItem,
    Anchor,
    Unknown,
}

impl ComposerKind {
    /// Select the composer for a tag name
    ///
    /// # Examples
    ///
    /// ```
    /// use html_layout_planner::classify::ComposerKind;
    ///
    /// assert_eq!(ComposerKind::for_tag("TABLE"), ComposerKind::Table);
    /// assert_eq!(ComposerKind::for_tag("ol"), ComposerKind::List);
    /// assert_eq!(ComposerKind::for_tag("my-widget"), ComposerKind::Unknown);
    /// assert_eq!(ComposerKind::for_tag(""), ComposerKind::Unknown);
    /// ```
    pub fn for_tag(tag_name: &str) -> Self {
        let tag = tag_name.to_ascii_lowercase();
        match tag.as_str() {
            "br" => ComposerKind::LineBreak,
            "img" => ComposerKind::Image,
            "table" => ComposerKind::Table,
            "ul" | "ol" => ComposerKind::List,
            "li" => ComposerKind::ListItem,
            "a" => ComposerKind::Anchor,
            _ if BLOCK_ELEMENTS.contains(&tag.as_str()) => ComposerKind::GenericBlock,
            _ if LINE_ELEMENTS.contains(&tag.as_str()) => ComposerKind::GenericInline,
            _ => ComposerKind::Unknown,
        }
    }
}

fn tag_is(tree: &MarkupTree, node: NodeId, tag: &str) -> bool {
    tree.node(node).tag_name().eq_ignore_ascii_case(tag)
}

pub fn is_block(tree: &MarkupTree, node: NodeId) -> bool {
    let tag = tree.node(node).tag_name().to_ascii_lowercase();
    BLOCK_ELEMENTS.contains(&tag.as_str())
}

pub fn is_inline_line(tree: &MarkupTree, node: NodeId) -> bool {
    let tag = tree.node(node).tag_name().to_ascii_lowercase();
    LINE_ELEMENTS.contains(&tag.as_str())
}

pub fn is_marked_list(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "ul")
}

pub fn is_numbered_list(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "ol")
}

pub fn is_list(tree: &MarkupTree, node: NodeId) -> bool {
    is_marked_list(tree, node) || is_numbered_list(tree, node)
}

pub fn is_list_item(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "li")
}

pub fn is_table(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "table")
}

pub fn is_table_row(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "tr")
}

pub fn is_table_cell(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "td") || tag_is(tree, node, "th")
}

pub fn is_link(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "a")
}

pub fn is_image(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "img")
}

pub fn is_line_break(tree: &MarkupTree, node: NodeId) -> bool {
    tag_is(tree, node, "br")
}

/// A node renders nothing when it has no non-blank text and is neither an
/// image nor a line break
pub fn is_empty(tree: &MarkupTree, node: NodeId) -> bool {
    if is_image(tree, node) || is_line_break(tree, node) {
        return false;
    }
    tree.inner_text(node).trim().is_empty()
}

/// True if the node or any descendant is non-empty
///
/// Depth-first, stops at the first non-empty node.
pub fn has_content(tree: &MarkupTree, node: NodeId) -> bool {
    if !is_empty(tree, node) {
        return true;
    }
    tree.children(node)
        .iter()
        .any(|child| has_content(tree, *child))
}

/// True if the first child is a block element or contains one
///
/// Only the first child's subtree is inspected; later children are never
/// looked at. `<span>text<div>..</div></span>` therefore reports `false`.
pub fn has_block_element(tree: &MarkupTree, node: NodeId) -> bool {
    match tree.children(node).first() {
        Some(first) => is_block(tree, *first) || has_block_element(tree, *first),
        None => false,
    }
}

/// Table cells keep their grid slot even when empty
pub fn is_required_structural(tree: &MarkupTree, node: NodeId) -> bool {
    is_table_cell(tree, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;

    fn find(tree: &MarkupTree, tag: &str) -> NodeId {
        tree.descendants(tree.root())
            .into_iter()
            .find(|id| tree.node(*id).tag_name() == tag)
            .unwrap_or_else(|| panic!("no <{}> in tree", tag))
    }

    #[test]
    fn test_composer_kinds() {
        assert_eq!(ComposerKind::for_tag("br"), ComposerKind::LineBreak);
        assert_eq!(ComposerKind::for_tag("IMG"), ComposerKind::Image);
        assert_eq!(ComposerKind::for_tag("ul"), ComposerKind::List);
        assert_eq!(ComposerKind::for_tag("li"), ComposerKind::ListItem);
        assert_eq!(ComposerKind::for_tag("a"), ComposerKind::Anchor);
        assert_eq!(ComposerKind::for_tag("div"), ComposerKind::GenericBlock);
        assert_eq!(ComposerKind::for_tag("h3"), ComposerKind::GenericBlock);
        assert_eq!(ComposerKind::for_tag("strong"), ComposerKind::GenericInline);
        assert_eq!(ComposerKind::for_tag("blink"), ComposerKind::Unknown);
    }

    #[test]
    fn test_list_predicates() {
        let tree = parse_html("<ul><li>a</li></ul><ol><li>b</li></ol>");
        let ul = find(&tree, "ul");
        let ol = find(&tree, "ol");
        let li = find(&tree, "li");
        assert!(is_list(&tree, ul) && is_marked_list(&tree, ul));
        assert!(is_list(&tree, ol) && is_numbered_list(&tree, ol));
        assert!(is_list_item(&tree, li));
        assert!(!is_list(&tree, li));
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let tree = parse_html("<div>   \n  </div><p>x</p>");
        assert!(!has_content(&tree, find(&tree, "div")));
        assert!(has_content(&tree, find(&tree, "p")));
    }

    #[test]
    fn test_is_empty_looks_at_descendant_text() {
        let tree = parse_html("<p>hello</p><div> </div><section><em> x </em></section>");
        assert!(!is_empty(&tree, find(&tree, "p")));
        assert!(is_empty(&tree, find(&tree, "div")));
        assert!(!is_empty(&tree, find(&tree, "section")));

        let tree = parse_html("<p><img src='a.png'><br></p>");
        assert!(is_empty(&tree, find(&tree, "p")));
        assert!(!is_empty(&tree, find(&tree, "img")));
        assert!(!is_empty(&tree, find(&tree, "br")));
    }

    #[test]
    fn test_images_and_breaks_are_content() {
        let tree = parse_html("<div><img src='a.png'></div><span><br></span>");
        assert!(has_content(&tree, find(&tree, "div")));
        assert!(has_content(&tree, find(&tree, "span")));
    }

    #[test]
    fn test_has_block_element_first_child() {
        let tree = parse_html("<span><div>block</div></span>");
        assert!(has_block_element(&tree, find(&tree, "span")));

        let tree = parse_html("<a><em><p>deep</p></em></a>");
        assert!(has_block_element(&tree, find(&tree, "a")));
    }

    #[test]
    fn test_has_block_element_ignores_later_children() {
        // Known limitation: only the first child subtree is inspected
        let tree = parse_html("<span>lead text<div>block</div></span>");
        assert!(!has_block_element(&tree, find(&tree, "span")));
    }

    #[test]
    fn test_required_structural() {
        let tree = parse_html("<table><tr><td></td><th></th></tr></table>");
        assert!(is_required_structural(&tree, find(&tree, "td")));
        assert!(is_required_structural(&tree, find(&tree, "th")));
        assert!(!is_required_structural(&tree, find(&tree, "tr")));
    }
}
