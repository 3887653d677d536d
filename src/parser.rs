//! HTML5 parsing into the layout arena
//!
//! Markup is parsed with html5ever, which implements the WHATWG parsing
//! algorithm, so malformed input (unclosed tags, misnested formatting,
//! stray table content) is repaired the same way a browser repairs it. The
//! resulting `RcDom` is then copied into a [`MarkupTree`] arena:
//!
//! - Comments, doctypes and processing instructions are dropped
//! - Elements without a visual representation are dropped with their subtree
//! - Subtrees nested deeper than the validator's maximum depth are truncated
//!
//! The copy walks the DOM with an explicit stack, so parsing never recurses
//! on document depth.
//!
//! # Examples
//!
//! ```rust
//! use html_layout_planner::parser::parse_html;
//!
//! let tree = parse_html("<table><tr><td colspan=2>Total</td></tr></table>");
//! let cells: Vec<_> = tree
//!     .descendants(tree.root())
//!     .into_iter()
//!     .filter(|id| tree.node(*id).tag_name() == "td")
//!     .collect();
//! assert_eq!(cells.len(), 1);
//! assert_eq!(tree.node(cells[0]).attribute("colspan"), Some("2"));
//! ```

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ConversionError;
use crate::security::{SanitizeAction, SecurityValidator};
use crate::tree::{MarkupTree, NodeId};

/// Parse markup text into a tree using the default validator
pub fn parse_html(html: &str) -> MarkupTree {
    parse_html_with_validator(html, &SecurityValidator::new())
}

/// Parse markup text into a tree, filtering with `validator`
pub fn parse_html_with_validator(html: &str, validator: &SecurityValidator) -> MarkupTree {
    if html.is_empty() {
        return MarkupTree::new();
    }

    let dom = parse_document(RcDom::default(), Default::default()).one(html);
    tree_from_dom(&dom, validator)
}

/// Parse raw markup bytes into a tree
///
/// # Errors
///
/// Returns `ConversionError::EncodingError` if `html` is not valid UTF-8.
///
/// # Examples
///
/// ```rust
/// use html_layout_planner::parser::parse_html_bytes;
///
/// assert!(parse_html_bytes(b"<p>ok</p>").is_ok());
/// assert!(parse_html_bytes(b"\xFF\xFE<p>broken</p>").is_err());
/// ```
pub fn parse_html_bytes(html: &[u8]) -> Result<MarkupTree, ConversionError> {
    parse_html_bytes_with_validator(html, &SecurityValidator::new())
}

/// Parse raw markup bytes into a tree, filtering with `validator`
pub fn parse_html_bytes_with_validator(
    html: &[u8],
    validator: &SecurityValidator,
) -> Result<MarkupTree, ConversionError> {
    let text = std::str::from_utf8(html).map_err(|e| {
        ConversionError::EncodingError(format!(
            "Invalid UTF-8 at byte position {}: {}",
            e.valid_up_to(),
            e
        ))
    })?;
    Ok(parse_html_with_validator(text, validator))
}

/// Copy an html5ever DOM into a `MarkupTree`
pub fn tree_from_dom(dom: &RcDom, validator: &SecurityValidator) -> MarkupTree {
    let mut tree = MarkupTree::new();
    let root = tree.root();

    // (dom node, arena parent, depth of the dom node)
    let mut stack: Vec<(Handle, NodeId, usize)> = dom
        .document
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (child.clone(), root, 1))
        .collect();

    while let Some((handle, parent, depth)) = stack.pop() {
        if !validator.depth_allowed(depth) {
            log::warn!(
                "Dropping markup nested {} levels deep (maximum {})",
                depth,
                validator.max_depth()
            );
            continue;
        }

        match handle.data {
            NodeData::Element {
                ref name,
                ref attrs,
                ..
            } => {
                let tag_name = name.local.as_ref();
                if validator.check_element(tag_name) == SanitizeAction::Remove {
                    continue;
                }

                let id = {
                    let attrs = attrs.borrow();
                    let pairs: Vec<(&str, &str)> = attrs
                        .iter()
                        .map(|attr| (attr.name.local.as_ref(), &*attr.value))
                        .collect();
                    tree.append_element(parent, tag_name, &pairs)
                };

                for child in handle.children.borrow().iter().rev() {
                    stack.push((child.clone(), id, depth + 1));
                }
            }
            NodeData::Text { ref contents } => {
                let text = contents.borrow();
                tree.append_text(parent, &text);
            }
            NodeData::Document => {
                for child in handle.children.borrow().iter().rev() {
                    stack.push((child.clone(), parent, depth));
                }
            }
            NodeData::Comment { .. }
            | NodeData::Doctype { .. }
            | NodeData::ProcessingInstruction { .. } => {
                // Not part of the rendered document
            }
        }
    }

    tree
}
