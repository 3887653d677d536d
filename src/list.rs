//! List numbering
//!
//! Numbers are derived from the tree on demand; nothing is cached between
//! calls. A list item's number is its 1-based position among the items whose
//! nearest enclosing list is the same list, so items of a nested list never
//! shift the numbering of the outer one:
//!
//! ```text
//! <ol>
//!   <li>one            -> 1
//!   <li>two            -> 2
//!     <ol>
//!       <li>two.a      -> 1
//!     </ol>
//!   <li>three          -> 3
//! </ol>
//! ```
//!
//! Each lookup rescans the owning list's descendants, which is linear in the
//! size of the list.

use serde::Serialize;

use crate::classify::{is_list, is_list_item, is_marked_list};
use crate::tree::{MarkupTree, NodeId};

/// Marker drawn in front of a list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListMarker {
    Bullet,
    Number(u32),
}

/// Where a node sits relative to list numbering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPosition {
    /// Neither a list item nor the direct child of one
    NotInList,
    /// Item of an unordered list, or of no list at all
    Bullet,
    /// 1-based position in an ordered list
    Number(u32),
}

impl ListPosition {
    /// Numeric form: `-1` outside lists, `0` for bullets, `n` for numbers
    pub fn code(self) -> i64 {
        match self {
            ListPosition::NotInList => -1,
            ListPosition::Bullet => 0,
            ListPosition::Number(n) => i64::from(n),
        }
    }

    pub fn marker(self) -> Option<ListMarker> {
        match self {
            ListPosition::NotInList => None,
            ListPosition::Bullet => Some(ListMarker::Bullet),
            ListPosition::Number(n) => Some(ListMarker::Number(n)),
        }
    }
}

/// Nearest list at or above `node`
pub fn owning_list(tree: &MarkupTree, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|id| is_list(tree, *id))
}

/// Numbering of `node`, or of its parent when the parent is a list item
///
/// # Examples
///
/// ```
/// use html_layout_planner::list::{number_in_list, ListPosition};
/// use html_layout_planner::parser::parse_html;
///
/// let tree = parse_html("<ol><li>a</li><li>b</li></ol>");
/// let items: Vec<_> = tree
///     .descendants(tree.root())
///     .into_iter()
///     .filter(|id| tree.node(*id).tag_name() == "li")
///     .collect();
/// assert_eq!(number_in_list(&tree, items[1]), ListPosition::Number(2));
/// assert_eq!(number_in_list(&tree, tree.root()).code(), -1);
/// ```
pub fn number_in_list(tree: &MarkupTree, node: NodeId) -> ListPosition {
    let mut list_item = None;
    if is_list_item(tree, node) {
        list_item = Some(node);
    }
    if let Some(parent) = tree.parent(node)
        && is_list_item(tree, parent)
    {
        list_item = Some(parent);
    }

    let Some(list_item) = list_item else {
        return ListPosition::NotInList;
    };

    let list = match owning_list(tree, list_item) {
        Some(list) if !is_marked_list(tree, list) => list,
        _ => return ListPosition::Bullet,
    };

    tree.descendants(list)
        .into_iter()
        .filter(|id| is_list_item(tree, *id) && owning_list(tree, *id) == Some(list))
        .position(|id| id == list_item)
        .map_or(ListPosition::Bullet, |index| {
            ListPosition::Number(u32::try_from(index + 1).unwrap_or(u32::MAX))
        })
}

/// True if no ancestor of `node` is a list
///
/// Used to pad only the outermost list of a nesting chain.
pub fn is_first_list_in_ancestry(tree: &MarkupTree, node: NodeId) -> bool {
    !tree.ancestors(node).any(|id| is_list(tree, id))
}
