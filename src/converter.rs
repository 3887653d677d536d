//! Layout converter - transforms a markup tree into a layout plan
//!
//! This module drives the conversion: it walks the [`MarkupTree`], selects a
//! composer for every node, and assembles the [`LayoutPlan`] handed to the
//! page-composition engine.
//!
//! # Conversion Strategy
//!
//! The converter walks the tree depth-first in document order. For each node:
//!
//! 1. **Content check**: nodes with no text, image or line break anywhere in
//!    their subtree are skipped, except table cells, which keep their grid slot
//! 2. **Composer selection**: the tag maps onto a [`ComposerKind`]; unknown
//!    tags are composed like generic containers
//! 3. **Composition**: the selected composer builds the node's container,
//!    recursing into children where it needs to
//! 4. **Container styles**: the configured per-tag transform runs, followed by
//!    the structural ones (outer list padding, anchor hyperlinks)
//!
//! # Line Grouping
//!
//! Children of a container are grouped into lines. Consecutive inline
//! children (text, `span`, `b`, `a`, `img`, ...) flow into one
//! [`Element::Paragraph`]; every block child (or inline child whose first
//! child is a block) becomes its own item. Several items are stacked in an
//! [`Element::Column`]; a single undecorated item is used directly.
//!
//! Inside a paragraph, whitespace collapses the way browsers collapse it:
//! runs of whitespace become one space, and the paragraph is trimmed at both
//! ends and around line breaks.
//!
//! An image that is alone on its line is composed as a centered block image;
//! otherwise it flows inline with the text.
//!
//! # Examples
//!
//! Input HTML:
//! ```html
//! <h1>Report</h1>
//! <p>Total: <b>42</b></p>
//! ```
//!
//! Output plan (simplified):
//! ```text
//! Column
//!   Paragraph [Text "Report" (32pt, bold)]          padding-bottom 6
//!   Paragraph [Text "Total: ", Text "42" (bold)]    padding 4 / 4
//! ```
//!
//! ```rust
//! use html_layout_planner::converter::LayoutConverter;
//! use html_layout_planner::layout::Element;
//!
//! let converter = LayoutConverter::default();
//! let plan = converter.convert_html("<h1>Report</h1><p>Total: <b>42</b></p>");
//! match &plan.root.element {
//!     Element::Column(items) => assert_eq!(items.len(), 2),
//!     other => panic!("expected a column, got {:?}", other),
//! }
//! ```

use crate::classify::{
    ComposerKind, has_block_element, has_content, is_image, is_inline_line, is_line_break,
    is_link, is_list, is_required_structural,
};
use crate::config::ConversionOptions;
use crate::error::ConversionError;
use crate::image::image_box;
use crate::layout::{
    ColumnDefinition, Container, Element, Inline, LayoutPlan, TableCell, TableLayout, TextRun,
};
use crate::list::{ListMarker, is_first_list_in_ancestry, number_in_list};
use crate::parser::{parse_html_bytes_with_validator, parse_html_with_validator};
use crate::security::SecurityValidator;
use crate::style::resolve_inherited_style;
use crate::table::{TableAttributes, TableGrid};
use crate::tree::{MarkupTree, NodeId, NodeKind};

/// Layout converter
///
/// The `LayoutConverter` owns the conversion configuration and turns markup
/// trees into layout plans. It holds no per-conversion state, so one
/// converter can convert any number of documents.
///
/// # Usage
///
/// ```rust
/// use html_layout_planner::config::ConversionOptions;
/// use html_layout_planner::converter::LayoutConverter;
/// use html_layout_planner::parser::parse_html;
///
/// let options = ConversionOptions::default()
///     .with_container_style("td", |cell| cell.padding_horizontal(2.0));
/// let converter = LayoutConverter::new(options);
///
/// let tree = parse_html("<table><tr><td>a</td><td>b</td></tr></table>");
/// let plan = converter.convert(&tree);
/// assert!(!plan.is_empty());
/// ```
#[derive(Debug)]
pub struct LayoutConverter {
    options: ConversionOptions,
    security_validator: SecurityValidator,
}

impl LayoutConverter {
    /// Create a converter with the given options
    pub fn new(options: ConversionOptions) -> Self {
        let security_validator = SecurityValidator::with_max_depth(options.max_depth());
        Self {
            options,
            security_validator,
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a parsed tree into a layout plan
    ///
    /// Conversion never fails: malformed markup degrades to the closest
    /// layout that can be built, and a tree without content yields an empty
    /// plan.
    pub fn convert(&self, tree: &MarkupTree) -> LayoutPlan {
        let root = self
            .compose_node(tree, tree.root())
            .unwrap_or_else(Container::empty);
        LayoutPlan { root }
    }

    /// Parse markup text and convert it
    pub fn convert_html(&self, html: &str) -> LayoutPlan {
        let tree = parse_html_with_validator(html, &self.security_validator);
        self.convert(&tree)
    }

    /// Parse raw markup bytes and convert them
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::EncodingError` if `html` is not valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use html_layout_planner::converter::LayoutConverter;
    ///
    /// let converter = LayoutConverter::default();
    /// assert!(converter.convert_bytes(b"<p>hello</p>").is_ok());
    /// assert!(converter.convert_bytes(b"<p>\xC3\x28</p>").is_err());
    /// ```
    pub fn convert_bytes(&self, html: &[u8]) -> Result<LayoutPlan, ConversionError> {
        let tree = parse_html_bytes_with_validator(html, &self.security_validator)?;
        Ok(self.convert(&tree))
    }

    /// Compose one node into a container
    ///
    /// Returns `None` when the node renders nothing and may be dropped.
    fn compose_node(&self, tree: &MarkupTree, node: NodeId) -> Option<Container> {
        if !has_content(tree, node) && !is_required_structural(tree, node) {
            log::debug!(
                "Skipping <{}> without renderable content",
                tree.node(node).tag_name()
            );
            return None;
        }

        if tree.node(node).is_text() {
            return self.compose_line(tree, &[node]);
        }

        let container = match ComposerKind::for_tag(tree.node(node).tag_name()) {
            ComposerKind::LineBreak => Container::new(Element::Paragraph(vec![Inline::LineBreak])),
            ComposerKind::Image => {
                Container::new(Element::Image(image_box(tree, node, &self.options))).align_center()
            }
            ComposerKind::Table => self.compose_table(tree, node),
            ComposerKind::ListItem => self.compose_list_item(tree, node),
            ComposerKind::List
            | ComposerKind::Anchor
            | ComposerKind::GenericBlock
            | ComposerKind::GenericInline
            | ComposerKind::Unknown => Container::new(self.compose_children(tree, node)),
        };

        Some(self.apply_styles(tree, node, container))
    }

    /// Group the children of `node` into lines and compose them
    fn compose_children(&self, tree: &MarkupTree, node: NodeId) -> Element {
        let mut items = Vec::new();
        let mut line = Vec::new();

        for &child in tree.children(node) {
            if self.flows_inline(tree, child) {
                line.push(child);
                continue;
            }
            self.flush_line(tree, &mut line, &mut items);
            if let Some(container) = self.compose_node(tree, child) {
                items.push(container);
            }
        }
        self.flush_line(tree, &mut line, &mut items);

        if items.len() == 1
            && items[0].decorations.is_empty()
            && let Some(item) = items.pop()
        {
            return item.element;
        }
        if items.is_empty() {
            Element::Empty
        } else {
            Element::Column(items)
        }
    }

    fn flows_inline(&self, tree: &MarkupTree, node: NodeId) -> bool {
        match tree.node(node).kind() {
            NodeKind::Text => true,
            NodeKind::Document => false,
            NodeKind::Element => {
                let inline_tag = is_inline_line(tree, node)
                    || ComposerKind::for_tag(tree.node(node).tag_name()) == ComposerKind::Unknown;
                inline_tag && !has_block_element(tree, node)
            }
        }
    }

    fn flush_line(&self, tree: &MarkupTree, line: &mut Vec<NodeId>, items: &mut Vec<Container>) {
        if line.is_empty() {
            return;
        }

        let content: Vec<NodeId> = line
            .iter()
            .copied()
            .filter(|id| has_content(tree, *id))
            .collect();

        // A lone image on its line is laid out as a block
        let composed = match content.as_slice() {
            [only] if is_image(tree, *only) => self.compose_node(tree, *only),
            _ => self.compose_line(tree, line),
        };
        if let Some(container) = composed {
            items.push(container);
        }
        line.clear();
    }

    /// Flow a run of inline nodes into one paragraph
    fn compose_line(&self, tree: &MarkupTree, line: &[NodeId]) -> Option<Container> {
        let mut inlines = Vec::new();
        for &node in line {
            self.collect_inlines(tree, node, &mut inlines);
        }

        let inlines = normalize_inlines(inlines);
        if inlines.is_empty() {
            return None;
        }
        Some(Container::new(Element::Paragraph(inlines)))
    }

    fn collect_inlines(&self, tree: &MarkupTree, node: NodeId, output: &mut Vec<Inline>) {
        let markup = tree.node(node);
        match markup.kind() {
            NodeKind::Text => {
                let text = markup.text().unwrap_or("");
                if text.is_empty() {
                    return;
                }
                output.push(Inline::Text(TextRun {
                    text: text.to_string(),
                    style: resolve_inherited_style(tree, node, &self.options),
                    hyperlink: self.link_target(tree, node),
                }));
            }
            NodeKind::Element if is_line_break(tree, node) => output.push(Inline::LineBreak),
            NodeKind::Element if is_image(tree, node) => output.push(Inline::Image {
                image: image_box(tree, node, &self.options),
                hyperlink: self.link_target(tree, node),
            }),
            NodeKind::Element | NodeKind::Document => {
                for &child in tree.children(node) {
                    self.collect_inlines(tree, child, output);
                }
            }
        }
    }

    fn compose_list_item(&self, tree: &MarkupTree, node: NodeId) -> Container {
        let marker = number_in_list(tree, node)
            .marker()
            .unwrap_or(ListMarker::Bullet);
        let body = Container::new(self.compose_children(tree, node));
        Container::new(Element::ListItem {
            marker,
            body: Box::new(body),
        })
    }

    /// Compose a table onto an explicit grid
    ///
    /// Every placed cell carries the table's border and cell padding; the
    /// cell's own content is composed like any other container, so nested
    /// tables render inside their cell.
    fn compose_table(&self, tree: &MarkupTree, node: NodeId) -> Container {
        let Some(grid) = TableGrid::layout(tree, node) else {
            return Container::empty();
        };
        let attributes = TableAttributes::from_node(tree, node);

        let columns = vec![ColumnDefinition::Relative(1.0); grid.columns as usize];
        let cells = grid
            .cells
            .iter()
            .map(|placed| TableCell {
                placement: placed.placement,
                border: attributes.border,
                padding: attributes.cell_padding,
                content: self
                    .compose_node(tree, placed.node)
                    .unwrap_or_else(Container::empty),
            })
            .collect();

        Container::new(Element::Table(TableLayout { columns, cells }))
    }

    /// Apply configured and structural container styles for `node`
    fn apply_styles(&self, tree: &MarkupTree, node: NodeId, container: Container) -> Container {
        let mut container = self
            .options
            .apply_container_style(tree.node(node).tag_name(), container);

        let list_padding = self.options.list_vertical_padding();
        if is_list(tree, node) && is_first_list_in_ancestry(tree, node) && list_padding > 0.0 {
            container = container.padding_vertical(list_padding);
        }

        if is_link(tree, node) {
            container = self.wrap_hyperlink(tree, node, container);
        }

        container
    }

    /// Target of the anchor enclosing `node` (or `node` itself), if usable
    ///
    /// Empty targets and blocked schemes (`javascript:`, `data:`, ...) yield
    /// `None`.
    pub fn link_target(&self, tree: &MarkupTree, node: NodeId) -> Option<String> {
        let anchor = std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|id| is_link(tree, *id))?;
        let href = tree.node(anchor).attribute("href")?;
        self.security_validator
            .sanitize_url(href)
            .map(str::to_string)
    }

    /// Make `container` a hyperlink region if `node` sits inside an anchor
    ///
    /// Without an enclosing anchor, or without a usable target, the
    /// container is returned unchanged.
    pub fn wrap_hyperlink(
        &self,
        tree: &MarkupTree,
        node: NodeId,
        container: Container,
    ) -> Container {
        match self.link_target(tree, node) {
            Some(target) => container.hyperlink(target),
            None => container,
        }
    }
}

impl Default for LayoutConverter {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

/// Collapse whitespace across a paragraph's inline content
///
/// Whitespace runs become a single space; spaces at the start and end of the
/// paragraph and next to line breaks are removed, as are runs left empty.
fn normalize_inlines(raw: Vec<Inline>) -> Vec<Inline> {
    let mut output: Vec<Inline> = Vec::with_capacity(raw.len());
    let mut at_line_start = true;

    for inline in raw {
        match inline {
            Inline::Text(mut run) => {
                let mut text = collapse_whitespace(&run.text);
                if at_line_start || ends_with_space(&output) {
                    text = text.trim_start().to_string();
                }
                if text.is_empty() {
                    continue;
                }
                run.text = text;
                output.push(Inline::Text(run));
                at_line_start = false;
            }
            Inline::LineBreak => {
                trim_trailing_space(&mut output);
                output.push(Inline::LineBreak);
                at_line_start = true;
            }
            image @ Inline::Image { .. } => {
                output.push(image);
                at_line_start = false;
            }
        }
    }

    trim_trailing_space(&mut output);
    output
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                collapsed.push(' ');
            }
            in_whitespace = true;
        } else {
            collapsed.push(ch);
            in_whitespace = false;
        }
    }
    collapsed
}

fn ends_with_space(inlines: &[Inline]) -> bool {
    matches!(inlines.last(), Some(Inline::Text(run)) if run.text.ends_with(' '))
}

fn trim_trailing_space(inlines: &mut Vec<Inline>) {
    while let Some(Inline::Text(run)) = inlines.last_mut() {
        let trimmed_len = run.text.trim_end().len();
        if trimmed_len > 0 {
            run.text.truncate(trimmed_len);
            return;
        }
        inlines.pop();
    }
}
