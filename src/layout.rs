//! Layout plan handed to the page-composition engine
//!
//! The plan is a tree of [`Container`]s. Each container is a stack of
//! [`Decoration`]s (outermost first) around exactly one [`Element`]. The
//! planner never measures or paginates; it only decides structure, styles,
//! placements and constraints, and leaves drawing to the engine.
//!
//! The fluent builders mirror the primitives an engine is expected to offer,
//! so per-tag container transforms read naturally:
//!
//! ```rust
//! use html_layout_planner::layout::{Container, Decoration};
//!
//! let boxed = Container::empty().border(1.0).padding(5.0).align_center();
//! assert_eq!(boxed.decorations[0], Decoration::Border(1.0));
//! assert_eq!(boxed.decorations.len(), 3);
//! ```
//!
//! Every type serializes with serde, so a plan can be handed to a renderer in
//! another process as JSON.

use serde::Serialize;

use crate::list::ListMarker;
use crate::style::{HexColor, TextStyle};
use crate::table::GridPlacement;

/// Per-side lengths in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// Constraint or effect applied around a container's element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decoration {
    Padding(Sides),
    /// Border width in points on every side
    Border(f32),
    Background(HexColor),
    /// Makes the whole area a link to the target
    Hyperlink(String),
    AlignCenter,
    /// Fixed width in points
    Width(f32),
    /// Fixed height in points
    Height(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub decorations: Vec<Decoration>,
    pub element: Element,
}

impl Container {
    pub fn new(element: Element) -> Self {
        Self {
            decorations: Vec::new(),
            element,
        }
    }

    pub fn empty() -> Self {
        Self::new(Element::Empty)
    }

    pub fn decorate(mut self, decoration: Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    pub fn padding(self, all: f32) -> Self {
        self.decorate(Decoration::Padding(Sides {
            top: all,
            right: all,
            bottom: all,
            left: all,
        }))
    }

    pub fn padding_vertical(self, value: f32) -> Self {
        self.decorate(Decoration::Padding(Sides {
            top: value,
            bottom: value,
            ..Sides::default()
        }))
    }

    pub fn padding_horizontal(self, value: f32) -> Self {
        self.decorate(Decoration::Padding(Sides {
            left: value,
            right: value,
            ..Sides::default()
        }))
    }

    pub fn padding_top(self, value: f32) -> Self {
        self.decorate(Decoration::Padding(Sides {
            top: value,
            ..Sides::default()
        }))
    }

    pub fn padding_bottom(self, value: f32) -> Self {
        self.decorate(Decoration::Padding(Sides {
            bottom: value,
            ..Sides::default()
        }))
    }

    pub fn padding_left(self, value: f32) -> Self {
        self.decorate(Decoration::Padding(Sides {
            left: value,
            ..Sides::default()
        }))
    }

    pub fn border(self, width: f32) -> Self {
        self.decorate(Decoration::Border(width))
    }

    pub fn background(self, color: HexColor) -> Self {
        self.decorate(Decoration::Background(color))
    }

    pub fn hyperlink(self, target: impl Into<String>) -> Self {
        self.decorate(Decoration::Hyperlink(target.into()))
    }

    pub fn align_center(self) -> Self {
        self.decorate(Decoration::AlignCenter)
    }

    pub fn width(self, points: f32) -> Self {
        self.decorate(Decoration::Width(points))
    }

    pub fn height(self, points: f32) -> Self {
        self.decorate(Decoration::Height(points))
    }

    /// First hyperlink target among the decorations
    pub fn hyperlink_target(&self) -> Option<&str> {
        self.decorations.iter().find_map(|decoration| match decoration {
            Decoration::Hyperlink(target) => Some(target.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty() && self.element == Element::Empty
    }
}

/// Content held by a container
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Element {
    Empty,
    /// Block children stacked vertically
    Column(Vec<Container>),
    /// Inline content flowed into lines
    Paragraph(Vec<Inline>),
    ListItem {
        marker: ListMarker,
        body: Box<Container>,
    },
    Image(ImageBox),
    Table(TableLayout),
}

/// Inline content inside a paragraph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Inline {
    Text(TextRun),
    Image {
        image: ImageBox,
        hyperlink: Option<String>,
    },
    LineBreak,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub style: TextStyle,
    pub hyperlink: Option<String>,
}

/// How an image is scaled into its space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageFit {
    /// Both dimensions fixed independently, aspect ratio ignored
    Unproportional,
    /// Width fixed, height follows the aspect ratio
    FitWidth,
    /// Height fixed, width follows the aspect ratio
    FitHeight,
    /// Fit into the available area, keeping the aspect ratio
    FitArea,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ImageSource {
    Resolved(Vec<u8>),
    /// Stand-in for an image that could not be resolved
    Placeholder { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBox {
    /// Original `src` attribute
    pub src: String,
    pub source: ImageSource,
    pub fit: ImageFit,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColumnDefinition {
    /// Share of the available width relative to the other columns
    Relative(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLayout {
    pub columns: Vec<ColumnDefinition>,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub placement: GridPlacement,
    pub border: f32,
    pub padding: f32,
    pub content: Container,
}

/// Result of converting one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutPlan {
    pub root: Container,
}

impl LayoutPlan {
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
