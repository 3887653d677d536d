//! Text style resolution
//!
//! A node's text style is assembled from three layers, each overriding the
//! previous one property by property (never wholesale):
//!
//! 1. The engine default (every property unset)
//! 2. The per-tag style configured in [`ConversionOptions`](crate::config::ConversionOptions)
//! 3. The node's inline `style="..."` declaration
//!
//! Text inherits: the style of a text run is the fold of those layers over
//! every ancestor element, outermost first.
//!
//! # Inline Declarations
//!
//! Declarations are split on `;`, each segment on its first `:`. Property
//! names are trimmed and lower-cased. Recognized properties:
//!
//! - `font-size`: number with optional `px` suffix, taken as points
//! - `font-weight`: `bold`/`700` or `normal`/`400`
//! - `color`: `#RGB`, `#RRGGBB`, or a name from a fixed table
//! - `font-style`: `italic`/`normal`
//! - `text-decoration`: `underline`, `line-through`, `none`
//!
//! Anything else, and any value that does not parse, is ignored.
//!
//! # Examples
//!
//! ```rust
//! use html_layout_planner::style::{parse_inline_style, FontWeight, HexColor};
//!
//! let style = parse_inline_style("font-weight:700;color:blue");
//! assert_eq!(style.weight, Some(FontWeight::Bold));
//! assert_eq!(style.color, HexColor::parse("#0000FF"));
//! ```

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

use crate::config::ConversionOptions;
use crate::tree::{MarkupTree, NodeId};

const NAMED_COLORS: &[(&str, &str)] = &[
    ("red", "#FF0000"),
    ("blue", "#0000FF"),
    ("green", "#008000"),
    ("black", "#000000"),
    ("white", "#FFFFFF"),
    ("yellow", "#FFFF00"),
    ("gray", "#808080"),
    ("grey", "#808080"),
    ("orange", "#FFA500"),
    ("purple", "#800080"),
    ("pink", "#FFC0CB"),
    ("brown", "#A52A2A"),
    ("cyan", "#00FFFF"),
    ("magenta", "#FF00FF"),
];

/// Color normalized to `#RRGGBB` with upper-case digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HexColor(String);

impl HexColor {
    /// Parse a hex literal or a named color
    ///
    /// Returns `None` for anything unrecognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use html_layout_planner::style::HexColor;
    ///
    /// assert_eq!(HexColor::parse("#f00"), HexColor::parse("#FF0000"));
    /// assert_eq!(HexColor::parse("Red").unwrap().as_str(), "#FF0000");
    /// assert_eq!(HexColor::parse("#12"), None);
    /// ```
    pub fn parse(value: &str) -> Option<Self> {
        static HEX_COLOR: OnceLock<Option<Regex>> = OnceLock::new();
        let hex_color = HEX_COLOR
            .get_or_init(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").ok())
            .as_ref();

        let value = value.trim();
        if let Some(captures) = hex_color.and_then(|regex| regex.captures(value)) {
            let digits = &captures[1];
            let expanded: String = if digits.len() == 3 {
                digits.chars().flat_map(|c| [c, c]).collect()
            } else {
                digits.to_string()
            };
            return Some(HexColor(format!("#{}", expanded.to_ascii_uppercase())));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(value))
            .map(|(_, hex)| HexColor((*hex).to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Partially specified text style
///
/// `None` means "not set by this layer"; merging keeps the lower layer's
/// value for unset properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextStyle {
    /// Font size in points
    pub size: Option<f32>,
    pub weight: Option<FontWeight>,
    pub color: Option<HexColor>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub monospace: Option<bool>,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(mut self, points: f32) -> Self {
        self.size = Some(points);
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = Some(FontWeight::Bold);
        self
    }

    pub fn normal_weight(mut self) -> Self {
        self.weight = Some(FontWeight::Normal);
        self
    }

    pub fn color(mut self, color: HexColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = Some(true);
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = Some(true);
        self
    }

    /// Overlay `other` on top of `self`, property by property
    pub fn merge(&self, other: &TextStyle) -> TextStyle {
        TextStyle {
            size: other.size.or(self.size),
            weight: other.weight.or(self.weight),
            color: other.color.clone().or_else(|| self.color.clone()),
            italic: other.italic.or(self.italic),
            underline: other.underline.or(self.underline),
            strikethrough: other.strikethrough.or(self.strikethrough),
            monospace: other.monospace.or(self.monospace),
        }
    }
}

fn parse_font_size(value: &str) -> Option<f32> {
    let number = value.replace("px", "");
    number
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|size| size.is_finite() && *size > 0.0)
}

/// Parse an inline `style` declaration into a text style
pub fn parse_inline_style(declaration: &str) -> TextStyle {
    let mut style = TextStyle::default();

    for segment in declaration.split(';') {
        let Some((property, value)) = segment.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }

        match property.as_str() {
            "font-size" => {
                if let Some(size) = parse_font_size(value) {
                    style.size = Some(size);
                }
            }
            "font-weight" => match value.to_ascii_lowercase().as_str() {
                "bold" | "700" => style.weight = Some(FontWeight::Bold),
                "normal" | "400" => style.weight = Some(FontWeight::Normal),
                _ => {}
            },
            "color" => {
                if let Some(color) = HexColor::parse(value) {
                    style.color = Some(color);
                }
            }
            "font-style" => match value.to_ascii_lowercase().as_str() {
                "italic" | "oblique" => style.italic = Some(true),
                "normal" => style.italic = Some(false),
                _ => {}
            },
            "text-decoration" | "text-decoration-line" => {
                let value = value.to_ascii_lowercase();
                if value == "none" {
                    style.underline = Some(false);
                    style.strikethrough = Some(false);
                } else {
                    for token in value.split_whitespace() {
                        match token {
                            "underline" => style.underline = Some(true),
                            "line-through" => style.strikethrough = Some(true),
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
    }

    style
}

/// Style of a single element: configured tag style overlaid with its inline declaration
pub fn resolve_style(tree: &MarkupTree, node: NodeId, options: &ConversionOptions) -> TextStyle {
    let element = tree.node(node);
    let base = options
        .text_style(element.tag_name())
        .cloned()
        .unwrap_or_default();
    match element.attribute("style") {
        Some(declaration) => base.merge(&parse_inline_style(declaration)),
        None => base,
    }
}

/// Style inherited by content of `node`: `resolve_style` folded over the
/// ancestry chain, outermost ancestor first, ending with `node` itself
pub fn resolve_inherited_style(
    tree: &MarkupTree,
    node: NodeId,
    options: &ConversionOptions,
) -> TextStyle {
    let mut chain: Vec<NodeId> = tree.ancestors(node).collect();
    chain.reverse();
    chain.push(node);

    chain
        .into_iter()
        .filter(|id| tree.node(*id).is_element())
        .fold(TextStyle::default(), |style, id| {
            style.merge(&resolve_style(tree, id, options))
        })
}
