//! Conversion configuration
//!
//! `ConversionOptions` is built once by the caller, handed to
//! [`LayoutConverter`](crate::converter::LayoutConverter), and only read from
//! then on. It carries:
//!
//! - Per-tag text styles (the middle layer of style resolution)
//! - Per-tag container transforms applied after structural layout
//! - The image resolution callback (`src` -> raw bytes)
//! - The vertical padding placed around outermost lists
//! - The nesting depth kept by the parser
//!
//! # Examples
//!
//! ```rust
//! use html_layout_planner::config::{ConversionOptions, Unit};
//! use html_layout_planner::style::TextStyle;
//!
//! let options = ConversionOptions::default()
//!     .with_text_style("H1", TextStyle::new().size(40.0).bold())
//!     .with_container_style("blockquote", |c| c.padding_left(30.0).padding_vertical(5.0))
//!     .with_image_resolver(|src| (src == "logo.png").then(|| vec![0x89, b'P', b'N', b'G']))
//!     .with_list_vertical_padding(0.5, Unit::Centimetre)
//!     .expect("finite, non-negative padding");
//!
//! assert_eq!(options.text_style("h1").and_then(|s| s.size), Some(40.0));
//! assert!(options.resolve_image("logo.png").is_some());
//! assert!(options.resolve_image("other.png").is_none());
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::error::ConversionError;
use crate::layout::Container;
use crate::security::MAX_NESTING_DEPTH;
use crate::style::{HexColor, TextStyle};

/// Transform applied to the container composed for a tag
pub type ContainerTransform = Box<dyn Fn(Container) -> Container>;

/// Resolves an image `src` to raw image bytes
pub type ImageResolver = Box<dyn Fn(&str) -> Option<Vec<u8>>>;

/// Default vertical padding around outermost lists, in points
pub const DEFAULT_LIST_VERTICAL_PADDING: f32 = 12.0;

/// Length units accepted by configuration setters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Point,
    Inch,
    Feet,
    Meter,
    Centimetre,
    Millimetre,
    Mil,
}

impl Unit {
    /// Convert `value` in this unit to points (1 inch = 72 points)
    pub fn to_points(self, value: f32) -> f32 {
        let factor = match self {
            Unit::Point => 1.0,
            Unit::Inch => 72.0,
            Unit::Feet => 72.0 * 12.0,
            Unit::Meter => 72.0 / 0.0254,
            Unit::Centimetre => 72.0 / 2.54,
            Unit::Millimetre => 72.0 / 25.4,
            Unit::Mil => 72.0 / 1000.0,
        };
        value * factor
    }
}

/// Configuration for one conversion
pub struct ConversionOptions {
    text_styles: HashMap<String, TextStyle>,
    container_styles: HashMap<String, ContainerTransform>,
    image_resolver: ImageResolver,
    list_vertical_padding: f32,
    max_depth: usize,
}

impl ConversionOptions {
    /// Options with no per-tag styles at all, not even the built-in ones
    pub fn empty() -> Self {
        Self {
            text_styles: HashMap::new(),
            container_styles: HashMap::new(),
            image_resolver: Box::new(|_| None),
            list_vertical_padding: DEFAULT_LIST_VERTICAL_PADDING,
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    /// Set the text style for a tag, replacing any previous one
    pub fn with_text_style(mut self, tag_name: &str, style: TextStyle) -> Self {
        self.text_styles.insert(tag_name.to_ascii_lowercase(), style);
        self
    }

    /// Set the container transform for a tag, replacing any previous one
    pub fn with_container_style<F>(mut self, tag_name: &str, transform: F) -> Self
    where
        F: Fn(Container) -> Container + 'static,
    {
        self.container_styles
            .insert(tag_name.to_ascii_lowercase(), Box::new(transform));
        self
    }

    pub fn with_image_resolver<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&str) -> Option<Vec<u8>> + 'static,
    {
        self.image_resolver = Box::new(resolver);
        self
    }

    /// Set the vertical padding placed around outermost lists
    ///
    /// # Errors
    ///
    /// Returns `ConversionError::InvalidInput` for negative or non-finite values.
    pub fn with_list_vertical_padding(
        mut self,
        value: f32,
        unit: Unit,
    ) -> Result<Self, ConversionError> {
        let points = unit.to_points(value);
        if !points.is_finite() || points < 0.0 {
            return Err(ConversionError::InvalidInput(format!(
                "List vertical padding must be a finite, non-negative length, got {} {:?}",
                value, unit
            )));
        }
        self.list_vertical_padding = points;
        Ok(self)
    }

    /// Set the maximum nesting depth kept when parsing markup
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn text_style(&self, tag_name: &str) -> Option<&TextStyle> {
        self.text_styles.get(&tag_name.to_ascii_lowercase())
    }

    /// Apply the configured container transform for `tag_name`, if any
    pub fn apply_container_style(&self, tag_name: &str, container: Container) -> Container {
        match self.container_styles.get(&tag_name.to_ascii_lowercase()) {
            Some(transform) => transform(container),
            None => container,
        }
    }

    pub fn resolve_image(&self, src: &str) -> Option<Vec<u8>> {
        (self.image_resolver)(src)
    }

    /// Vertical list padding in points
    pub fn list_vertical_padding(&self) -> f32 {
        self.list_vertical_padding
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for ConversionOptions {
    /// Options carrying the built-in tag styles
    fn default() -> Self {
        let mut options = Self::empty();

        let heading_sizes = [32.0, 28.0, 24.0, 20.0, 16.0, 14.0];
        for (level, size) in heading_sizes.iter().enumerate() {
            let tag = format!("h{}", level + 1);
            options = options
                .with_text_style(&tag, TextStyle::new().size(*size).bold())
                .with_container_style(&tag, |c| c.padding_bottom(6.0));
        }

        for tag in ["b", "strong"] {
            options = options.with_text_style(tag, TextStyle::new().bold());
        }
        for tag in ["i", "em", "cite", "var"] {
            options = options.with_text_style(tag, TextStyle::new().italic());
        }
        for tag in ["u", "ins"] {
            options = options.with_text_style(tag, TextStyle::new().underline());
        }
        for tag in ["s", "strike", "del"] {
            options = options.with_text_style(tag, TextStyle::new().strikethrough());
        }
        for tag in ["code", "kbd", "samp", "tt"] {
            options = options.with_text_style(tag, TextStyle::new().monospace());
        }
        if let Some(blue) = HexColor::parse("blue") {
            options = options.with_text_style("a", TextStyle::new().color(blue).underline());
        }

        options
            .with_text_style("small", TextStyle::new().size(10.0))
            .with_container_style("p", |c| c.padding_vertical(4.0))
            .with_container_style("blockquote", |c| c.padding_left(20.0))
    }
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text_tags: Vec<&String> = self.text_styles.keys().collect();
        text_tags.sort();
        let mut container_tags: Vec<&String> = self.container_styles.keys().collect();
        container_tags.sort();

        f.debug_struct("ConversionOptions")
            .field("text_styles", &text_tags)
            .field("container_styles", &container_tags)
            .field("list_vertical_padding", &self.list_vertical_padding)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Decoration, Sides};
    use crate::style::FontWeight;

    #[test]
    fn test_unit_conversion() {
        assert_eq!(Unit::Point.to_points(10.0), 10.0);
        assert_eq!(Unit::Inch.to_points(1.0), 72.0);
        assert!((Unit::Centimetre.to_points(2.54) - 72.0).abs() < 1e-3);
        assert!((Unit::Millimetre.to_points(25.4) - 72.0).abs() < 1e-3);
        assert!((Unit::Mil.to_points(1000.0) - 72.0).abs() < 1e-3);
    }

    #[test]
    fn test_list_padding_validation() {
        let options = ConversionOptions::default()
            .with_list_vertical_padding(1.0, Unit::Inch)
            .expect("valid padding");
        assert_eq!(options.list_vertical_padding(), 72.0);

        let err = ConversionOptions::default()
            .with_list_vertical_padding(-1.0, Unit::Point)
            .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidInput(_)));

        assert!(
            ConversionOptions::default()
                .with_list_vertical_padding(f32::NAN, Unit::Point)
                .is_err()
        );
    }

    #[test]
    fn test_default_tag_styles() {
        let options = ConversionOptions::default();
        let h2 = options.text_style("H2").expect("h2 style");
        assert_eq!(h2.size, Some(28.0));
        assert_eq!(h2.weight, Some(FontWeight::Bold));
        assert_eq!(options.text_style("em").and_then(|s| s.italic), Some(true));
        assert!(options.text_style("div").is_none());
        assert!(ConversionOptions::empty().text_style("h1").is_none());
    }

    #[test]
    fn test_text_style_override_replaces() {
        let options = ConversionOptions::default().with_text_style("h1", TextStyle::new().size(50.0));
        let h1 = options.text_style("h1").expect("h1 style");
        assert_eq!(h1.size, Some(50.0));
        assert_eq!(h1.weight, None);
    }

    #[test]
    fn test_container_style_applied_by_tag() {
        let options = ConversionOptions::empty().with_container_style("DIV", |c| c.border(2.0));
        let styled = options.apply_container_style("div", Container::empty());
        assert_eq!(styled.decorations, vec![Decoration::Border(2.0)]);

        let untouched = options.apply_container_style("span", Container::empty());
        assert!(untouched.decorations.is_empty());

        let p = ConversionOptions::default().apply_container_style("p", Container::empty());
        assert_eq!(
            p.decorations,
            vec![Decoration::Padding(Sides {
                top: 4.0,
                right: 0.0,
                bottom: 4.0,
                left: 0.0
            })]
        );
    }

    #[test]
    fn test_default_image_resolver_returns_none() {
        assert!(ConversionOptions::default().resolve_image("a.png").is_none());
    }

    #[test]
    fn test_debug_lists_tags() {
        let options = ConversionOptions::empty().with_text_style("q", TextStyle::new().italic());
        let debug = format!("{:?}", options);
        assert!(debug.contains("\"q\""));
        assert!(debug.contains("list_vertical_padding"));
    }
}
