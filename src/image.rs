//! Image sizing
//!
//! An `img` element's size comes from its `width`/`height` attributes. When an
//! attribute is missing, a `width: <n>px` / `height: <n>px` declaration in the
//! inline style is used instead. Which dimensions are known decides the fit:
//!
//! | width | height | fit |
//! |-------|--------|-----|
//! | yes   | yes    | [`ImageFit::Unproportional`] |
//! | yes   | no     | [`ImageFit::FitWidth`] |
//! | no    | yes    | [`ImageFit::FitHeight`] |
//! | no    | no     | [`ImageFit::FitArea`] |
//!
//! The `src` attribute reaches the configured resolver exactly as written.
//! Sources the resolver cannot load are replaced by a 200x100 placeholder
//! instead of failing the conversion.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::ConversionOptions;
use crate::layout::{ImageBox, ImageFit, ImageSource};
use crate::tree::{MarkupTree, NodeId};

pub const PLACEHOLDER_WIDTH: u32 = 200;
pub const PLACEHOLDER_HEIGHT: u32 = 100;

// Anchored on a declaration boundary so `max-width` and `line-height` don't match
static STYLE_WIDTH: OnceLock<Option<Regex>> = OnceLock::new();
static STYLE_HEIGHT: OnceLock<Option<Regex>> = OnceLock::new();

/// Resolved size and fit of one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSizing {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: ImageFit,
}

impl ImageSizing {
    pub fn from_dimensions(width: Option<u32>, height: Option<u32>) -> Self {
        let fit = match (width, height) {
            (Some(_), Some(_)) => ImageFit::Unproportional,
            (Some(_), None) => ImageFit::FitWidth,
            (None, Some(_)) => ImageFit::FitHeight,
            (None, None) => ImageFit::FitArea,
        };
        Self { width, height, fit }
    }
}

fn dimension_attribute(tree: &MarkupTree, node: NodeId, name: &str) -> Option<u32> {
    tree.node(node)
        .attribute(name)
        .and_then(|value| value.trim().parse::<u32>().ok())
}

fn style_dimension(
    style: Option<&str>,
    cache: &'static OnceLock<Option<Regex>>,
    property: &str,
) -> Option<u32> {
    let pattern = cache
        .get_or_init(|| {
            Regex::new(&format!(r"(?i)(?:^|[;\s]){}\s*:\s*(\d+)\s*px", property)).ok()
        })
        .as_ref()?;
    pattern
        .captures(style?)
        .and_then(|captures| captures.get(1))
        .and_then(|value| value.as_str().parse::<u32>().ok())
}

/// Work out the size and fit of an `img` element
///
/// # Examples
///
/// ```
/// use html_layout_planner::image::resolve_image_fit;
/// use html_layout_planner::layout::ImageFit;
/// use html_layout_planner::tree::MarkupTree;
///
/// let mut tree = MarkupTree::new();
/// let img = tree.append_element(tree.root(), "img", &[("style", "width:150px")]);
///
/// let sizing = resolve_image_fit(&tree, img);
/// assert_eq!(sizing.fit, ImageFit::FitWidth);
/// assert_eq!(sizing.width, Some(150));
/// assert_eq!(sizing.height, None);
/// ```
pub fn resolve_image_fit(tree: &MarkupTree, node: NodeId) -> ImageSizing {
    let style = tree.node(node).attribute("style");

    let width = dimension_attribute(tree, node, "width")
        .or_else(|| style_dimension(style, &STYLE_WIDTH, "width"));
    let height = dimension_attribute(tree, node, "height")
        .or_else(|| style_dimension(style, &STYLE_HEIGHT, "height"));

    ImageSizing::from_dimensions(width, height)
}

/// Build the image box for an `img` element, resolving its source
pub fn image_box(tree: &MarkupTree, node: NodeId, options: &ConversionOptions) -> ImageBox {
    let src = tree.node(node).attribute("src").unwrap_or("").to_string();
    let sizing = resolve_image_fit(tree, node);

    let source = match options.resolve_image(&src) {
        Some(bytes) => ImageSource::Resolved(bytes),
        None => {
            log::debug!("Image source {:?} not resolved, using placeholder", src);
            ImageSource::Placeholder {
                width: PLACEHOLDER_WIDTH,
                height: PLACEHOLDER_HEIGHT,
            }
        }
    };

    ImageBox {
        src,
        source,
        fit: sizing.fit,
        width: sizing.width,
        height: sizing.height,
    }
}
