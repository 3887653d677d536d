//! HTML Layout Planner
//!
//! This library turns HTML markup into a layout plan for a page-composition
//! engine: a tree of decorated containers holding paragraphs, list items,
//! images and explicitly placed table cells. The planner decides structure,
//! styles and placements; measuring, pagination and drawing are left to the
//! engine that consumes the plan.
//!
//! # Architecture
//!
//! The library is structured into several modules:
//! - `parser`: HTML5 parsing using html5ever, copied into an arena tree
//! - `tree`: the arena markup tree with index-based parent links
//! - `security`: element filtering, nesting limits and link sanitization
//! - `classify`: node predicates and composer selection by tag
//! - `style`: inline style parsing and per-tag style cascade
//! - `list`: list item numbering
//! - `table`: table grid layout with colspan/rowspan occupancy
//! - `image`: image sizing, fit selection and source resolution
//! - `layout`: the layout plan types
//! - `config`: conversion options
//! - `converter`: the composition dispatcher
//!
//! # Examples
//!
//! ```rust
//! use html_layout_planner::{ConversionOptions, LayoutConverter};
//!
//! let options = ConversionOptions::default()
//!     .with_container_style("blockquote", |c| c.padding_left(30.0));
//! let converter = LayoutConverter::new(options);
//!
//! let plan = converter.convert_html("<blockquote>Quoted <em>text</em></blockquote>");
//! assert!(!plan.is_empty());
//! ```

// Module declarations
pub mod classify;
pub mod config;
pub mod converter;
pub mod error;
pub mod image;
pub mod layout;
pub mod list;
pub mod parser;
pub mod security;
pub mod style;
pub mod table;
pub mod tree;

// Re-export main types for convenience
pub use config::ConversionOptions;
pub use converter::LayoutConverter;
pub use error::ConversionError;
pub use layout::LayoutPlan;
pub use parser::parse_html;
