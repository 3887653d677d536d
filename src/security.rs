//! Input filtering for untrusted markup
//!
//! Markup handed to the planner may come from users or upstream services.
//! The planner never executes anything, but some content must still be kept
//! out of the layout plan:
//! - Elements with no visual representation (`script`, `style`, `head`, ...)
//! - Hyperlinks with executable or local-resource schemes (`javascript:`, `file:`)
//! - Nesting deep enough to exhaust the stack of the recursive composer
//!
//! # Defense Layers
//!
//! 1. **Element Removal**: dropped while the arena is built, with their subtree
//! 2. **Depth Cap**: subtrees deeper than the maximum depth are truncated
//! 3. **URL Filtering**: blocked hyperlink targets render as plain content

/// Default maximum nesting depth kept in the markup tree
pub const MAX_NESTING_DEPTH: usize = 512;

/// Elements removed together with all of their children
const REMOVED_ELEMENTS: &[&str] = &[
    "script",   // JavaScript source
    "style",    // Stylesheets are not cascaded
    "noscript", // Alternative content for script-less browsers
    "template", // Inert fragments
    "head",     // Document metadata
    "title",    // Window title, not page content
    "meta",     // Metadata
    "link",     // External stylesheet references
    "base",     // Base URL changes
    "iframe",   // Embedded browsing contexts
    "object",   // Plugins
    "embed",    // Plugins
    "applet",   // Legacy Java applets
];

/// Hyperlink schemes that are never emitted as link targets
const BLOCKED_URL_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:", "file:", "about:"];

/// Action to take when an element is encountered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeAction {
    /// Keep the element
    Allow,
    /// Drop the element and all its children
    Remove,
}

/// Validator applied while building and composing the markup tree
#[derive(Debug, Clone)]
pub struct SecurityValidator {
    max_depth: usize,
}

impl SecurityValidator {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_NESTING_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decide what to do with an element
    ///
    /// # Examples
    ///
    /// ```
    /// use html_layout_planner::security::{SanitizeAction, SecurityValidator};
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(validator.check_element("script"), SanitizeAction::Remove);
    /// assert_eq!(validator.check_element("HEAD"), SanitizeAction::Remove);
    /// assert_eq!(validator.check_element("table"), SanitizeAction::Allow);
    /// ```
    pub fn check_element(&self, tag_name: &str) -> SanitizeAction {
        if REMOVED_ELEMENTS
            .iter()
            .any(|removed| removed.eq_ignore_ascii_case(tag_name))
        {
            SanitizeAction::Remove
        } else {
            SanitizeAction::Allow
        }
    }

    /// Returns `true` when `depth` is within the allowed nesting depth
    pub fn depth_allowed(&self, depth: usize) -> bool {
        depth <= self.max_depth
    }

    /// Check if a URL uses a blocked scheme (case and leading whitespace insensitive)
    pub fn is_dangerous_url(&self, url: &str) -> bool {
        let url_lower = url.trim().to_ascii_lowercase();
        BLOCKED_URL_SCHEMES
            .iter()
            .any(|scheme| url_lower.starts_with(scheme))
    }

    /// Returns the hyperlink target if it may be emitted
    ///
    /// Empty targets and blocked schemes yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use html_layout_planner::security::SecurityValidator;
    ///
    /// let validator = SecurityValidator::new();
    /// assert_eq!(validator.sanitize_url("javascript:alert(1)"), None);
    /// assert_eq!(validator.sanitize_url("  "), None);
    /// assert_eq!(validator.sanitize_url("https://example.com"), Some("https://example.com"));
    /// ```
    pub fn sanitize_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let trimmed = url.trim();
        if trimmed.is_empty() || self.is_dangerous_url(trimmed) {
            None
        } else {
            Some(trimmed)
        }
    }
}

impl Default for SecurityValidator {
    fn default() -> Self {
        Self::new()
    }
}
