//! Error types for layout planning

use std::fmt;

/// Errors that can occur while preparing a layout conversion
///
/// Conversion itself is best-effort and never fails once a tree exists;
/// these errors only surface at the input and configuration boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// Markup bytes are not valid UTF-8
    EncodingError(String),
    /// A configuration value was rejected
    InvalidInput(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::EncodingError(msg) => write!(f, "Encoding error: {}", msg),
            ConversionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ConversionError {}
