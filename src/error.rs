// src/error.rs

//! Error types for canvas construction and raster I/O.

use std::fmt;

/// Error returned by buffer construction and PNG load/save.
///
/// Out-of-bounds pixel access is not represented here. Callers clamp
/// coordinates before touching a buffer, so a bad index is a bug and
/// panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Width or height of zero at construction
    InvalidDimension { dx: usize, dy: usize },
    /// Malformed or unsupported image data on load
    Decode(String),
    /// Failed to encode or write image data on save
    Encode(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::InvalidDimension { dx, dy } => {
                write!(f, "invalid canvas size {}x{}: both sides must be at least 1", dx, dy)
            }
            EditorError::Decode(msg) => write!(f, "could not decode image: {}", msg),
            EditorError::Encode(msg) => write!(f, "could not encode image: {}", msg),
        }
    }
}

impl std::error::Error for EditorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_dimensions() {
        let err = EditorError::InvalidDimension { dx: 0, dy: 20 };
        assert!(err.to_string().contains("0x20"));
    }
}
