//! Unified error types for the inpainting workspace
//!
//! [`InpaintError`] covers the failures shared by every crate: grid shape
//! problems, out-of-range pixel reads and configuration loading. Algorithm
//! modules define their own error enums and wrap this one.
//!
//! # Example
//!
//! ```ignore
//! use inpaint_core::{InpaintError, InpaintResult};
//!
//! fn check(shape: ImageShape, mask: &Mask) -> InpaintResult<()> {
//!     mask.check_shape(shape)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for grid, mask and configuration operations.
#[derive(Error, Debug)]
pub enum InpaintError {
    /// Grid has zero rows or zero columns
    #[error("Empty grid: {rows}x{cols} has no pixels")]
    EmptyGrid { rows: usize, cols: usize },

    /// Mask dimensions disagree with the declared image shape
    #[error("Mask shape mismatch: expected {expected:?}, found {found:?}")]
    MaskShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// Pixel read outside the grid
    #[error("Pixel ({row}, {col}) out of bounds for {rows}x{cols} grid")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Flattened vector length disagrees with the pixel count
    #[error("Dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (config file access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results using InpaintError.
pub type InpaintResult<T> = Result<T, InpaintError>;

impl From<toml::de::Error> for InpaintError {
    fn from(err: toml::de::Error) -> Self {
        InpaintError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for InpaintError {
    fn from(err: toml::ser::Error) -> Self {
        InpaintError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_index() {
        let err = InpaintError::IndexOutOfBounds {
            row: 4,
            col: 7,
            rows: 3,
            cols: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("(4, 7)"));
        assert!(msg.contains("3x3"));
    }

    #[test]
    fn test_mask_mismatch_display() {
        let err = InpaintError::MaskShapeMismatch {
            expected: (2, 3),
            found: (3, 2),
        };
        assert!(err.to_string().contains("expected (2, 3)"));
        assert!(err.to_string().contains("found (3, 2)"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InpaintError = io_err.into();
        assert!(matches!(err, InpaintError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let err: InpaintError = toml::from_str::<toml::Table>("reg = ").unwrap_err().into();
        assert!(matches!(err, InpaintError::Config(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> InpaintResult<()> {
            Err(InpaintError::EmptyGrid { rows: 0, cols: 4 })
        }

        fn outer() -> InpaintResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(InpaintError::EmptyGrid { .. })));
    }
}
