//! Error types for grid operations.

use thiserror::Error;

/// Main error type for grid operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The two grids do not have the same shape.
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, CoreError>;
