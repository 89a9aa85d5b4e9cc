//! Errors raised by level generation

use thiserror::Error;

/// Errors that can occur while generating, solving or configuring a level.
///
/// An unreachable end point is not an error: the solver returns an empty path.
#[derive(Error, Debug)]
pub enum LevelError {
    /// Parameters that cannot produce a level (grid too small for the padding,
    /// budget larger than the excavatable area, zero candidates).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LevelError {
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, LevelError::InvalidConfiguration(_))
    }
}
