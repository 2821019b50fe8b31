//! Spatial-subsystem error type.

use thiserror::Error;

/// Errors produced by `flock-spatial`.  All of them are configuration
/// errors raised at construction; a built index has no runtime failure mode.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("cell size must be finite and > 0, got {0}")]
    InvalidCellSize(f32),

    #[error("grid bounds invalid on {axis} axis: min {min} must be < max {max}")]
    InvalidBounds {
        axis: char,
        min:  f32,
        max:  f32,
    },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
