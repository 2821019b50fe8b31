//! Engine error type.
//!
//! Sub-crates define their own error enums and wrap `FlockError` as one
//! variant via `#[from]`, so `?` works across layer boundaries.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `flock-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlockError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field:  &'static str,
        reason: String,
    },

    #[error("invalid timestep {0}: dt must be finite and > 0")]
    InvalidTimestep(f32),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),
}

impl FlockError {
    /// Shorthand for building an [`FlockError::InvalidConfig`].
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        FlockError::InvalidConfig { field, reason: reason.into() }
    }
}

/// Shorthand result type for all `flock-*` crates.
pub type FlockResult<T> = Result<T, FlockError>;
