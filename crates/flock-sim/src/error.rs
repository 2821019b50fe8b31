use flock_core::FlockError;
use flock_spatial::SpatialError;
use thiserror::Error;

use crate::SimState;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("cannot {action} a flock that is {from}")]
    InvalidTransition {
        from:   SimState,
        action: &'static str,
    },

    #[error("flock is stopped; no further ticks are accepted")]
    Stopped,

    #[error(transparent)]
    Flock(#[from] FlockError),

    #[error("spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

pub type SimResult<T> = Result<T, SimError>;
