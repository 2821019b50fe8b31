//! `flock-steer`: turns a neighbor set into one steering force.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`steering`] | `separation`, `alignment`, `cohesion`, `seek`, `SteeringForces`, `aggregate` |
//! | [`adaptive`] | `AdaptiveConfig`, `SteeringMemory`: EMA nudge of the final force  |
//!
//! Every function here is pure and reads only the querying agent's own state
//! plus its [`Neighbor`](flock_spatial::Neighbor) snapshot, so the compute
//! phase can evaluate agents in any order or in parallel.
//!
//! Entries of a neighbor slice with `valid == false` are ignored everywhere,
//! so a full [`NeighborBuffer::slots`](flock_spatial::NeighborBuffer::slots)
//! can be passed as-is.

pub mod adaptive;
pub mod steering;


pub use adaptive::{AdaptiveConfig, SteeringMemory};
pub use steering::{SEPARATION_EPSILON, SteeringForces, aggregate, alignment, cohesion, seek, separation};
