//! `flock-core`: foundational types for the flock engine.
//!
//! This crate is a dependency of every other `flock-*` crate.  It has no
//! `flock-*` dependencies and only a handful of external ones (`glam`,
//! `rand`, `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`math`]        | `Vec3` re-export, zero-safe normalize / clamp helpers |
//! | [`config`]      | `AgentConfig`, `BehaviorWeights`                      |
//! | [`time`]        | `Tick`, `SimClock`                                    |
//! | [`rng`]         | `SimRng` (seeded spawning)                            |
//! | [`error`]       | `FlockError`, `FlockResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod math;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{AgentConfig, BehaviorWeights};
pub use error::{FlockError, FlockResult};
pub use ids::AgentId;
pub use math::{NORMALIZE_EPSILON, Vec3, clamp_length_to, safe_normalize};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
