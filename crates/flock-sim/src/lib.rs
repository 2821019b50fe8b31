//! `flock-sim`: tick loop orchestrator for the flock engine.
//!
//! # Two-phase tick
//!
//! ```text
//! tick(dt):
//!   ① Rebuild : index every agent's position (frozen snapshot).
//!   ② Compute : per active agent: query neighbors, aggregate steering,
//!               optional adaptive nudge.  Reads the snapshot only
//!               (parallel with the `parallel` feature).
//!   ③ Apply   : per active agent: integrate its own force under the
//!               max-speed clamp (parallel with the `parallel` feature).
//!   ④ Target  : advance the global target refresh timer.
//!   ⑤ Clock   : advance tick counter and simulated time.
//!   ⑥ Observe : on_tick_end with a TickSample; on_snapshot at intervals.
//! ```
//!
//! No position changes until every agent's force for the tick is known, so
//! results do not depend on evaluation order.
//!
//! # Lifecycle
//!
//! `Idle → Running ⇄ Paused → Stopped`.  [`Flock::tick`] starts an idle
//! flock, does nothing while paused, and fails once stopped.  Registration,
//! configuration and target changes are accepted in every state; they take
//! `&mut self`, so they can never overlap a tick.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the compute and apply phases on Rayon's pool.      |
//! | `fx-hash`  | FxHash for the id registry and grid buckets.            |
//! | `serde`    | Derives `Serialize`/`Deserialize` on config and samples. |
//!
//! # Quick-start
//!
//! ```rust
//! use flock_core::{AgentConfig, Vec3};
//! use flock_sim::{FlockBuilder, FlockConfig, GlobalTarget};
//!
//! let mut flock = FlockBuilder::new(FlockConfig::default())
//!     .scatter(200, Vec3::ZERO, 50.0, AgentConfig::default())
//!     .target(GlobalTarget::Fixed(Vec3::new(100.0, 0.0, 0.0)))
//!     .build()?;
//! for _ in 0..10 {
//!     flock.tick(1.0 / 60.0)?;
//! }
//! assert_eq!(flock.clock().current_tick.0, 10);
//! # Ok::<(), flock_sim::SimError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod perf;
pub mod sim;
pub mod state;
pub mod target;

#[cfg(test)]
mod tests;

pub use builder::FlockBuilder;
pub use config::FlockConfig;
pub use error::{SimError, SimResult};
pub use observer::{FlockObserver, NoopObserver, TickSample};
pub use perf::PerfRecorder;
pub use sim::Flock;
pub use state::SimState;
pub use target::{GlobalTarget, TargetSource};
