//! Observer trait and the per-tick performance sample.

use std::time::Duration;

use flock_agent::AgentStore;
use flock_core::{SimClock, Tick};

/// Counters and phase timings of one completed tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickSample {
    pub tick:            Tick,
    /// Registered agents.
    pub agents:          usize,
    /// Agents that were stepped this tick.
    pub active:          usize,
    /// Sum of valid neighbor entries over all stepped agents.
    pub neighbors_found: usize,
    /// Agents whose neighbor buffer reached capacity (in-range neighbors may
    /// have been dropped).
    pub truncated:       usize,
    pub rebuild:         Duration,
    pub compute:         Duration,
    pub integrate:       Duration,
    pub total:           Duration,
}

/// Callbacks invoked by [`Flock::tick_with`][crate::Flock::tick_with] and
/// [`Flock::stop_with`][crate::Flock::stop_with].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: neighbor density logger
///
/// ```rust
/// use flock_sim::{FlockObserver, TickSample};
///
/// struct Density;
///
/// impl FlockObserver for Density {
///     fn on_tick_end(&mut self, s: &TickSample) {
///         if s.active > 0 {
///             println!("{}: {:.1} neighbors/agent", s.tick, s.neighbors_found as f64 / s.active as f64);
///         }
///     }
/// }
/// ```
pub trait FlockObserver {
    /// Called at the start of each tick, before the index rebuild.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the tick has been fully applied.
    fn on_tick_end(&mut self, _sample: &TickSample) {}

    /// Called whenever the number of completed ticks reaches a multiple of
    /// `config.sample_interval_ticks`, with read-only access to every agent.
    /// `tick` is that count, so the first call comes after the interval.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore) {}

    /// Called once when the flock is stopped.
    fn on_stop(&mut self, _clock: &SimClock) {}
}

/// A [`FlockObserver`] that does nothing.
pub struct NoopObserver;

impl FlockObserver for NoopObserver {}
