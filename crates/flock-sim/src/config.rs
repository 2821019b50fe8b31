//! Flock-wide configuration.

use flock_spatial::{GridConfig, NeighborStrategy};
use flock_steer::AdaptiveConfig;

use crate::{SimError, SimResult};

/// Settings shared by the whole flock.  Per-agent tuning lives in
/// [`AgentConfig`](flock_core::AgentConfig).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FlockConfig {
    /// Cell size and nominal bounds of the spatial hash.
    pub grid: GridConfig,

    /// Neighbor query strategy at start-up; switchable at runtime.
    pub strategy: NeighborStrategy,

    /// Seconds of simulated time between resamples of a tracked target.
    /// `0` resamples every tick.
    pub target_refresh_secs: f32,

    /// `on_snapshot` fires on ticks that are a multiple of this.
    /// `0` disables snapshots.
    pub sample_interval_ticks: u64,

    /// Seed for populations spawned by [`FlockBuilder::scatter`](crate::FlockBuilder::scatter).
    pub seed: u64,

    /// Adaptive steering; `None` disables it.
    pub adaptive: Option<AdaptiveConfig>,
}

impl FlockConfig {
    pub fn validate(&self) -> SimResult<()> {
        self.grid.validate()?;
        if !(self.target_refresh_secs.is_finite() && self.target_refresh_secs >= 0.0) {
            return Err(SimError::Config(format!(
                "target_refresh_secs must be finite and >= 0, got {}",
                self.target_refresh_secs
            )));
        }
        if let Some(adaptive) = &self.adaptive {
            adaptive.validate()?;
        }
        Ok(())
    }
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            grid:                  GridConfig::default(),
            strategy:              NeighborStrategy::default(),
            target_refresh_secs:   0.1,
            sample_interval_ticks: 0,
            seed:                  0,
            adaptive:              None,
        }
    }
}
