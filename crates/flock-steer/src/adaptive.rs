//! Opt-in adaptive adjustment of the aggregated steering force.
//!
//! Each agent keeps an exponential moving average of its own recent steering
//! forces and adds a fraction of it back to the current force.  The effect is
//! a mild momentum on steering decisions.  There is no learning signal and
//! no convergence guarantee; it is a tuning knob, off unless configured.

use flock_core::{FlockError, FlockResult, Vec3};

/// Parameters of the steering EMA.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdaptiveConfig {
    /// EMA factor in `(0, 1]`; `1` tracks only the latest force.
    pub smoothing: f32,
    /// Scale of the EMA added to the force, `>= 0`.
    pub influence: f32,
}

impl AdaptiveConfig {
    pub fn validate(&self) -> FlockResult<()> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(FlockError::config(
                "adaptive.smoothing",
                format!("must be in (0, 1], got {}", self.smoothing),
            ));
        }
        if !(self.influence.is_finite() && self.influence >= 0.0) {
            return Err(FlockError::config(
                "adaptive.influence",
                format!("must be finite and >= 0, got {}", self.influence),
            ));
        }
        Ok(())
    }

    /// Clamp both fields into range.  NaN smoothing becomes `1`, NaN
    /// influence becomes `0`.
    pub fn sanitized(&self) -> Self {
        let smoothing = if self.smoothing.is_nan() { 1.0 } else { self.smoothing.clamp(f32::EPSILON, 1.0) };
        let influence = if self.influence.is_finite() { self.influence.max(0.0) } else { 0.0 };
        Self { smoothing, influence }
    }
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self { smoothing: 0.2, influence: 0.1 }
    }
}

/// Per-agent EMA state.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringMemory {
    pub ema:     Vec3,
    pub samples: u64,
}

impl SteeringMemory {
    /// Fold `force` into the average and return `force + influence * ema`.
    ///
    /// The first sample seeds the average directly.  A non-finite `force` is
    /// returned unchanged and leaves the memory untouched.
    pub fn adjust(&mut self, force: Vec3, config: &AdaptiveConfig) -> Vec3 {
        if !force.is_finite() {
            return force;
        }
        self.ema = if self.samples == 0 {
            force
        } else {
            self.ema.lerp(force, config.smoothing)
        };
        self.samples += 1;
        force + self.ema * config.influence
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
