//! Per-agent tunable configuration.
//!
//! Two validation paths exist on purpose:
//!
//! - [`AgentConfig::validate`] / [`AgentConfig::new`] reject bad values.  Use
//!   these for programmatic construction, where a bad value is a bug.
//! - [`AgentConfig::sanitized`] clamps every field into its valid range.  Use
//!   it for values coming from sliders, config files and other user input.

use crate::{FlockError, FlockResult};

/// Smallest radius / speed the sanitizer will produce.
const MIN_POSITIVE: f32 = 1.0e-3;

// ── BehaviorWeights ───────────────────────────────────────────────────────────

/// Non-negative weights applied to the four steering contributions.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BehaviorWeights {
    pub separation: f32,
    pub alignment:  f32,
    pub cohesion:   f32,
    pub target:     f32,
}

impl BehaviorWeights {
    /// All four weights zero: the agent coasts on its current velocity.
    pub const ZERO: BehaviorWeights = BehaviorWeights {
        separation: 0.0,
        alignment:  0.0,
        cohesion:   0.0,
        target:     0.0,
    };

    pub fn new(separation: f32, alignment: f32, cohesion: f32, target: f32) -> Self {
        Self { separation, alignment, cohesion, target }
    }

    fn fields(&self) -> [(&'static str, f32); 4] {
        [
            ("weights.separation", self.separation),
            ("weights.alignment",  self.alignment),
            ("weights.cohesion",   self.cohesion),
            ("weights.target",     self.target),
        ]
    }

    fn validate(&self) -> FlockResult<()> {
        for (field, w) in self.fields() {
            if !w.is_finite() || w < 0.0 {
                return Err(FlockError::config(field, format!("must be finite and >= 0, got {w}")));
            }
        }
        Ok(())
    }

    fn sanitized(self) -> Self {
        let clamp = |w: f32| if w.is_finite() { w.max(0.0) } else { 0.0 };
        Self {
            separation: clamp(self.separation),
            alignment:  clamp(self.alignment),
            cohesion:   clamp(self.cohesion),
            target:     clamp(self.target),
        }
    }
}

impl Default for BehaviorWeights {
    fn default() -> Self {
        Self::new(1.5, 1.0, 1.0, 0.0)
    }
}

// ── AgentConfig ───────────────────────────────────────────────────────────────

/// Configuration snapshot for one agent.
///
/// Replaced wholesale between ticks; never partially mutated while a tick is
/// running (the simulation holds `&mut self` for the whole tick, so the
/// borrow checker enforces this).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    /// Upper bound on velocity magnitude after every integration step.
    pub max_speed: f32,

    /// Other agents within this distance (inclusive) are neighbors.
    pub perception_radius: f32,

    /// Neighbors strictly closer than this contribute to separation.
    /// Must satisfy `0 < separation_radius <= perception_radius`.
    pub separation_radius: f32,

    /// Capacity of the per-agent neighbor buffer.  Extra in-range agents are
    /// dropped, not reported.
    pub max_neighbors: usize,

    pub weights: BehaviorWeights,
}

impl AgentConfig {
    /// Build a config, rejecting any invalid field.
    pub fn new(
        max_speed:         f32,
        perception_radius: f32,
        separation_radius: f32,
        max_neighbors:     usize,
        weights:           BehaviorWeights,
    ) -> FlockResult<Self> {
        let cfg = Self { max_speed, perception_radius, separation_radius, max_neighbors, weights };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every invariant; the first violation is reported.
    pub fn validate(&self) -> FlockResult<()> {
        positive("max_speed", self.max_speed)?;
        positive("perception_radius", self.perception_radius)?;
        positive("separation_radius", self.separation_radius)?;
        if self.separation_radius > self.perception_radius {
            return Err(FlockError::config(
                "separation_radius",
                format!(
                    "must be <= perception_radius ({} > {})",
                    self.separation_radius, self.perception_radius
                ),
            ));
        }
        if self.max_neighbors == 0 {
            return Err(FlockError::config("max_neighbors", "must be > 0"));
        }
        self.weights.validate()
    }

    /// Return a copy with every field clamped into its valid range.
    ///
    /// The result always passes [`validate`](Self::validate).
    pub fn sanitized(&self) -> Self {
        let max_speed = clamp_positive(self.max_speed);
        let perception_radius = clamp_positive(self.perception_radius);
        let separation_radius = clamp_positive(self.separation_radius).min(perception_radius);
        Self {
            max_speed,
            perception_radius,
            separation_radius,
            max_neighbors: self.max_neighbors.max(1),
            weights: self.weights.sanitized(),
        }
    }

    /// Builder-style weight replacement.
    pub fn with_weights(mut self, weights: BehaviorWeights) -> Self {
        self.weights = weights;
        self
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_speed:         5.0,
            perception_radius: 10.0,
            separation_radius: 2.0,
            max_neighbors:     16,
            weights:           BehaviorWeights::default(),
        }
    }
}

fn positive(field: &'static str, v: f32) -> FlockResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(FlockError::config(field, format!("must be finite and > 0, got {v}")))
    }
}

fn clamp_positive(v: f32) -> f32 {
    if v.is_finite() { v.max(MIN_POSITIVE) } else { MIN_POSITIVE }
}
