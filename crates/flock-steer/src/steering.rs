//! The four steering contributions.
//!
//! Each contribution is O(neighbor count) and returns `Vec3::ZERO` when it
//! has nothing to act on (no valid neighbors, no target).  Directions go
//! through [`safe_normalize`], so no contribution is ever NaN for finite
//! input.

use flock_core::{AgentConfig, BehaviorWeights, Vec3, safe_normalize};
use flock_spatial::Neighbor;

/// Neighbors closer than this are skipped by [`separation`]; their direction
/// is undefined and `1 / d` would blow up.
pub const SEPARATION_EPSILON: f32 = 1.0e-4;

/// Push away from neighbors strictly inside `separation_radius`.
///
/// Each contributing neighbor adds the unit vector pointing away from it,
/// scaled by `1 / distance`; the sum is averaged over the contributors.
pub fn separation(position: Vec3, neighbors: &[Neighbor], separation_radius: f32) -> Vec3 {
    let mut sum = Vec3::ZERO;
    let mut count = 0u32;
    for n in neighbors.iter().filter(|n| n.valid) {
        let away = position - n.position;
        let d = away.length();
        if d > SEPARATION_EPSILON && d < separation_radius {
            sum += away / (d * d);
            count += 1;
        }
    }
    if count == 0 { Vec3::ZERO } else { sum / count as f32 }
}

/// Steer toward the neighbors' mean heading: `normalize(mean(v_n) - v)`.
pub fn alignment(velocity: Vec3, neighbors: &[Neighbor]) -> Vec3 {
    match mean(neighbors, |n| n.velocity) {
        Some(avg) => safe_normalize(avg - velocity),
        None      => Vec3::ZERO,
    }
}

/// Steer toward the neighbors' centroid.
pub fn cohesion(position: Vec3, neighbors: &[Neighbor]) -> Vec3 {
    match mean(neighbors, |n| n.position) {
        Some(centroid) => safe_normalize(centroid - position),
        None           => Vec3::ZERO,
    }
}

/// Unit vector toward `target`; zero when there is none.
#[inline]
pub fn seek(position: Vec3, target: Option<Vec3>) -> Vec3 {
    target.map_or(Vec3::ZERO, |t| safe_normalize(t - position))
}

fn mean(neighbors: &[Neighbor], field: impl Fn(&Neighbor) -> Vec3) -> Option<Vec3> {
    let (sum, count) = neighbors
        .iter()
        .filter(|n| n.valid)
        .fold((Vec3::ZERO, 0u32), |(sum, count), n| (sum + field(n), count + 1));
    (count > 0).then(|| sum / count as f32)
}

// ── SteeringForces ────────────────────────────────────────────────────────────

/// Unweighted per-behavior breakdown of one agent's steering.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SteeringForces {
    pub separation: Vec3,
    pub alignment:  Vec3,
    pub cohesion:   Vec3,
    pub target:     Vec3,
}

impl SteeringForces {
    /// Evaluate all four contributions.  A contribution whose weight is zero
    /// is left at `Vec3::ZERO` without being computed.
    pub fn compute(
        position:  Vec3,
        velocity:  Vec3,
        neighbors: &[Neighbor],
        config:    &AgentConfig,
        target:    Option<Vec3>,
    ) -> Self {
        let w = &config.weights;
        let mut out = Self::default();
        if w.separation != 0.0 {
            out.separation = separation(position, neighbors, config.separation_radius);
        }
        if w.alignment != 0.0 {
            out.alignment = alignment(velocity, neighbors);
        }
        if w.cohesion != 0.0 {
            out.cohesion = cohesion(position, neighbors);
        }
        if w.target != 0.0 {
            out.target = seek(position, target);
        }
        out
    }

    /// Weighted sum.  Not normalized; the integrator's speed clamp bounds the
    /// effect downstream.
    #[inline]
    pub fn weighted(&self, weights: &BehaviorWeights) -> Vec3 {
        self.separation * weights.separation
            + self.alignment * weights.alignment
            + self.cohesion * weights.cohesion
            + self.target * weights.target
    }
}

/// Combined steering force for one agent.
#[inline]
pub fn aggregate(
    position:  Vec3,
    velocity:  Vec3,
    neighbors: &[Neighbor],
    config:    &AgentConfig,
    target:    Option<Vec3>,
) -> Vec3 {
    SteeringForces::compute(position, velocity, neighbors, config, target).weighted(&config.weights)
}
