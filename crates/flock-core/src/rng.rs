//! Deterministic simulation-level RNG.
//!
//! The engine itself is deterministic and never draws random numbers during
//! a tick.  `SimRng` exists for spawning: scattering initial positions and
//! velocities reproducibly from a seed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::Vec3;

/// Seeded RNG for population setup.  Used only in single-threaded setup code.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform point inside the ball of `radius` around `center`
    /// (rejection sampling from the enclosing cube).
    pub fn point_in_ball(&mut self, center: Vec3, radius: f32) -> Vec3 {
        if !(radius > 0.0) {
            return center;
        }
        loop {
            let v = Vec3::new(
                self.0.gen_range(-1.0..=1.0),
                self.0.gen_range(-1.0..=1.0),
                self.0.gen_range(-1.0..=1.0),
            );
            if v.length_squared() <= 1.0 {
                return center + v * radius;
            }
        }
    }

    /// Uniformly random direction scaled to `speed`.
    pub fn velocity(&mut self, speed: f32) -> Vec3 {
        loop {
            let v = self.point_in_ball(Vec3::ZERO, 1.0);
            let len_sq = v.length_squared();
            if len_sq > 1.0e-4 {
                return v / len_sq.sqrt() * speed;
            }
        }
    }
}
