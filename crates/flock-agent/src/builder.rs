//! Fluent builder for a seeded, randomly scattered population.
//!
//! # Usage
//!
//! ```rust
//! use flock_agent::AgentStoreBuilder;
//! use flock_core::{AgentConfig, Vec3};
//!
//! let store = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .config(AgentConfig::default())
//!     .scatter(500, Vec3::ZERO, 50.0)
//!     .initial_speed(2.0)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(store.len(), 500);
//! ```

use flock_core::{AgentConfig, FlockResult, SimRng, Vec3};

use crate::{Agent, AgentStore};

/// Fluent builder for [`AgentStore`].
///
/// Positions are drawn uniformly inside a ball, velocities uniformly over
/// directions at a fixed speed.  The same seed always yields the same
/// population.
pub struct AgentStoreBuilder {
    seed:   u64,
    config: AgentConfig,
    count:  usize,
    center: Vec3,
    radius: f32,
    speed:  f32,
}

impl AgentStoreBuilder {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            config: AgentConfig::default(),
            count:  0,
            center: Vec3::ZERO,
            radius: 0.0,
            speed:  0.0,
        }
    }

    /// Configuration shared by every spawned agent (validated in `build`).
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Spawn `count` agents uniformly inside the ball (`center`, `radius`).
    pub fn scatter(mut self, count: usize, center: Vec3, radius: f32) -> Self {
        self.count = count;
        self.center = center;
        self.radius = radius;
        self
    }

    /// Initial speed of every agent (random direction).  Default: at rest.
    pub fn initial_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Allocate the store and register every agent with ids `0..count`.
    pub fn build(self) -> FlockResult<AgentStore> {
        self.config.validate()?;

        let mut rng = SimRng::new(self.seed);
        let mut store = AgentStore::with_capacity(self.count);
        for _ in 0..self.count {
            let id = store.next_id();
            let position = rng.point_in_ball(self.center, self.radius);
            let velocity = if self.speed > 0.0 { rng.velocity(self.speed) } else { Vec3::ZERO };
            store.register(Agent::new(id, position, self.config).with_velocity(velocity))?;
        }
        tracing::debug!(count = store.len(), seed = self.seed, "scattered agent population");
        Ok(store)
    }
}
