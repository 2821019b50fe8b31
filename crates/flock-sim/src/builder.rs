//! Fluent builder for constructing a [`Flock`].

use flock_agent::{AgentStore, AgentStoreBuilder};
use flock_core::{AgentConfig, Vec3};
use flock_spatial::NeighborIndex;

use crate::{Flock, FlockConfig, GlobalTarget, SimError, SimResult};

/// Fluent builder for [`Flock`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                  |
/// |-------------------|------------------------------------------|
/// | `.agents(store)`  | Empty store                              |
/// | `.scatter(..)`    | Not used; exclusive with `.agents`       |
/// | `.initial_speed`  | `0` (spawned agents at rest)             |
/// | `.target(t)`      | No global target                         |
///
/// # Example
///
/// ```rust
/// use flock_core::{AgentConfig, Vec3};
/// use flock_sim::{FlockBuilder, FlockConfig};
///
/// let flock = FlockBuilder::new(FlockConfig { seed: 7, ..FlockConfig::default() })
///     .scatter(64, Vec3::ZERO, 20.0, AgentConfig::default())
///     .initial_speed(1.0)
///     .build()?;
/// assert_eq!(flock.len(), 64);
/// # Ok::<(), flock_sim::SimError>(())
/// ```
pub struct FlockBuilder {
    config:  FlockConfig,
    agents:  Option<AgentStore>,
    scatter: Option<Scatter>,
    speed:   f32,
    target:  Option<GlobalTarget>,
}

struct Scatter {
    count:  usize,
    center: Vec3,
    radius: f32,
    config: AgentConfig,
}

impl FlockBuilder {
    pub fn new(config: FlockConfig) -> Self {
        Self { config, agents: None, scatter: None, speed: 0.0, target: None }
    }

    /// Start from an existing population.
    pub fn agents(mut self, agents: AgentStore) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Spawn `count` agents uniformly in the ball (`center`, `radius`), seeded
    /// from `config.seed`.
    pub fn scatter(mut self, count: usize, center: Vec3, radius: f32, config: AgentConfig) -> Self {
        self.scatter = Some(Scatter { count, center, radius, config });
        self
    }

    /// Initial speed (random direction) of agents spawned by
    /// [`scatter`](Self::scatter).
    pub fn initial_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn target(mut self, target: impl Into<GlobalTarget>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Validate the configuration and population and return an idle [`Flock`].
    pub fn build(self) -> SimResult<Flock> {
        self.config.validate()?;

        let agents = match (self.agents, self.scatter) {
            (Some(_), Some(_)) => {
                return Err(SimError::Config(
                    "`agents` and `scatter` are mutually exclusive".into(),
                ));
            }
            (Some(store), None) => {
                // The arrays are public; re-check what may have been edited
                // after registration.
                for config in &store.configs {
                    config.validate()?;
                }
                store
            }
            (None, Some(s)) => AgentStoreBuilder::new(self.config.seed)
                .config(s.config)
                .scatter(s.count, s.center, s.radius)
                .initial_speed(self.speed)
                .build()?,
            (None, None) => AgentStore::new(),
        };

        let index = NeighborIndex::new(self.config.grid, self.config.strategy)?;
        tracing::info!(
            agents = agents.len(),
            strategy = %self.config.strategy,
            cell_size = self.config.grid.cell_size,
            "flock built"
        );
        Ok(Flock::from_parts(self.config, agents, index, self.target))
    }
}
