//! The owned, array-of-structs view of a single agent.

use flock_core::{AgentConfig, AgentId, Vec3};

/// One flocking entity.
///
/// `Agent` is how hosts hand agents to the registry and how the registry
/// hands copies back ([`AgentStore::get`][crate::AgentStore::get],
/// snapshots).  Inside the store the same data lives split across SoA
/// arrays; mutating a returned `Agent` does not affect the simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:       AgentId,
    pub position: Vec3,
    pub velocity: Vec3,
    pub config:   AgentConfig,
    /// Inactive agents are still visible to others as neighbors but are
    /// neither steered nor integrated.
    pub active:   bool,
}

impl Agent {
    /// A new active agent at rest.
    pub fn new(id: AgentId, position: Vec3, config: AgentConfig) -> Self {
        Self { id, position, velocity: Vec3::ZERO, config, active: true }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }
}
