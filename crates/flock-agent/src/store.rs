//! `AgentStore`: arena storage for every registered agent.
//!
//! # Layout
//!
//! Agents live in dense, parallel `Vec`s (Structure-of-Arrays).  A *slot* is
//! an index into all of them; an `AgentId` is a stable identity.  The
//! registry map translates between the two:
//!
//! ```ignore
//! let slot = store.slot_of(id)?;
//! let pos  = store.positions[slot];   // O(1), cache-friendly
//! ```
//!
//! Removal is `swap_remove`: the last agent moves into the vacated slot.
//! Callers that keep their own per-slot arrays (neighbor buffers, steering
//! memory) must mirror the removal using the slot returned by
//! [`AgentStore::unregister`].
//!
//! Spatial indices store slots, never references, so there are no ownership
//! cycles between the store and anything that indexes it.

use flock_core::{AgentConfig, AgentId, FlockError, FlockResult, Vec3};

use crate::Agent;

#[cfg(feature = "fx-hash")]
type SlotMap = rustc_hash::FxHashMap<AgentId, usize>;
#[cfg(not(feature = "fx-hash"))]
type SlotMap = std::collections::HashMap<AgentId, usize>;

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly [`len`](Self::len) elements.  The fields are
/// `pub` for direct indexed access on hot paths; structural changes (adding,
/// removing) must go through [`register`](Self::register) /
/// [`unregister`](Self::unregister) so the registry stays consistent.
#[derive(Default)]
pub struct AgentStore {
    pub ids:        Vec<AgentId>,
    pub positions:  Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub configs:    Vec<AgentConfig>,
    pub active:     Vec<bool>,

    slots:   SlotMap,
    next_id: u32,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate room for `capacity` agents.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut store = Self::default();
        store.reserve(capacity);
        store
    }

    pub fn reserve(&mut self, additional: usize) {
        self.ids.reserve(additional);
        self.positions.reserve(additional);
        self.velocities.reserve(additional);
        self.configs.reserve(additional);
        self.active.reserve(additional);
        self.slots.reserve(additional);
    }

    /// Number of registered agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of agents with the `active` flag set.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Allocate a fresh id.
    ///
    /// Ids are handed out in increasing order and are never equal to an id
    /// currently registered, so a live agent's id is never reused.
    pub fn next_id(&mut self) -> AgentId {
        loop {
            let id = AgentId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            if id.is_valid() && !self.slots.contains_key(&id) {
                return id;
            }
        }
    }

    // ── Registry ──────────────────────────────────────────────────────────

    /// Insert `agent` and return its slot.
    ///
    /// Returns `None` (and changes nothing) if `agent.id` is already
    /// registered or is the `INVALID` sentinel.  The configuration is
    /// validated first.
    pub fn register(&mut self, agent: Agent) -> FlockResult<Option<usize>> {
        agent.config.validate()?;
        if !agent.id.is_valid() || self.slots.contains_key(&agent.id) {
            tracing::debug!(id = %agent.id, "duplicate or invalid registration ignored");
            return Ok(None);
        }

        let slot = self.ids.len();
        // Keep next_id ahead of host-supplied ids so allocation stays cheap.
        if agent.id.0 >= self.next_id {
            self.next_id = agent.id.0.saturating_add(1);
        }
        self.slots.insert(agent.id, slot);
        self.ids.push(agent.id);
        self.positions.push(agent.position);
        self.velocities.push(agent.velocity);
        self.configs.push(agent.config);
        self.active.push(agent.active);
        Ok(Some(slot))
    }

    /// Remove the agent with `id`.
    ///
    /// Returns the vacated slot and the removed agent, or `None` for an
    /// unknown id.  After the call, the agent formerly in the last slot (if
    /// any) occupies the returned slot.
    pub fn unregister(&mut self, id: AgentId) -> Option<(usize, Agent)> {
        let slot = self.slots.remove(&id)?;

        let agent = Agent {
            id:       self.ids.swap_remove(slot),
            position: self.positions.swap_remove(slot),
            velocity: self.velocities.swap_remove(slot),
            config:   self.configs.swap_remove(slot),
            active:   self.active.swap_remove(slot),
        };

        if let Some(&moved) = self.ids.get(slot) {
            self.slots.insert(moved, slot);
        }
        Some((slot, agent))
    }

    /// Slot currently occupied by `id`.
    #[inline]
    pub fn slot_of(&self, id: AgentId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    #[inline]
    pub fn contains(&self, id: AgentId) -> bool {
        self.slots.contains_key(&id)
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Owned copy of the agent in `slot`.
    ///
    /// # Panics
    /// Panics if `slot >= len()`.
    pub fn agent_at(&self, slot: usize) -> Agent {
        Agent {
            id:       self.ids[slot],
            position: self.positions[slot],
            velocity: self.velocities[slot],
            config:   self.configs[slot],
            active:   self.active[slot],
        }
    }

    /// Owned copy of the agent with `id`, if registered.
    pub fn get(&self, id: AgentId) -> Option<Agent> {
        self.slot_of(id).map(|slot| self.agent_at(slot))
    }

    /// Owned copies of every agent in slot order.
    pub fn snapshot(&self) -> Vec<Agent> {
        (0..self.len()).map(|slot| self.agent_at(slot)).collect()
    }

    // ── Writes between ticks ──────────────────────────────────────────────

    /// Replace an agent's configuration wholesale, rejecting invalid values.
    pub fn set_config(&mut self, id: AgentId, config: AgentConfig) -> FlockResult<()> {
        config.validate()?;
        let slot = self.slot_of(id).ok_or(FlockError::AgentNotFound(id))?;
        self.configs[slot] = config;
        Ok(())
    }

    /// Replace an agent's configuration after clamping it into range.
    /// Returns the configuration actually stored.
    pub fn set_config_clamped(&mut self, id: AgentId, config: AgentConfig) -> FlockResult<AgentConfig> {
        let slot = self.slot_of(id).ok_or(FlockError::AgentNotFound(id))?;
        let config = config.sanitized();
        self.configs[slot] = config;
        Ok(config)
    }

    pub fn set_active(&mut self, id: AgentId, active: bool) -> FlockResult<()> {
        let slot = self.slot_of(id).ok_or(FlockError::AgentNotFound(id))?;
        self.active[slot] = active;
        Ok(())
    }
}
