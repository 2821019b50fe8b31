//! The `Flock` struct and its tick loop.

use std::time::Instant;

use flock_agent::{Agent, AgentStore, integrate};
use flock_core::{AgentConfig, AgentId, FlockError, SimClock, Vec3};
use flock_spatial::{Neighbor, NeighborBuffer, NeighborIndex, NeighborStrategy};
use flock_steer::{AdaptiveConfig, SteeringMemory, aggregate};

use crate::target::TargetTracker;
use crate::{
    FlockConfig, FlockObserver, GlobalTarget, NoopObserver, SimError, SimResult, SimState,
    TickSample,
};

// ── Flock ─────────────────────────────────────────────────────────────────────

/// A flock of agents and everything needed to step it.
///
/// Per-slot scratch (`buffers`, `memory`, `forces`) is kept parallel to the
/// [`AgentStore`] arrays: pushed on register, `swap_remove`d on unregister at
/// the slot the store reports.
///
/// Create via [`FlockBuilder`][crate::FlockBuilder].
pub struct Flock {
    config: FlockConfig,
    clock:  SimClock,
    state:  SimState,
    agents: AgentStore,
    index:  NeighborIndex,
    target: TargetTracker,

    /// Last neighbor query result of each slot.
    buffers: Vec<NeighborBuffer>,
    /// Adaptive steering state of each slot.
    memory:  Vec<SteeringMemory>,
    /// Forces produced by the compute phase, consumed by the apply phase.
    forces:  Vec<Vec3>,

    last_sample: Option<TickSample>,
}

impl Flock {
    pub(crate) fn from_parts(
        config: FlockConfig,
        agents: AgentStore,
        index:  NeighborIndex,
        target: Option<GlobalTarget>,
    ) -> Self {
        let n = agents.len();
        let mut flock = Self {
            config,
            clock:       SimClock::new(),
            state:       SimState::Idle,
            buffers:     agents.configs.iter().map(|c| NeighborBuffer::new(c.max_neighbors)).collect(),
            memory:      vec![SteeringMemory::default(); n],
            forces:      vec![Vec3::ZERO; n],
            agents,
            index,
            target:      TargetTracker::default(),
            last_sample: None,
        };
        if let Some(t) = target {
            flock.target.set(t);
        }
        flock
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> SimState {
        self.state
    }

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    #[inline]
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Read-only SoA view of every agent.
    #[inline]
    pub fn agents(&self) -> &AgentStore {
        &self.agents
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn neighbor_strategy(&self) -> NeighborStrategy {
        self.index.strategy()
    }

    /// Target position agents steer toward on the next tick.
    #[inline]
    pub fn current_target(&self) -> Option<Vec3> {
        self.target.current()
    }

    /// Sample of the most recent completed tick.
    #[inline]
    pub fn last_sample(&self) -> Option<&TickSample> {
        self.last_sample.as_ref()
    }

    pub fn get_agent(&self, id: AgentId) -> Option<Agent> {
        self.agents.get(id)
    }

    /// Copy of every agent, in slot order.
    pub fn get_all_agents(&self) -> Vec<Agent> {
        self.agents.snapshot()
    }

    /// Valid neighbors found for `id` by the last tick that stepped it.
    ///
    /// Empty for an agent that has not been stepped yet.
    pub fn get_neighbors(&self, id: AgentId) -> Option<&[Neighbor]> {
        self.neighbor_buffer(id).map(NeighborBuffer::valid)
    }

    /// Full fixed-capacity buffer of `id`, invalid slots included.
    pub fn neighbor_buffer(&self, id: AgentId) -> Option<&NeighborBuffer> {
        self.agents.slot_of(id).map(|slot| &self.buffers[slot])
    }

    /// Adaptive steering state of `id`.
    pub fn steering_memory(&self, id: AgentId) -> Option<&SteeringMemory> {
        self.agents.slot_of(id).map(|slot| &self.memory[slot])
    }

    // ── Registry ──────────────────────────────────────────────────────────

    /// Add an agent.  Returns `false` if its id is already registered.
    ///
    /// The agent joins the spatial index on the next tick; until then it has
    /// no neighbors and is nobody's neighbor.
    pub fn register_agent(&mut self, agent: Agent) -> SimResult<bool> {
        let capacity = agent.config.max_neighbors;
        let Some(slot) = self.agents.register(agent)? else {
            return Ok(false);
        };
        debug_assert_eq!(slot, self.buffers.len());
        self.buffers.push(NeighborBuffer::new(capacity));
        self.memory.push(SteeringMemory::default());
        self.forces.push(Vec3::ZERO);
        Ok(true)
    }

    /// Remove an agent and return it.  Unknown ids are a no-op (`None`).
    pub fn unregister_agent(&mut self, id: AgentId) -> Option<Agent> {
        let Some((slot, agent)) = self.agents.unregister(id) else {
            tracing::debug!(%id, "unregister of unknown agent ignored");
            return None;
        };
        self.buffers.swap_remove(slot);
        self.memory.swap_remove(slot);
        self.forces.swap_remove(slot);
        // Slots moved; the index is rebuilt at the start of the next tick.
        self.index.clear();
        Some(agent)
    }

    /// Replace `id`'s configuration, rejecting invalid values.
    pub fn set_agent_config(&mut self, id: AgentId, config: AgentConfig) -> SimResult<()> {
        self.agents.set_config(id, config)?;
        Ok(())
    }

    /// Replace `id`'s configuration with a clamped copy of `config` and
    /// return what was stored.
    pub fn set_agent_config_clamped(&mut self, id: AgentId, config: AgentConfig) -> SimResult<AgentConfig> {
        Ok(self.agents.set_config_clamped(id, config)?)
    }

    /// Inactive agents stay in the index (others still see them) but are not
    /// stepped.
    pub fn set_agent_active(&mut self, id: AgentId, active: bool) -> SimResult<()> {
        self.agents.set_active(id, active)?;
        Ok(())
    }

    // ── Target and strategy ───────────────────────────────────────────────

    /// Replace the shared target; it is sampled immediately.
    pub fn set_global_target(&mut self, target: impl Into<GlobalTarget>) {
        let target = target.into();
        tracing::debug!(global_target = ?target, "global target set");
        self.target.set(target);
    }

    pub fn clear_global_target(&mut self) {
        self.target.clear();
    }

    /// Switch the neighbor query strategy.  Takes effect on the next tick.
    pub fn set_neighbor_strategy(&mut self, strategy: NeighborStrategy) {
        self.config.strategy = strategy;
        self.index.set_strategy(strategy);
    }

    /// Enable, retune or (`None`) disable adaptive steering.  Disabling
    /// forgets every agent's memory.
    pub fn set_adaptive(&mut self, adaptive: Option<AdaptiveConfig>) -> SimResult<()> {
        if let Some(a) = &adaptive {
            a.validate()?;
        } else {
            self.memory.iter_mut().for_each(SteeringMemory::reset);
        }
        self.config.adaptive = adaptive;
        Ok(())
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// `Idle → Running`.
    pub fn start(&mut self) -> SimResult<()> {
        self.transition("start", SimState::Running, |s| s == SimState::Idle)
    }

    /// `Running → Paused`.
    pub fn pause(&mut self) -> SimResult<()> {
        self.transition("pause", SimState::Paused, |s| s == SimState::Running)
    }

    /// `Paused → Running`.
    pub fn resume(&mut self) -> SimResult<()> {
        self.transition("resume", SimState::Running, |s| s == SimState::Paused)
    }

    /// Any non-stopped state `→ Stopped`.
    pub fn stop(&mut self) -> SimResult<()> {
        self.stop_with(&mut NoopObserver)
    }

    /// [`stop`](Self::stop), then `observer.on_stop`.
    pub fn stop_with<O: FlockObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.transition("stop", SimState::Stopped, |s| !s.is_stopped())?;
        observer.on_stop(&self.clock);
        Ok(())
    }

    fn transition(
        &mut self,
        action:  &'static str,
        to:      SimState,
        allowed: impl Fn(SimState) -> bool,
    ) -> SimResult<()> {
        let from = self.state;
        if !allowed(from) {
            return Err(SimError::InvalidTransition { from, action });
        }
        self.state = to;
        tracing::debug!(%from, %to, "flock state changed");
        Ok(())
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance every active agent by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> SimResult<()> {
        self.tick_with(dt, &mut NoopObserver)
    }

    /// [`tick`](Self::tick) with observer callbacks.
    ///
    /// - `Stopped`: fails with [`SimError::Stopped`].
    /// - `Paused`: returns without doing anything.
    /// - `Idle`: starts the flock, then ticks.
    ///
    /// `dt` must be finite and `>= 0`.  A rejected `dt`, `dt == 0` and a
    /// tick over an empty registry all return before anything changes: no
    /// auto-start, no clock advance, no sample, no callbacks.
    pub fn tick_with<O: FlockObserver>(&mut self, dt: f32, observer: &mut O) -> SimResult<()> {
        match self.state {
            SimState::Stopped => return Err(SimError::Stopped),
            SimState::Paused  => return Ok(()),
            SimState::Idle | SimState::Running => {}
        }
        if !(dt.is_finite() && dt >= 0.0) {
            tracing::warn!(dt, "rejected invalid timestep");
            return Err(FlockError::InvalidTimestep(dt).into());
        }
        if dt == 0.0 || self.agents.is_empty() {
            return Ok(());
        }
        if self.state == SimState::Idle {
            self.start()?;
        }

        let sample = self.process_tick(dt, observer)?;
        observer.on_tick_end(&sample);
        // Snapshots count completed ticks, so the first lands after
        // `sample_interval_ticks` ticks.
        let completed = self.clock.current_tick;
        if completed.is_every(self.config.sample_interval_ticks) {
            observer.on_snapshot(completed, &self.agents);
        }
        self.last_sample = Some(sample);
        Ok(())
    }

    /// Call [`tick_with`](Self::tick_with) `n` times.  The first error
    /// aborts the run.
    pub fn run_ticks<O: FlockObserver>(&mut self, n: u64, dt: f32, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.tick_with(dt, observer)?;
        }
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: FlockObserver>(&mut self, dt: f32, observer: &mut O) -> SimResult<TickSample> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let started = Instant::now();

        // ── Phase 1: freeze positions into the index ──────────────────────
        self.index.rebuild(&self.agents.positions);
        let rebuilt = Instant::now();

        // ── Phase 2: compute (read-only over agent state) ─────────────────
        let (neighbors_found, truncated) = self.compute_forces();
        let computed = Instant::now();

        // ── Phase 3: apply (each agent writes only its own slot) ──────────
        self.apply_forces(dt)?;
        let applied = Instant::now();

        // ── Phase 4: bookkeeping ──────────────────────────────────────────
        self.target.advance(dt, self.config.target_refresh_secs);
        self.clock.advance(dt);
        let total = started.elapsed();

        let sample = TickSample {
            tick: now,
            agents: self.agents.len(),
            active: self.agents.active_count(),
            neighbors_found,
            truncated,
            rebuild:   rebuilt - started,
            compute:   computed - rebuilt,
            integrate: applied - computed,
            total,
        };
        tracing::debug!(
            tick = %now,
            active = sample.active,
            neighbors = neighbors_found,
            truncated,
            total_us = sample.total.as_micros() as u64,
            "tick complete"
        );
        Ok(sample)
    }

    /// Query neighbors and aggregate steering for every active agent.
    ///
    /// Returns `(neighbor entries found, agents whose buffer filled up)`.
    fn compute_forces(&mut self) -> (usize, usize) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let agents   = &self.agents;
        let index    = &self.index;
        let target   = self.target.current();
        let adaptive = self.config.adaptive;

        let step = |slot: usize, buffer: &mut NeighborBuffer, memory: &mut SteeringMemory, force: &mut Vec3| {
            if !agents.active[slot] {
                *force = Vec3::ZERO;
                return (0, 0);
            }
            let found = index.find_neighbors(slot, agents, buffer);
            let config = &agents.configs[slot];
            let mut f = aggregate(
                agents.positions[slot],
                agents.velocities[slot],
                buffer.valid(),
                config,
                target,
            );
            if let Some(a) = &adaptive {
                f = memory.adjust(f, a);
            }
            *force = f;
            (found, usize::from(buffer.is_full()))
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.buffers
                .iter_mut()
                .zip(self.memory.iter_mut())
                .zip(self.forces.iter_mut())
                .enumerate()
                .map(|(slot, ((buffer, memory), force))| step(slot, buffer, memory, force))
                .fold((0, 0), |(f, t), (df, dt)| (f + df, t + dt))
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.buffers
                .par_iter_mut()
                .zip(self.memory.par_iter_mut())
                .zip(self.forces.par_iter_mut())
                .enumerate()
                .map(|(slot, ((buffer, memory), force))| step(slot, buffer, memory, force))
                .reduce(|| (0, 0), |(f, t), (df, dt)| (f + df, t + dt))
        }
    }

    /// Integrate every active agent under its computed force.
    fn apply_forces(&mut self, dt: f32) -> SimResult<()> {
        let forces     = self.forces.as_slice();
        let configs    = self.agents.configs.as_slice();
        let active     = self.agents.active.as_slice();
        let positions  = &mut self.agents.positions;
        let velocities = &mut self.agents.velocities;

        #[cfg(not(feature = "parallel"))]
        {
            for (slot, (position, velocity)) in positions.iter_mut().zip(velocities.iter_mut()).enumerate() {
                if active[slot] {
                    integrate(position, velocity, forces[slot], dt, configs[slot].max_speed)?;
                }
            }
            Ok(())
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            positions
                .par_iter_mut()
                .zip(velocities.par_iter_mut())
                .enumerate()
                .filter(|(slot, _)| active[*slot])
                .try_for_each(|(slot, (position, velocity))| {
                    integrate(position, velocity, forces[slot], dt, configs[slot].max_speed)
                })?;
            Ok(())
        }
    }
}
