//! Integration tests for flock-sim.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use flock_agent::{Agent, AgentStore};
use flock_core::{AgentConfig, AgentId, BehaviorWeights, SimClock, Tick, Vec3};
use flock_spatial::{GridBounds, GridConfig, NeighborStrategy};

use crate::{
    Flock, FlockBuilder, FlockConfig, FlockObserver, GlobalTarget, NoopObserver, PerfRecorder,
    SimError, SimState, TickSample,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const DT: f32 = 0.1;

fn weights_only(weights: BehaviorWeights) -> AgentConfig {
    AgentConfig::new(5.0, 10.0, 2.0, 16, weights).unwrap()
}

fn test_config() -> FlockConfig {
    FlockConfig {
        grid: GridConfig { cell_size: 10.0, bounds: GridBounds::cube(100.0).unwrap() },
        ..FlockConfig::default()
    }
}

fn flock_with(agents: &[(u32, Vec3, Vec3)], config: AgentConfig) -> Flock {
    let mut store = AgentStore::new();
    for &(id, position, velocity) in agents {
        store
            .register(Agent::new(AgentId(id), position, config).with_velocity(velocity))
            .unwrap();
    }
    FlockBuilder::new(test_config()).agents(store).build().unwrap()
}

fn scattered(count: usize, seed: u64, strategy: NeighborStrategy) -> Flock {
    FlockBuilder::new(FlockConfig { seed, strategy, ..test_config() })
        .scatter(count, Vec3::ZERO, 30.0, AgentConfig::default())
        .initial_speed(2.0)
        .target(Vec3::new(50.0, 0.0, 0.0))
        .build()
        .unwrap()
}

fn kinematics(flock: &Flock) -> Vec<(AgentId, Vec3, Vec3)> {
    flock.get_all_agents().into_iter().map(|a| (a.id, a.position, a.velocity)).collect()
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn builds_empty_by_default() {
        let flock = FlockBuilder::new(FlockConfig::default()).build().unwrap();
        assert!(flock.is_empty());
        assert_eq!(flock.state(), SimState::Idle);
        assert_eq!(flock.current_target(), None);
    }

    #[test]
    fn rejects_invalid_grid() {
        let mut config = test_config();
        config.grid.cell_size = 0.0;
        assert!(matches!(FlockBuilder::new(config).build(), Err(SimError::Spatial(_))));
    }

    #[test]
    fn rejects_invalid_refresh_and_adaptive() {
        let config = FlockConfig { target_refresh_secs: -1.0, ..test_config() };
        assert!(matches!(FlockBuilder::new(config).build(), Err(SimError::Config(_))));

        let config = FlockConfig {
            adaptive: Some(flock_steer::AdaptiveConfig { smoothing: 0.0, influence: 1.0 }),
            ..test_config()
        };
        assert!(matches!(FlockBuilder::new(config).build(), Err(SimError::Flock(_))));
    }

    #[test]
    fn agents_and_scatter_are_exclusive() {
        let result = FlockBuilder::new(test_config())
            .agents(AgentStore::new())
            .scatter(4, Vec3::ZERO, 1.0, AgentConfig::default())
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn scatter_is_seeded() {
        let a = scattered(50, 3, NeighborStrategy::SpatialHash);
        let b = scattered(50, 3, NeighborStrategy::SpatialHash);
        let c = scattered(50, 4, NeighborStrategy::SpatialHash);
        assert_eq!(kinematics(&a), kinematics(&b));
        assert_ne!(kinematics(&a), kinematics(&c));
    }

    #[test]
    fn target_is_sampled_at_build() {
        let flock = scattered(1, 1, NeighborStrategy::SpatialHash);
        assert_eq!(flock.current_target(), Some(Vec3::new(50.0, 0.0, 0.0)));
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut flock = scattered(3, 1, NeighborStrategy::SpatialHash);
        flock.start().unwrap();
        assert_eq!(flock.state(), SimState::Running);
        flock.pause().unwrap();
        assert_eq!(flock.state(), SimState::Paused);
        flock.resume().unwrap();
        assert_eq!(flock.state(), SimState::Running);
        flock.stop().unwrap();
        assert_eq!(flock.state(), SimState::Stopped);
    }

    #[test]
    fn illegal_transitions_are_rejected() {
        let mut flock = scattered(1, 1, NeighborStrategy::SpatialHash);
        assert!(matches!(
            flock.pause(),
            Err(SimError::InvalidTransition { from: SimState::Idle, action: "pause" })
        ));
        assert!(flock.resume().is_err());
        flock.start().unwrap();
        assert!(flock.start().is_err());
        flock.stop().unwrap();
        assert!(flock.stop().is_err());
        assert!(flock.start().is_err());
        assert_eq!(flock.state(), SimState::Stopped);
    }

    #[test]
    fn tick_auto_starts_from_idle() {
        let mut flock = scattered(2, 1, NeighborStrategy::SpatialHash);
        flock.tick(DT).unwrap();
        assert_eq!(flock.state(), SimState::Running);
        assert_eq!(flock.clock().current_tick, Tick(1));
    }

    #[test]
    fn paused_tick_is_noop() {
        let mut flock = scattered(5, 1, NeighborStrategy::SpatialHash);
        flock.tick(DT).unwrap();
        flock.pause().unwrap();
        let before = kinematics(&flock);
        flock.tick(DT).unwrap();
        assert_eq!(kinematics(&flock), before);
        assert_eq!(flock.clock().current_tick, Tick(1));
    }

    #[test]
    fn stopped_tick_errors() {
        let mut flock = scattered(2, 1, NeighborStrategy::SpatialHash);
        flock.stop().unwrap();
        assert!(matches!(flock.tick(DT), Err(SimError::Stopped)));
    }

    #[test]
    fn registry_mutation_allowed_when_stopped() {
        let mut flock = scattered(2, 1, NeighborStrategy::SpatialHash);
        flock.stop().unwrap();
        let cfg = AgentConfig::default();
        assert!(flock.register_agent(Agent::new(AgentId(100), Vec3::ZERO, cfg)).unwrap());
        assert!(flock.unregister_agent(AgentId(100)).is_some());
    }
}

// ── Timestep handling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod timestep {
    use super::*;

    #[test]
    fn zero_dt_is_idempotent() {
        let mut flock = scattered(40, 9, NeighborStrategy::SpatialHash);
        flock.tick(DT).unwrap();
        let before = kinematics(&flock);
        let clock = flock.clock().clone();
        for _ in 0..5 {
            flock.tick(0.0).unwrap();
        }
        assert_eq!(kinematics(&flock), before);
        assert_eq!(flock.clock(), &clock);
    }

    #[test]
    fn zero_dt_does_not_start_idle_flock() {
        let mut flock = scattered(5, 9, NeighborStrategy::SpatialHash);
        flock.tick(0.0).unwrap();
        assert_eq!(flock.state(), SimState::Idle);
        assert!(flock.last_sample().is_none());
    }

    #[test]
    fn negative_or_nan_dt_rejected_without_change() {
        let mut flock = scattered(10, 9, NeighborStrategy::SpatialHash);
        let before = kinematics(&flock);
        for dt in [-0.1, f32::NAN, f32::INFINITY] {
            assert!(matches!(flock.tick(dt), Err(SimError::Flock(_))), "{dt}");
        }
        assert_eq!(kinematics(&flock), before);
        assert_eq!(flock.clock().current_tick, Tick(0));
        assert_eq!(flock.state(), SimState::Idle);
        assert!(flock.last_sample().is_none());
    }

    #[test]
    fn clock_accumulates_dt() {
        let mut flock = scattered(1, 1, NeighborStrategy::SpatialHash);
        flock.run_ticks(4, 0.25, &mut NoopObserver).unwrap();
        assert_eq!(flock.clock().current_tick, Tick(4));
        assert!((flock.clock().elapsed_secs - 1.0).abs() < 1.0e-9);
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scenarios {
    use super::*;

    #[test]
    fn pair_separates_along_x() {
        let cfg = weights_only(BehaviorWeights::new(1.0, 0.0, 0.0, 0.0));
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO), (1, Vec3::X, Vec3::ZERO)], cfg);
        flock.tick(DT).unwrap();

        let a = flock.get_agent(AgentId(0)).unwrap();
        let b = flock.get_agent(AgentId(1)).unwrap();
        assert!(a.velocity.x < 0.0, "{a:?}");
        assert!(b.velocity.x > 0.0, "{b:?}");
        assert_eq!(a.velocity.y, 0.0);
        assert_eq!(a.velocity.z, 0.0);
        assert!(b.position.x - a.position.x > 1.0);
    }

    #[test]
    fn lone_agent_seeks_target() {
        let cfg = weights_only(BehaviorWeights::new(0.0, 0.0, 0.0, 1.0));
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0))], cfg);
        flock.set_global_target(GlobalTarget::Fixed(Vec3::new(10.0, 0.0, 0.0)));
        flock.tick(DT).unwrap();

        let a = flock.get_agent(AgentId(0)).unwrap();
        assert!(a.velocity.x > 0.0);
        assert!(a.position.x > 0.0);
        assert_eq!(flock.get_neighbors(AgentId(0)).unwrap().len(), 0);
    }

    #[test]
    fn empty_flock_ticks_cleanly() {
        let mut flock = FlockBuilder::new(test_config()).build().unwrap();
        let clock = flock.clock().clone();
        let mut perf = PerfRecorder::new(8);
        flock.run_ticks(3, DT, &mut perf).unwrap();
        assert!(flock.get_all_agents().is_empty());
        assert_eq!(flock.state(), SimState::Idle);
        assert_eq!(flock.clock(), &clock);
        assert!(flock.last_sample().is_none());
        assert!(perf.is_empty());
    }

    #[test]
    fn flock_emptied_while_running_stops_advancing() {
        let mut flock = scattered(1, 3, NeighborStrategy::SpatialHash);
        flock.tick(DT).unwrap();
        let id = flock.get_all_agents()[0].id;
        flock.unregister_agent(id).unwrap();
        flock.tick(DT).unwrap();
        assert_eq!(flock.clock().current_tick, Tick(1));
        assert_eq!(flock.state(), SimState::Running);
    }

    #[test]
    fn neighbor_buffer_truncates_to_capacity() {
        let base = weights_only(BehaviorWeights::default());
        let mut agents = vec![(0, Vec3::ZERO, Vec3::ZERO)];
        agents.extend((1..=10).map(|i| {
            let a = i as f32 * 0.6;
            (i, Vec3::new(a.cos(), a.sin(), 0.0) * 3.0, Vec3::ZERO)
        }));
        let mut flock = flock_with(&agents, base);
        let capped = AgentConfig { max_neighbors: 3, ..base };
        flock.set_agent_config(AgentId(0), capped).unwrap();
        flock.tick(DT).unwrap();

        let buf = flock.neighbor_buffer(AgentId(0)).unwrap();
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.len(), 3);
        assert_eq!(flock.get_neighbors(AgentId(0)).unwrap().len(), 3);
        assert!(flock.last_sample().unwrap().truncated >= 1);
    }

    #[test]
    fn unused_buffer_slots_are_invalid() {
        let cfg = weights_only(BehaviorWeights::default());
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO), (1, Vec3::X, Vec3::ZERO)], cfg);
        flock.tick(DT).unwrap();
        let buf = flock.neighbor_buffer(AgentId(0)).unwrap();
        assert_eq!(buf.capacity(), 16);
        assert_eq!(buf.len(), 1);
        assert!(buf.slots()[1..].iter().all(|n| !n.valid));
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;

    #[test]
    fn speed_never_exceeds_max() {
        let mut flock = scattered(300, 21, NeighborStrategy::SpatialHash);
        for _ in 0..30 {
            flock.tick(0.5).unwrap();
            for a in flock.get_all_agents() {
                assert!(a.velocity.length() <= a.config.max_speed * (1.0 + 1.0e-5), "{a:?}");
                assert!(a.position.is_finite());
            }
        }
    }

    #[test]
    fn strategies_find_identical_neighbor_sets() {
        let uncapped = AgentConfig { max_neighbors: 1_000, ..AgentConfig::default() };
        let mut runs = NeighborStrategy::ALL.map(|strategy| {
            FlockBuilder::new(FlockConfig { seed: 8, strategy, ..test_config() })
                .scatter(300, Vec3::ZERO, 30.0, uncapped)
                .build()
                .unwrap()
        });
        for flock in &mut runs {
            flock.tick(DT).unwrap();
        }
        let baseline = &runs[0];
        for flock in &runs[1..] {
            for a in baseline.get_all_agents() {
                let mut want: Vec<u32> = baseline.get_neighbors(a.id).unwrap().iter().map(|n| n.id.0).collect();
                let mut got: Vec<u32> = flock.get_neighbors(a.id).unwrap().iter().map(|n| n.id.0).collect();
                want.sort_unstable();
                got.sort_unstable();
                assert_eq!(want, got, "{} vs {}", baseline.neighbor_strategy(), flock.neighbor_strategy());
            }
        }
    }

    #[test]
    fn runtime_strategy_switch_keeps_results() {
        let mut a = scattered(120, 5, NeighborStrategy::SpatialHash);
        let mut b = scattered(120, 5, NeighborStrategy::SpatialHash);
        a.tick(DT).unwrap();
        b.tick(DT).unwrap();
        b.set_neighbor_strategy(NeighborStrategy::BruteForce);
        assert_eq!(b.neighbor_strategy(), NeighborStrategy::BruteForce);
        a.tick(DT).unwrap();
        b.tick(DT).unwrap();
        for agent in a.get_all_agents() {
            let na = a.get_neighbors(agent.id).unwrap().len();
            let nb = b.get_neighbors(agent.id).unwrap().len();
            assert_eq!(na, nb, "{}", agent.id);
        }
    }

    #[test]
    fn inactive_agents_are_frozen_but_visible() {
        let cfg = weights_only(BehaviorWeights::new(1.0, 0.0, 0.0, 0.0));
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO), (1, Vec3::X, Vec3::ZERO)], cfg);
        flock.set_agent_active(AgentId(1), false).unwrap();
        flock.tick(DT).unwrap();

        assert_eq!(flock.get_agent(AgentId(1)).unwrap().position, Vec3::X);
        assert!(flock.get_agent(AgentId(0)).unwrap().velocity.x < 0.0);
        assert_eq!(flock.last_sample().unwrap().active, 1);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut flock = scattered(2, 1, NeighborStrategy::SpatialHash);
        let ghost = AgentId(999);
        assert!(flock.get_agent(ghost).is_none());
        assert!(flock.get_neighbors(ghost).is_none());
        assert!(flock.set_agent_active(ghost, false).is_err());
        assert!(flock.set_agent_config(ghost, AgentConfig::default()).is_err());
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use super::*;

    #[test]
    fn duplicate_registration_is_noop() {
        let cfg = AgentConfig::default();
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO)], cfg);
        assert!(!flock.register_agent(Agent::new(AgentId(0), Vec3::ONE, cfg)).unwrap());
        assert_eq!(flock.len(), 1);
        assert_eq!(flock.get_agent(AgentId(0)).unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn invalid_config_registration_fails() {
        let mut flock = FlockBuilder::new(test_config()).build().unwrap();
        let bad = AgentConfig { max_neighbors: 0, ..AgentConfig::default() };
        assert!(flock.register_agent(Agent::new(AgentId(0), Vec3::ZERO, bad)).is_err());
        assert!(flock.is_empty());
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let mut flock = scattered(3, 1, NeighborStrategy::SpatialHash);
        assert!(flock.unregister_agent(AgentId(77)).is_none());
        assert_eq!(flock.len(), 3);
    }

    #[test]
    fn removed_agent_disappears_from_neighbor_sets() {
        let cfg = weights_only(BehaviorWeights::default());
        let mut flock = flock_with(
            &[(0, Vec3::ZERO, Vec3::ZERO), (1, Vec3::X, Vec3::ZERO), (2, Vec3::Y, Vec3::ZERO)],
            cfg,
        );
        flock.tick(DT).unwrap();
        assert_eq!(flock.get_neighbors(AgentId(2)).unwrap().len(), 2);

        let removed = flock.unregister_agent(AgentId(0)).unwrap();
        assert_eq!(removed.id, AgentId(0));
        flock.tick(DT).unwrap();
        let ids: Vec<AgentId> = flock.get_neighbors(AgentId(2)).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![AgentId(1)]);
        assert_eq!(flock.get_neighbors(AgentId(1)).unwrap()[0].id, AgentId(2));
    }

    #[test]
    fn late_registration_joins_next_tick() {
        let cfg = weights_only(BehaviorWeights::default());
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO)], cfg);
        flock.tick(DT).unwrap();
        assert!(flock.register_agent(Agent::new(AgentId(5), Vec3::X, cfg)).unwrap());
        assert_eq!(flock.get_neighbors(AgentId(5)).unwrap().len(), 0);
        flock.tick(DT).unwrap();
        assert_eq!(flock.get_neighbors(AgentId(5)).unwrap()[0].id, AgentId(0));
    }

    #[test]
    fn clamped_config_is_stored() {
        let mut flock = scattered(1, 1, NeighborStrategy::SpatialHash);
        let id = flock.get_all_agents()[0].id;
        let wild = AgentConfig {
            max_speed:         -3.0,
            perception_radius: 4.0,
            separation_radius: 9.0,
            max_neighbors:     0,
            weights:           BehaviorWeights::new(-1.0, f32::NAN, 2.0, 1.0),
        };
        let stored = flock.set_agent_config_clamped(id, wild).unwrap();
        assert!(stored.validate().is_ok());
        assert_eq!(flock.get_agent(id).unwrap().config, stored);
        assert!(flock.set_agent_config(id, wild).is_err());
    }
}

// ── Global target ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod target {
    use super::*;

    /// Tracked source whose x coordinate the test moves and whose samples
    /// are counted.
    fn moving_source() -> (GlobalTarget, Arc<AtomicU32>, Arc<AtomicU32>) {
        let x = Arc::new(AtomicU32::new(1.0f32.to_bits()));
        let calls = Arc::new(AtomicU32::new(0));
        let (x2, calls2) = (Arc::clone(&x), Arc::clone(&calls));
        let target = GlobalTarget::tracked(move || {
            calls2.fetch_add(1, Ordering::Relaxed);
            Some(Vec3::new(f32::from_bits(x2.load(Ordering::Relaxed)), 0.0, 0.0))
        });
        (target, x, calls)
    }

    #[test]
    fn tracked_target_refreshes_on_timer() {
        let mut flock = FlockBuilder::new(FlockConfig { target_refresh_secs: 1.0, ..test_config() })
            .scatter(1, Vec3::ZERO, 1.0, AgentConfig::default())
            .build()
            .unwrap();
        let (target, x, calls) = moving_source();
        flock.set_global_target(target);
        assert_eq!(calls.load(Ordering::Relaxed), 1);
        assert_eq!(flock.current_target(), Some(Vec3::X));

        x.store(5.0f32.to_bits(), Ordering::Relaxed);
        flock.tick(0.5).unwrap();
        assert_eq!(flock.current_target(), Some(Vec3::X));
        flock.tick(0.5).unwrap();
        assert_eq!(flock.current_target(), Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn zero_refresh_resamples_every_tick() {
        let mut flock = FlockBuilder::new(FlockConfig { target_refresh_secs: 0.0, ..test_config() })
            .scatter(1, Vec3::ZERO, 1.0, AgentConfig::default())
            .build()
            .unwrap();
        let (target, _x, calls) = moving_source();
        flock.set_global_target(target);
        flock.run_ticks(3, DT, &mut NoopObserver).unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn lost_or_cleared_target_gives_none() {
        let mut flock = FlockBuilder::new(test_config()).build().unwrap();
        flock.set_global_target(GlobalTarget::tracked(|| None::<Vec3>));
        assert_eq!(flock.current_target(), None);
        flock.set_global_target(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(flock.current_target(), None);
        flock.set_global_target(Vec3::ONE);
        assert_eq!(flock.current_target(), Some(Vec3::ONE));
        flock.clear_global_target();
        assert_eq!(flock.current_target(), None);
    }

    #[test]
    fn flock_drifts_toward_target() {
        let cfg = weights_only(BehaviorWeights::new(0.0, 0.0, 0.0, 1.0));
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO)], cfg);
        flock.set_global_target(Vec3::new(0.0, 0.0, -20.0));
        flock.run_ticks(20, DT, &mut NoopObserver).unwrap();
        let a = flock.get_agent(AgentId(0)).unwrap();
        assert!(a.position.z < -1.0);
        assert!(a.position.x.abs() < 1.0e-6);
    }
}

// ── Adaptive steering ─────────────────────────────────────────────────────────

#[cfg(test)]
mod adaptive {
    use flock_steer::AdaptiveConfig;

    use super::*;

    #[test]
    fn memory_only_updates_when_enabled() {
        let cfg = weights_only(BehaviorWeights::new(0.0, 0.0, 0.0, 1.0));
        let mut flock = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO)], cfg);
        flock.set_global_target(Vec3::new(10.0, 0.0, 0.0));
        flock.tick(DT).unwrap();
        assert_eq!(flock.steering_memory(AgentId(0)).unwrap().samples, 0);

        flock.set_adaptive(Some(AdaptiveConfig { smoothing: 0.5, influence: 1.0 })).unwrap();
        flock.run_ticks(3, DT, &mut NoopObserver).unwrap();
        let mem = flock.steering_memory(AgentId(0)).unwrap();
        assert_eq!(mem.samples, 3);
        assert!(mem.ema.x > 0.0);

        flock.set_adaptive(None).unwrap();
        assert_eq!(flock.steering_memory(AgentId(0)).unwrap().samples, 0);
    }

    #[test]
    fn adaptive_amplifies_consistent_steering() {
        let cfg = weights_only(BehaviorWeights::new(0.0, 0.0, 0.0, 1.0));
        let mut plain = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO)], cfg);
        let mut tuned = flock_with(&[(0, Vec3::ZERO, Vec3::ZERO)], cfg);
        tuned.set_adaptive(Some(AdaptiveConfig { smoothing: 0.5, influence: 1.0 })).unwrap();
        for flock in [&mut plain, &mut tuned] {
            flock.set_global_target(Vec3::new(10.0, 0.0, 0.0));
            flock.tick(DT).unwrap();
        }
        let vp = plain.get_agent(AgentId(0)).unwrap().velocity.x;
        let vt = tuned.get_agent(AgentId(0)).unwrap().velocity.x;
        assert!((vt - 2.0 * vp).abs() < 1.0e-5, "{vp} {vt}");
    }

    #[test]
    fn set_adaptive_rejects_invalid() {
        let mut flock = scattered(1, 1, NeighborStrategy::SpatialHash);
        assert!(flock.set_adaptive(Some(AdaptiveConfig { smoothing: 2.0, influence: 0.0 })).is_err());
        assert_eq!(flock.config().adaptive, None);
    }
}

// ── Observers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observers {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts:    Vec<Tick>,
        ends:      Vec<TickSample>,
        snapshots: Vec<(Tick, usize)>,
        stopped:   Option<SimClock>,
    }

    impl FlockObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.starts.push(tick);
        }
        fn on_tick_end(&mut self, sample: &TickSample) {
            self.ends.push(*sample);
        }
        fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore) {
            self.snapshots.push((tick, agents.len()));
        }
        fn on_stop(&mut self, clock: &SimClock) {
            self.stopped = Some(clock.clone());
        }
    }

    #[test]
    fn callbacks_fire_in_order() {
        let mut flock = FlockBuilder::new(FlockConfig { sample_interval_ticks: 2, ..test_config() })
            .scatter(20, Vec3::ZERO, 10.0, AgentConfig::default())
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        flock.run_ticks(5, DT, &mut rec).unwrap();
        flock.stop_with(&mut rec).unwrap();

        assert_eq!(rec.starts, (0..5).map(Tick).collect::<Vec<_>>());
        assert_eq!(rec.ends.iter().map(|s| s.tick).collect::<Vec<_>>(), rec.starts);
        // Snapshots count completed ticks: after the 2nd and the 4th.
        assert_eq!(rec.snapshots, vec![(Tick(2), 20), (Tick(4), 20)]);
        assert_eq!(rec.stopped.unwrap().current_tick, Tick(5));
        assert!(rec.ends.iter().all(|s| s.agents == 20 && s.active == 20));
    }

    #[test]
    fn paused_ticks_produce_no_callbacks() {
        let mut flock = scattered(4, 1, NeighborStrategy::SpatialHash);
        let mut rec = Recorder::default();
        flock.start().unwrap();
        flock.pause().unwrap();
        flock.run_ticks(3, DT, &mut rec).unwrap();
        assert!(rec.starts.is_empty() && rec.ends.is_empty());
    }

    #[test]
    fn sample_timings_are_consistent() {
        let mut flock = scattered(200, 2, NeighborStrategy::SpatialHash);
        flock.tick(DT).unwrap();
        let s = flock.last_sample().unwrap();
        assert!(s.total >= s.rebuild + s.compute + s.integrate);
        assert!(s.neighbors_found > 0);
    }

    #[test]
    fn perf_recorder_is_bounded() {
        let mut flock = scattered(30, 2, NeighborStrategy::SpatialHash);
        let mut perf = PerfRecorder::new(4);
        flock.run_ticks(10, DT, &mut perf).unwrap();
        assert_eq!(perf.len(), 4);
        assert_eq!(perf.latest().unwrap().tick, Tick(9));
        assert_eq!(perf.samples().next().unwrap().tick, Tick(6));
        let mean = perf.mean_total().unwrap();
        assert!(mean <= perf.max_total().unwrap());
        assert!(perf.mean_neighbors().unwrap() > 0.0);
        perf.clear();
        assert!(perf.mean_total().is_none());
    }

    #[test]
    fn observer_can_share_state() {
        struct Totals(Arc<Mutex<usize>>);
        impl FlockObserver for Totals {
            fn on_tick_end(&mut self, s: &TickSample) {
                *self.0.lock().unwrap() += s.neighbors_found;
            }
        }
        let total = Arc::new(Mutex::new(0));
        let mut flock = scattered(50, 2, NeighborStrategy::Octree);
        flock.run_ticks(3, DT, &mut Totals(Arc::clone(&total))).unwrap();
        assert!(*total.lock().unwrap() > 0);
    }
}
