//! swarm: host loop driving a flock from the command line.
//!
//! ```text
//! cargo run -p swarm --release [-- path/to/config.json]
//! RUST_LOG=flock_sim=debug cargo run -p swarm
//! ```
//!
//! Without a config file the built-in defaults below are used.  The global
//! target orbits the origin; the host advances its phase before every tick
//! and the flock resamples it on its own refresh timer.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use flock_agent::AgentStore;
use flock_core::{AgentConfig, Tick, Vec3};
use flock_sim::{Flock, FlockBuilder, FlockConfig, FlockObserver, GlobalTarget, PerfRecorder, TickSample};
use flock_spatial::NeighborStrategy;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DemoConfig {
    agents:         usize,
    spawn_radius:   f32,
    initial_speed:  f32,
    ticks:          u64,
    dt:             f32,
    orbit_radius:   f32,
    /// Radians per simulated second.
    orbit_speed:    f32,
    /// Run every neighbor strategy on the same population and compare.
    compare:        bool,
    agent:          AgentConfig,
    flock:          FlockConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            agents:        2_000,
            spawn_radius:  80.0,
            initial_speed: 2.0,
            ticks:         600,
            dt:            1.0 / 60.0,
            orbit_radius:  150.0,
            orbit_speed:   0.2,
            compare:       false,
            agent:         AgentConfig::default(),
            flock:         FlockConfig { sample_interval_ticks: 120, ..FlockConfig::default() },
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let config: DemoConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    // User-facing tuning: clamp rather than reject.
    Ok(DemoConfig { agent: config.agent.sanitized(), ..config })
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Keeps tick timings and logs the flock's spread at snapshot ticks.
struct Report {
    perf: PerfRecorder,
}

impl FlockObserver for Report {
    fn on_tick_end(&mut self, sample: &TickSample) {
        self.perf.on_tick_end(sample);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore) {
        if agents.is_empty() {
            return;
        }
        let n = agents.len() as f32;
        let centroid = agents.positions.iter().copied().sum::<Vec3>() / n;
        let spread = agents.positions.iter().map(|p| p.distance(centroid)).sum::<f32>() / n;
        let speed = agents.velocities.iter().map(|v| v.length()).sum::<f32>() / n;
        tracing::info!(
            %tick,
            centroid = ?centroid,
            spread,
            speed,
            "snapshot"
        );
    }
}

// ── Run ───────────────────────────────────────────────────────────────────────

fn build_flock(config: &DemoConfig, strategy: NeighborStrategy, phase: &Arc<AtomicU32>) -> Result<Flock> {
    let orbit = config.orbit_radius;
    let shared = Arc::clone(phase);
    let target = GlobalTarget::tracked(move || {
        let a = f32::from_bits(shared.load(Ordering::Relaxed));
        Some(Vec3::new(a.cos() * orbit, 0.0, a.sin() * orbit))
    });
    let flock = FlockBuilder::new(FlockConfig { strategy, ..config.flock })
        .scatter(config.agents, Vec3::ZERO, config.spawn_radius, config.agent)
        .initial_speed(config.initial_speed)
        .target(target)
        .build()?;
    Ok(flock)
}

fn run(config: &DemoConfig, strategy: NeighborStrategy) -> Result<Report> {
    let phase = Arc::new(AtomicU32::new(0f32.to_bits()));
    let mut flock = build_flock(config, strategy, &phase)?;
    let mut report = Report { perf: PerfRecorder::new(config.ticks.min(1_000) as usize) };

    for _ in 0..config.ticks {
        let t = flock.clock().elapsed_secs as f32;
        phase.store((t * config.orbit_speed).to_bits(), Ordering::Relaxed);
        flock.tick_with(config.dt, &mut report)?;
    }
    flock.stop_with(&mut report)?;
    Ok(report)
}

fn print_summary(strategy: NeighborStrategy, perf: &PerfRecorder, wall: f64) {
    let mean = perf.mean_total().unwrap_or_default();
    let max = perf.max_total().unwrap_or_default();
    println!(
        "{:<13} {:>10.3} {:>10.3} {:>12.1} {:>9.2}",
        strategy.name(),
        mean.as_secs_f64() * 1e3,
        max.as_secs_f64() * 1e3,
        perf.mean_neighbors().unwrap_or(0.0),
        wall,
    );
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1);
    let config = load_config(path.as_deref().map(Path::new))?;

    println!("=== swarm: flocking engine demo ===");
    println!(
        "Agents: {}  |  Ticks: {}  |  dt: {:.4}s  |  Seed: {}",
        config.agents, config.ticks, config.dt, config.flock.seed
    );
    println!();

    let strategies: Vec<NeighborStrategy> = if config.compare {
        NeighborStrategy::ALL.to_vec()
    } else {
        vec![config.flock.strategy]
    };

    println!(
        "{:<13} {:>10} {:>10} {:>12} {:>9}",
        "strategy", "mean ms", "max ms", "neighbors", "wall s"
    );
    println!("{}", "-".repeat(58));
    for strategy in strategies {
        let t0 = Instant::now();
        let report = run(&config, strategy)?;
        print_summary(strategy, &report.perf, t0.elapsed().as_secs_f64());
    }

    Ok(())
}
