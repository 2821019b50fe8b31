//! Rolling tick-time statistics.

use std::collections::VecDeque;
use std::time::Duration;

use crate::{FlockObserver, TickSample};

/// Observer that keeps the last `capacity` [`TickSample`]s.
///
/// ```rust
/// use flock_sim::{FlockBuilder, FlockConfig, PerfRecorder};
///
/// let mut flock = FlockBuilder::new(FlockConfig::default()).build()?;
/// let mut perf = PerfRecorder::new(30);
/// flock.run_ticks(50, 0.016, &mut perf)?;
/// assert_eq!(perf.len(), 30);
/// # Ok::<(), flock_sim::SimError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PerfRecorder {
    history:  VecDeque<TickSample>,
    capacity: usize,
}

impl PerfRecorder {
    /// `capacity` is raised to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { history: VecDeque::with_capacity(capacity), capacity }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples oldest-first.
    pub fn samples(&self) -> impl Iterator<Item = &TickSample> {
        self.history.iter()
    }

    pub fn latest(&self) -> Option<&TickSample> {
        self.history.back()
    }

    /// Mean total tick time over the history.
    pub fn mean_total(&self) -> Option<Duration> {
        let n = u32::try_from(self.history.len()).ok().filter(|&n| n > 0)?;
        let sum: Duration = self.history.iter().map(|s| s.total).sum();
        Some(sum / n)
    }

    /// Slowest tick in the history.
    pub fn max_total(&self) -> Option<Duration> {
        self.history.iter().map(|s| s.total).max()
    }

    /// Mean valid neighbors per stepped agent over the history.
    pub fn mean_neighbors(&self) -> Option<f64> {
        let (found, active) = self
            .history
            .iter()
            .fold((0usize, 0usize), |(f, a), s| (f + s.neighbors_found, a + s.active));
        (active > 0).then(|| found as f64 / active as f64)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

impl Default for PerfRecorder {
    fn default() -> Self {
        Self::new(120)
    }
}

impl FlockObserver for PerfRecorder {
    fn on_tick_end(&mut self, sample: &TickSample) {
        if self.history.len() == self.capacity {
            self.history.pop_front();
        }
        self.history.push_back(*sample);
    }
}
