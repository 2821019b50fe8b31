//! Strategy-selectable neighbor queries over a frozen position snapshot.
//!
//! # Per-tick protocol
//!
//! ```text
//! index.rebuild(&store.positions);          // once, at tick start
//! for slot in 0..store.len() {              // any order, or in parallel
//!     index.find_neighbors(slot, &store, &mut buffers[slot]);
//! }
//! // only now may positions change
//! ```
//!
//! `find_neighbors` takes `&self`, so any number of queries may run
//! concurrently against one index.

use std::fmt;

use flock_agent::AgentStore;
use glam::Vec3;

use crate::{GridConfig, Neighbor, NeighborBuffer, Octree, RTreeIndex, SpatialGrid, SpatialResult};

/// Which structure generates neighbor candidates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborStrategy {
    /// Scan every agent: O(n) per query.  Correctness baseline; fine for
    /// small swarms.
    BruteForce,
    /// Uniform hash grid, scanning the agent's cell and its neighbors.
    #[default]
    SpatialHash,
    /// Bucketed point octree.
    Octree,
    /// `rstar` R-tree.
    RTree,
}

impl NeighborStrategy {
    pub const ALL: [NeighborStrategy; 4] = [
        NeighborStrategy::BruteForce,
        NeighborStrategy::SpatialHash,
        NeighborStrategy::Octree,
        NeighborStrategy::RTree,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NeighborStrategy::BruteForce  => "brute-force",
            NeighborStrategy::SpatialHash => "spatial-hash",
            NeighborStrategy::Octree      => "octree",
            NeighborStrategy::RTree       => "rtree",
        }
    }
}

impl fmt::Display for NeighborStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns one structure per strategy and answers neighbor queries with the
/// active one.  Only the active strategy's structure is rebuilt.
pub struct NeighborIndex {
    strategy: NeighborStrategy,
    grid:     SpatialGrid,
    octree:   Octree,
    rtree:    RTreeIndex,
    /// Slots `0..indexed` were present at the last rebuild.  Anything at or
    /// beyond it is "not yet indexed" and has no neighbors.
    indexed:  usize,
}

impl NeighborIndex {
    /// Build an empty index.  Fails only on an invalid grid configuration.
    pub fn new(grid: GridConfig, strategy: NeighborStrategy) -> SpatialResult<Self> {
        Ok(Self {
            strategy,
            grid:    SpatialGrid::new(grid)?,
            octree:  Octree::new(),
            rtree:   RTreeIndex::new(),
            indexed: 0,
        })
    }

    #[inline]
    pub fn strategy(&self) -> NeighborStrategy {
        self.strategy
    }

    /// Switch strategy.  The index is emptied; it becomes usable again at
    /// the next [`rebuild`](Self::rebuild).
    pub fn set_strategy(&mut self, strategy: NeighborStrategy) {
        if strategy != self.strategy {
            tracing::debug!(from = %self.strategy, to = %strategy, "neighbor strategy switched");
            self.strategy = strategy;
            self.clear();
        }
    }

    #[inline]
    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    #[inline]
    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    /// Number of slots covered by the last rebuild.
    #[inline]
    pub fn indexed(&self) -> usize {
        self.indexed
    }

    /// Forget every entry (e.g. after an agent is unregistered).  Queries
    /// return no neighbors until the next rebuild.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.octree.clear();
        self.rtree.clear();
        self.indexed = 0;
    }

    /// Rebuild the active strategy's structure from a position snapshot.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        match self.strategy {
            NeighborStrategy::BruteForce  => {}
            NeighborStrategy::SpatialHash => self.grid.rebuild(positions),
            NeighborStrategy::Octree      => self.octree.rebuild(positions),
            NeighborStrategy::RTree       => self.rtree.rebuild(positions),
        }
        self.indexed = positions.len();
    }

    /// Fill `buffer` with the agents within `slot`'s perception radius.
    ///
    /// The buffer is resized to the agent's `max_neighbors` and reset before
    /// use.  An agent `other` is included iff
    /// `distance(slot, other) <= perception_radius` and its id differs.
    /// Once the buffer is full, remaining in-range agents are dropped.
    ///
    /// Returns the number of valid entries written.
    pub fn find_neighbors(&self, slot: usize, store: &AgentStore, buffer: &mut NeighborBuffer) -> usize {
        let Some(config) = store.configs.get(slot) else {
            buffer.reset();
            return 0;
        };
        buffer.prepare(config.max_neighbors);
        if slot >= self.indexed {
            return 0;
        }

        let limit = self.indexed.min(store.len());
        let id = store.ids[slot];
        let center = store.positions[slot];
        let radius = config.perception_radius;
        let r2 = radius * radius;

        let mut consider = |other: usize| -> bool {
            if other == slot || other >= limit || store.ids[other] == id {
                return true;
            }
            let position = store.positions[other];
            let d2 = position.distance_squared(center);
            if d2 <= r2 {
                buffer.push(Neighbor {
                    id: store.ids[other],
                    position,
                    velocity: store.velocities[other],
                    distance: d2.sqrt(),
                    valid: true,
                });
                return !buffer.is_full();
            }
            true
        };

        match self.strategy {
            NeighborStrategy::BruteForce => {
                for other in 0..limit {
                    if !consider(other) {
                        break;
                    }
                }
            }
            NeighborStrategy::SpatialHash => self.grid.for_each_candidate(center, radius, consider),
            NeighborStrategy::Octree      => self.octree.for_each_candidate(center, radius, consider),
            NeighborStrategy::RTree       => self.rtree.for_each_candidate(center, radius, consider),
        }

        buffer.len()
    }
}
