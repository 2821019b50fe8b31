//! R-tree index over 3-D agent positions, backed by `rstar`.
//!
//! Bulk-loaded from the tick snapshot (bulk loading produces a far better
//! packed tree than repeated inserts and is O(n log n)).

use glam::Vec3;
use rstar::RTree;
use rstar::primitives::GeomWithData;

/// A 3-D point tagged with the agent slot it came from.
type SlotPoint = GeomWithData<[f32; 3], usize>;

/// Relative slack added to the query radius so rounding inside `rstar` can
/// never drop a boundary point; the exact test happens in the caller.
const RADIUS_SLACK: f32 = 1.0e-4;

/// R-tree of agent slots.
pub struct RTreeIndex {
    tree: RTree<SlotPoint>,
}

impl RTreeIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Number of slots inserted by the last build.
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    /// Rebuild from `positions` (slot `i` at `positions[i]`).
    ///
    /// Non-finite positions are left out: they can never be within a finite
    /// distance of anything.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        let points: Vec<SlotPoint> = positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .map(|(slot, p)| GeomWithData::new(p.to_array(), slot))
            .collect();
        self.tree = RTree::bulk_load(points);
    }

    /// Visit every slot within (roughly) `radius` of `center`.  Candidates
    /// must still be distance-filtered by the caller.  Stop early by
    /// returning `false` from `visit`.
    pub fn for_each_candidate<F>(&self, center: Vec3, radius: f32, mut visit: F)
    where
        F: FnMut(usize) -> bool,
    {
        if !center.is_finite() {
            return;
        }
        let r = radius.max(0.0) * (1.0 + RADIUS_SLACK) + f32::EPSILON;
        for point in self.tree.locate_within_distance(center.to_array(), r * r) {
            if !visit(point.data) {
                return;
            }
        }
    }
}

impl Default for RTreeIndex {
    fn default() -> Self {
        Self::new()
    }
}
