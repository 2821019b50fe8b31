//! Per-query neighbor records and the fixed-capacity buffer that holds them.

use flock_core::{AgentId, Vec3};

/// Snapshot of one neighbor as seen by the querying agent during one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbor {
    pub id:       AgentId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euclidean distance from the querying agent.
    pub distance: f32,
    /// `false` for buffer slots past the found count.
    pub valid:    bool,
}

impl Neighbor {
    /// Marker stored in every unused buffer slot.
    pub const INVALID: Neighbor = Neighbor {
        id:       AgentId::INVALID,
        position: Vec3::ZERO,
        velocity: Vec3::ZERO,
        distance: f32::INFINITY,
        valid:    false,
    };
}

impl Default for Neighbor {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Fixed-capacity, reusable neighbor result buffer.
///
/// The backing allocation has exactly `capacity` slots.  A query first
/// [`reset`](Self::reset)s the buffer (every slot marked invalid) and then
/// [`push`](Self::push)es results; once full, further pushes are silently
/// dropped.  Valid entries always form a prefix, exposed by
/// [`valid`](Self::valid).
#[derive(Clone, Debug, Default)]
pub struct NeighborBuffer {
    slots: Vec<Neighbor>,
    count: usize,
}

impl NeighborBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { slots: vec![Neighbor::INVALID; capacity], count: 0 }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of valid entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Mark every slot invalid.  Stale entries from a previous query can
    /// never be read as current.
    pub fn reset(&mut self) {
        self.slots[..self.count].fill(Neighbor::INVALID);
        self.count = 0;
    }

    /// Reset, changing the capacity first if it differs from `capacity`.
    /// Reallocates only when an agent's `max_neighbors` changed.
    pub fn prepare(&mut self, capacity: usize) {
        if self.slots.len() != capacity {
            self.slots.clear();
            self.slots.resize(capacity, Neighbor::INVALID);
            self.count = 0;
        } else {
            self.reset();
        }
    }

    /// Append a valid entry.  Returns `false` (and drops `neighbor`) when the
    /// buffer is already full.
    #[inline]
    pub fn push(&mut self, mut neighbor: Neighbor) -> bool {
        if self.count == self.slots.len() {
            return false;
        }
        neighbor.valid = true;
        self.slots[self.count] = neighbor;
        self.count += 1;
        true
    }

    /// The valid entries of the last query.
    #[inline]
    pub fn valid(&self) -> &[Neighbor] {
        &self.slots[..self.count]
    }

    /// Every slot, valid or not.
    #[inline]
    pub fn slots(&self) -> &[Neighbor] {
        &self.slots
    }

    /// Ids of the valid entries.
    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.valid().iter().map(|n| n.id)
    }
}
