//! Uniform 3-D hash grid.
//!
//! # Layout
//!
//! Space inside [`GridBounds`] is cut into cubes of edge `cell_size`.  A
//! position maps to an integer [`CellKey`]; each non-empty cell owns a bucket
//! of agent slots.  Buckets live in a hash map, so memory is proportional to
//! occupied cells, not to the bounded volume.
//!
//! The grid is rebuilt from scratch every tick (positions change every tick,
//! so incremental maintenance would not pay for itself).  Bucket `Vec`s are
//! kept across rebuilds while their cell stays occupied, so a steady-state
//! swarm rebuilds without allocating.
//!
//! # Out-of-bounds positions
//!
//! Positions outside the bounds are clamped into the nearest edge cell.
//! Agents that wander off the nominal volume keep working, at the cost of
//! denser edge buckets.

use glam::{IVec3, Vec3};

use crate::{SpatialError, SpatialResult};

#[cfg(feature = "fx-hash")]
type CellMap = rustc_hash::FxHashMap<CellKey, Vec<usize>>;
#[cfg(not(feature = "fx-hash"))]
type CellMap = std::collections::HashMap<CellKey, Vec<usize>>;

/// Integer cell coordinate.  Always within `[0, dims)` when produced by
/// [`SpatialGrid::cell_of`].
pub type CellKey = IVec3;

/// Upper bound on cells per axis; keeps key arithmetic far from overflow.
const MAX_CELLS_PER_AXIS: f32 = (1 << 20) as f32;

// ── Config ────────────────────────────────────────────────────────────────────

/// Axis-aligned box of the nominal simulation volume.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl GridBounds {
    /// Build bounds, rejecting empty or non-finite extents.
    pub fn new(min: Vec3, max: Vec3) -> SpatialResult<Self> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Cube of half-extent `half` centered on the origin.
    pub fn cube(half: f32) -> SpatialResult<Self> {
        Self::new(Vec3::splat(-half), Vec3::splat(half))
    }

    pub fn validate(&self) -> SpatialResult<()> {
        for (axis, min, max) in [
            ('x', self.min.x, self.max.x),
            ('y', self.min.y, self.max.y),
            ('z', self.min.z, self.max.z),
        ] {
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(SpatialError::InvalidBounds { axis, min, max });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

impl Default for GridBounds {
    fn default() -> Self {
        Self { min: Vec3::splat(-500.0), max: Vec3::splat(500.0) }
    }
}

/// Construction parameters for [`SpatialGrid`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    /// Edge length of one cubic cell.  Queries are cheapest when this is
    /// close to the typical perception radius.
    pub cell_size: f32,
    pub bounds:    GridBounds,
}

impl GridConfig {
    pub fn validate(&self) -> SpatialResult<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SpatialError::InvalidCellSize(self.cell_size));
        }
        self.bounds.validate()
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { cell_size: 10.0, bounds: GridBounds::default() }
    }
}

// ── SpatialGrid ───────────────────────────────────────────────────────────────

/// Uniform hash grid of agent slots.
///
/// Always in a valid state: freshly built, after [`clear`](Self::clear), and
/// after every [`rebuild`](Self::rebuild).
pub struct SpatialGrid {
    cell_size: f32,
    inv_cell:  f32,
    bounds:    GridBounds,
    dims:      IVec3,
    cells:     CellMap,
    len:       usize,
}

impl SpatialGrid {
    /// Build an empty grid.  Rejects `cell_size <= 0` and degenerate bounds.
    pub fn new(config: GridConfig) -> SpatialResult<Self> {
        config.validate()?;
        let per_axis = (config.bounds.size() / config.cell_size)
            .ceil()
            .clamp(Vec3::ONE, Vec3::splat(MAX_CELLS_PER_AXIS));
        Ok(Self {
            cell_size: config.cell_size,
            inv_cell:  config.cell_size.recip(),
            bounds:    config.bounds,
            dims:      per_axis.as_ivec3(),
            cells:     CellMap::default(),
            len:       0,
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Number of cells along each axis.
    #[inline]
    pub fn dims(&self) -> IVec3 {
        self.dims
    }

    /// Number of slots inserted by the last rebuild.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.values().filter(|b| !b.is_empty()).count()
    }

    /// Drop every entry; the grid stays usable.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }

    /// Clear and repopulate from `positions` (slot `i` at `positions[i]`).
    /// O(n).
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        // Drop buckets that were empty last time; empty the rest in place.
        self.cells.retain(|_, bucket| {
            let keep = !bucket.is_empty();
            bucket.clear();
            keep
        });

        for (slot, &p) in positions.iter().enumerate() {
            let key = self.cell_of(p);
            self.cells.entry(key).or_default().push(slot);
        }
        self.len = positions.len();
    }

    /// Cell containing `p`, clamped to the grid.
    #[inline]
    pub fn cell_of(&self, p: Vec3) -> CellKey {
        // `as` saturates and maps NaN to 0, so this never panics.
        ((p - self.bounds.min) * self.inv_cell)
            .floor()
            .as_ivec3()
            .clamp(IVec3::ZERO, self.dims - IVec3::ONE)
    }

    /// The 3×3×3 block of keys centered on `key`, `key` itself included.
    ///
    /// Keys outside the grid are returned as-is; they simply have no bucket.
    pub fn cells_around(key: CellKey) -> [CellKey; 27] {
        let mut out = [IVec3::ZERO; 27];
        let mut i = 0;
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    out[i] = key + IVec3::new(dx, dy, dz);
                    i += 1;
                }
            }
        }
        out
    }

    /// Every in-grid key within `reach` cells of `key` on each axis.
    pub fn cells_within(&self, key: CellKey, reach: i32) -> impl Iterator<Item = CellKey> + use<> {
        let lo = (key - IVec3::splat(reach)).max(IVec3::ZERO);
        let hi = (key + IVec3::splat(reach)).min(self.dims - IVec3::ONE);
        (lo.z..=hi.z).flat_map(move |z| {
            (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| IVec3::new(x, y, z)))
        })
    }

    /// Slots stored in `key`'s bucket (empty for unknown keys).
    #[inline]
    pub fn cell(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map_or(&[], Vec::as_slice)
    }

    /// Visit every slot in cells that could hold a point within `radius` of
    /// `center`.  Candidates are *not* distance-filtered.  Stop early by
    /// returning `false` from `visit`.
    pub fn for_each_candidate<F>(&self, center: Vec3, radius: f32, mut visit: F)
    where
        F: FnMut(usize) -> bool,
    {
        if self.len == 0 {
            return;
        }
        let key = self.cell_of(center);
        let reach = (radius.max(0.0) * self.inv_cell).ceil().clamp(1.0, MAX_CELLS_PER_AXIS) as i32;

        if reach == 1 {
            for k in Self::cells_around(key) {
                for &slot in self.cell(k) {
                    if !visit(slot) {
                        return;
                    }
                }
            }
        } else {
            for k in self.cells_within(key, reach) {
                for &slot in self.cell(k) {
                    if !visit(slot) {
                        return;
                    }
                }
            }
        }
    }
}
