//! `flock-spatial`: proximity queries over a frozen snapshot of agent
//! positions.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`grid`]     | `SpatialGrid` (uniform 3-D hash grid), `GridConfig`, `GridBounds` |
//! | [`octree`]   | `Octree`: bucketed point octree                               |
//! | [`rtree`]    | `RTreeIndex`: `rstar` R-tree over 3-D points                  |
//! | [`neighbor`] | `Neighbor`, `NeighborBuffer` (fixed capacity, invalid slots)  |
//! | [`query`]    | `NeighborStrategy`, `NeighborIndex::find_neighbors`           |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                            |
//!
//! Every strategy is only a *candidate generator*.  The inclusion test
//! (`distance <= perception_radius`, `other != self`) is applied in one
//! place, [`NeighborIndex::find_neighbors`], so all strategies return the
//! same neighbor set for the same snapshot.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                       |
//! |-----------|--------------------------------------------------------------|
//! | `fx-hash` | FxHash for the grid's cell map.                              |
//! | `serde`   | Derives `Serialize`/`Deserialize` on config types.           |

pub mod error;
pub mod grid;
pub mod neighbor;
pub mod octree;
pub mod query;
pub mod rtree;


pub use error::{SpatialError, SpatialResult};
pub use grid::{CellKey, GridBounds, GridConfig, SpatialGrid};
pub use neighbor::{Neighbor, NeighborBuffer};
pub use octree::Octree;
pub use query::{NeighborIndex, NeighborStrategy};
pub use rtree::RTreeIndex;
