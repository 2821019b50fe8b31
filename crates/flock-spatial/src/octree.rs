//! Bucketed point octree.
//!
//! Built top-down over a snapshot of positions: the root cube encloses every
//! finite point, and any node holding more than [`BUCKET_SIZE`] points is
//! split into up to eight non-empty octant children, down to
//! [`MAX_DEPTH`].  Each node owns a contiguous range of the `items` array,
//! so a leaf scan is a slice walk.
//!
//! Sphere queries descend only into nodes whose cube intersects the sphere.

use glam::Vec3;

/// Points per leaf before a node is split.
pub const BUCKET_SIZE: usize = 8;

/// Depth cap.  Stops runaway splitting when many points coincide.
pub const MAX_DEPTH: u32 = 10;

const NO_CHILD: u32 = u32::MAX;

/// Relative padding on the query radius and node cubes.  Child faces are
/// computed as `center ± quarter` and can sit an ulp off the parent's split
/// plane, so pruning stays conservative; the exact test happens in the caller.
const PRUNE_SLACK: f32 = 1.0e-4;

#[derive(Clone, Debug)]
struct Node {
    center:   Vec3,
    half:     f32,
    start:    usize,
    end:      usize,
    children: [u32; 8],
    leaf:     bool,
}

/// Point octree over agent slots.
#[derive(Default)]
pub struct Octree {
    nodes: Vec<Node>,
    items: Vec<usize>,
}

impl Octree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots inserted by the last build.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of nodes in the tree (0 when empty).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest node (root = 0).
    pub fn depth(&self) -> u32 {
        fn walk(tree: &Octree, node: u32, d: u32) -> u32 {
            let n = &tree.nodes[node as usize];
            if n.leaf {
                return d;
            }
            n.children
                .iter()
                .filter(|&&c| c != NO_CHILD)
                .map(|&c| walk(tree, c, d + 1))
                .max()
                .unwrap_or(d)
        }
        if self.nodes.is_empty() { 0 } else { walk(self, 0, 0) }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.items.clear();
    }

    /// Rebuild from `positions` (slot `i` at `positions[i]`).
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        self.clear();
        if positions.is_empty() {
            return;
        }
        self.items.extend(0..positions.len());

        let (lo, hi) = positions
            .iter()
            .filter(|p| p.is_finite())
            .fold((Vec3::INFINITY, Vec3::NEG_INFINITY), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        let (center, half) = if lo.cmple(hi).all() {
            // Pad so points on the max faces fall strictly inside.
            ((lo + hi) * 0.5, ((hi - lo).max_element() * 0.5).max(1.0e-3) * 1.001)
        } else {
            (Vec3::ZERO, 1.0)
        };

        self.build_node(positions, 0, positions.len(), center, half, 0);
    }

    fn build_node(
        &mut self,
        positions: &[Vec3],
        start:     usize,
        end:       usize,
        center:    Vec3,
        half:      f32,
        depth:     u32,
    ) -> u32 {
        let index = self.nodes.len() as u32;
        self.nodes.push(Node { center, half, start, end, children: [NO_CHILD; 8], leaf: true });

        if end - start <= BUCKET_SIZE || depth >= MAX_DEPTH {
            return index;
        }

        self.items[start..end].sort_unstable_by_key(|&slot| octant(positions[slot], center));

        let mut children = [NO_CHILD; 8];
        let quarter = half * 0.5;
        let mut cursor = start;
        for (oct, child) in children.iter_mut().enumerate() {
            let run_end = cursor
                + self.items[cursor..end]
                    .iter()
                    .take_while(|&&slot| octant(positions[slot], center) == oct)
                    .count();
            if run_end > cursor {
                let offset = Vec3::new(
                    if oct & 1 != 0 { quarter } else { -quarter },
                    if oct & 2 != 0 { quarter } else { -quarter },
                    if oct & 4 != 0 { quarter } else { -quarter },
                );
                *child = self.build_node(positions, cursor, run_end, center + offset, quarter, depth + 1);
            }
            cursor = run_end;
        }

        let node = &mut self.nodes[index as usize];
        node.children = children;
        node.leaf = false;
        index
    }

    /// Visit every slot stored in a node whose cube intersects the sphere
    /// (`center`, `radius`).  Candidates are *not* distance-filtered.  Stop
    /// early by returning `false` from `visit`.
    pub fn for_each_candidate<F>(&self, center: Vec3, radius: f32, mut visit: F)
    where
        F: FnMut(usize) -> bool,
    {
        if self.nodes.is_empty() {
            return;
        }
        let r = radius.max(0.0) * (1.0 + PRUNE_SLACK) + f32::EPSILON;
        let r2 = r * r;
        let mut stack = vec![0u32];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i as usize];
            // Non-finite query centers or node cubes give a NaN distance and
            // would prune everything; visit conservatively instead.
            let d2 = cube_distance_sq(node.center, node.half * (1.0 + PRUNE_SLACK), center);
            if d2 > r2 {
                continue;
            }
            if node.leaf {
                for &slot in &self.items[node.start..node.end] {
                    if !visit(slot) {
                        return;
                    }
                }
            } else {
                stack.extend(node.children.iter().copied().filter(|&c| c != NO_CHILD));
            }
        }
    }
}

/// Octant index of `p` relative to `center`: bit 0 = +x, bit 1 = +y, bit 2 = +z.
#[inline]
fn octant(p: Vec3, center: Vec3) -> usize {
    (p.x >= center.x) as usize | ((p.y >= center.y) as usize) << 1 | ((p.z >= center.z) as usize) << 2
}

/// Squared distance from `p` to the axis-aligned cube (`center`, `half`).
#[inline]
fn cube_distance_sq(center: Vec3, half: f32, p: Vec3) -> f32 {
    ((p - center).abs() - Vec3::splat(half)).max(Vec3::ZERO).length_squared()
}
