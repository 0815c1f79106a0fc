/// View-frustum culling with spatial and temporal coherence.
///
/// Six half-spaces are extracted from a combined view-projection matrix
/// (Gribb & Hartmann). Each node carries a plane mask and the index of
/// the plane that culled it last:
///
/// - **Spatial coherence**: when a node is fully inside a plane, the
///   plane's mask bit is cleared and its children inherit the cleared
///   bit, skipping that plane test entirely.
/// - **Temporal coherence**: the plane that culled a node last frame is
///   tested first this frame — it is the most likely to cull it again.
///
/// Traversal walks the hierarchy in pre-order and skips a whole subtree
/// as soon as a node is found outside.

use glam::Mat4;
use crate::math::{Plane, PlaneSide};
use crate::tree::{Hierarchy, NodeId, PreOrderIterator, Statistics};

/// Frustum plane indices
pub const PLANE_NEAR: usize = 0;
pub const PLANE_LEFT: usize = 1;
pub const PLANE_RIGHT: usize = 2;
pub const PLANE_BOTTOM: usize = 3;
pub const PLANE_TOP: usize = 4;
pub const PLANE_FAR: usize = 5;

/// All mask bits set: every plane still needs testing (root state).
const MASK_ALL: u32 = 0xFFFF_FFFF;

/// Low six bits clear: the node is fully inside every frustum plane,
/// and so is its whole subtree.
const MASK_FULLY_INSIDE: u32 = 0xFFFF_FFC0;

/// Per-node culling state.
///
/// `plane_mask` bits 0..6 flag planes that still need testing; bits
/// 6..32 stay set so a fully-inside mask equals `MASK_FULLY_INSIDE`.
/// `plane_id` remembers the plane that culled this node last.
#[derive(Clone, Copy)]
struct CullingInfo {
    plane_id: u32,
    plane_mask: u32,
}

impl Default for CullingInfo {
    fn default() -> Self {
        Self {
            plane_id: 0,
            plane_mask: MASK_ALL,
        }
    }
}

/// Visitor invoked for every node inside the frustum, in pre-order.
pub trait FrustumCallback {
    /// `node` is at least partially inside the frustum. The callback
    /// may read the hierarchy freely but cannot mutate it.
    fn inside(&mut self, tree: &Hierarchy, node: NodeId);
}

pub struct FrustumCuller {
    planes: [Plane; 6],
    culling_info: Vec<CullingInfo>,
    iterator: PreOrderIterator,
}

impl Default for FrustumCuller {
    fn default() -> Self {
        Self::new()
    }
}

impl FrustumCuller {
    pub fn new() -> Self {
        Self {
            planes: [Plane::new(0.0, 0.0, 0.0, 0.0); 6],
            culling_info: Vec::new(),
            iterator: PreOrderIterator::new(),
        }
    }

    /// Size the per-node side table for a freshly built hierarchy.
    pub fn init(&mut self, stats: &Statistics) {
        self.culling_info.clear();
        self.culling_info
            .resize(stats.node_count as usize, CullingInfo::default());
    }

    /// Extract and normalize the six frustum planes from a combined
    /// matrix.
    ///
    /// Pass `projection * view` for world-space planes, or the
    /// projection alone for eye-space planes. The extraction assumes
    /// GL-style clip coordinates (`-w <= z' <= w`, e.g.
    /// `Mat4::perspective_rh_gl`).
    pub fn update_frustum_planes(&mut self, matrix: &Mat4) {
        // m[c][r]: column-major storage; "row 4 +/- row i" of the
        // mathematical matrix reads m[c][3] +/- m[c][i]
        let m = matrix.to_cols_array_2d();

        self.planes[PLANE_NEAR] = Plane::new(
            m[0][3] + m[0][2],
            m[1][3] + m[1][2],
            m[2][3] + m[2][2],
            m[3][3] + m[3][2],
        );
        self.planes[PLANE_LEFT] = Plane::new(
            m[0][3] + m[0][0],
            m[1][3] + m[1][0],
            m[2][3] + m[2][0],
            m[3][3] + m[3][0],
        );
        self.planes[PLANE_RIGHT] = Plane::new(
            m[0][3] - m[0][0],
            m[1][3] - m[1][0],
            m[2][3] - m[2][0],
            m[3][3] - m[3][0],
        );
        self.planes[PLANE_BOTTOM] = Plane::new(
            m[0][3] + m[0][1],
            m[1][3] + m[1][1],
            m[2][3] + m[2][1],
            m[3][3] + m[3][1],
        );
        self.planes[PLANE_TOP] = Plane::new(
            m[0][3] - m[0][1],
            m[1][3] - m[1][1],
            m[2][3] - m[2][1],
            m[3][3] - m[3][1],
        );
        self.planes[PLANE_FAR] = Plane::new(
            m[0][3] - m[0][2],
            m[1][3] - m[1][2],
            m[2][3] - m[2][2],
            m[3][3] - m[3][2],
        );

        for plane in &mut self.planes {
            plane.normalize();
        }
    }

    /// Is the node at least partially inside the frustum?
    ///
    /// Consults and updates the node's coherence state; parents must be
    /// classified before their children (any top-down traversal does
    /// this).
    pub fn contains(&mut self, tree: &Hierarchy, node: NodeId) -> bool {
        // Planes the parent was NOT fully inside of; only these need
        // testing here
        let mut plane_mask = self.parent_culling_mask(tree, node);

        // Parent fully inside the frustum: so is this node
        if plane_mask == MASK_FULLY_INSIDE {
            self.culling_info[node as usize].plane_mask = plane_mask;
            return true;
        }

        let bounding_box = tree.node(node).bounding_box();

        // Temporal coherence: test the plane that culled this node last
        // time first, unless the parent was fully inside it
        let culling_plane = self.culling_info[node as usize].plane_id as usize;
        let selector = 1u32 << culling_plane;
        if selector & plane_mask != 0 {
            match self.planes[culling_plane].classify_box(bounding_box) {
                PlaneSide::Negative => {
                    self.culling_info[node as usize].plane_mask = plane_mask;
                    return false;
                }
                PlaneSide::Positive => plane_mask ^= selector,
                PlaneSide::Intersecting => {}
            }
        }

        // Remaining planes
        let mut selector = 1u32;
        for plane_id in 0..6 {
            if selector & plane_mask != 0 {
                match self.planes[plane_id].classify_box(bounding_box) {
                    PlaneSide::Negative => {
                        let info = &mut self.culling_info[node as usize];
                        info.plane_mask = plane_mask;
                        info.plane_id = plane_id as u32;
                        return false;
                    }
                    // Fully inside this plane: children inherit the
                    // cleared bit and skip the test
                    PlaneSide::Positive => plane_mask ^= selector,
                    PlaneSide::Intersecting => {}
                }
            }
            selector <<= 1;
        }

        self.culling_info[node as usize].plane_mask = plane_mask;
        true
    }

    /// Pre-order traversal from `root`, invoking the callback for every
    /// node inside the frustum and skipping subtrees found outside.
    pub fn traverse(
        &mut self,
        tree: &Hierarchy,
        root: NodeId,
        callback: &mut dyn FrustumCallback,
    ) {
        debug_assert_eq!(
            self.culling_info.len(),
            tree.node_count(),
            "culler not initialized for this hierarchy"
        );

        let mut iterator = std::mem::take(&mut self.iterator);
        iterator.begin(root);

        while let Some(node) = iterator.current() {
            if self.contains(tree, node) {
                callback.inside(tree, node);
                iterator.next(tree);
            } else {
                iterator.skip();
            }
        }

        self.iterator = iterator;
    }

    fn parent_culling_mask(&self, tree: &Hierarchy, node: NodeId) -> u32 {
        match tree.node(node).parent() {
            Some(parent) => self.culling_info[parent as usize].plane_mask,
            None => MASK_ALL,
        }
    }
}

#[cfg(test)]
#[path = "frustum_culler_tests.rs"]
mod tests;
