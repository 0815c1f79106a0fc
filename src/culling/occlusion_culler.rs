/// Coherent hierarchical occlusion culling (CHC).
///
/// Per frame, the hierarchy is walked front-to-back through a distance
/// priority queue while hardware occlusion queries run asynchronously:
///
/// - Nodes visible last frame are trusted: internal ones descend without
///   a query, leaves are drawn inside a geometry query that re-checks
///   them for the next frame.
/// - Nodes invisible last frame get their bounding volume rasterized
///   inside a query; they are drawn only if the result comes back with
///   enough samples, at which point visibility is pulled up to their
///   ancestors and traversal descends.
/// - Query results are drained in issue order, interleaved with the
///   traversal, so rendering and queries overlap instead of stalling.
///
/// Frustum culling composes through `OcclusionCallback::is_valid`,
/// which typically delegates to `FrustumCuller::contains`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use glam::{Mat3, Mat4, Vec3};
use crate::error::Result;
use crate::math::{Plane, PlaneSide};
use crate::tree::{Hierarchy, NodeId, Statistics};
use super::query_backend::QueryBackend;

/// Host hooks for the CHC traversal.
pub trait OcclusionCallback {
    /// Rasterize the node's geometries now. Draw calls only; the
    /// callback must not re-enter the traverser.
    fn draw(&mut self, tree: &Hierarchy, node: NodeId);

    /// Is this node worth considering at all? Used to splice in frustum
    /// culling; return `true` to accept every node.
    fn is_valid(&mut self, tree: &Hierarchy, node: NodeId) -> bool;
}

/// Per-node occlusion state.
#[derive(Clone, Copy)]
struct OcclusionInfo {
    /// Frame this node was last reached by the traversal
    last_visited: i64,
    /// Frame this node was last drawn
    last_rendered: i64,
    /// Visibility classification from the most recent query results
    visible: bool,
    /// Distance from the viewpoint to the node's box, set when enqueued
    distance_to_viewpoint: f32,
}

impl Default for OcclusionInfo {
    fn default() -> Self {
        Self {
            last_visited: -1,
            last_rendered: -1,
            visible: false,
            distance_to_viewpoint: 0.0,
        }
    }
}

/// Min-heap entry: closest node first.
struct DistanceEntry {
    distance: f32,
    node: NodeId,
}

impl PartialEq for DistanceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DistanceEntry {}

impl PartialOrd for DistanceEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the maximum; invert so the closest node wins
        other.distance.total_cmp(&self.distance)
    }
}

pub struct OcclusionCuller {
    occlusion_info: Vec<OcclusionInfo>,
    distance_queue: BinaryHeap<DistanceEntry>,
    viewpoint: Vec3,
    near_plane: Plane,
    visibility_threshold: u32,
    frame_id: i64,
}

impl Default for OcclusionCuller {
    fn default() -> Self {
        Self::new()
    }
}

impl OcclusionCuller {
    pub fn new() -> Self {
        Self {
            occlusion_info: Vec::new(),
            distance_queue: BinaryHeap::new(),
            viewpoint: Vec3::ZERO,
            near_plane: Plane::new(0.0, 0.0, 0.0, 0.0),
            visibility_threshold: 0,
            frame_id: 0,
        }
    }

    /// Size the per-node side table for a freshly built hierarchy.
    pub fn init(&mut self, stats: &Statistics) {
        self.occlusion_info.clear();
        self.occlusion_info
            .resize(stats.node_count as usize, OcclusionInfo::default());
        self.frame_id = 0;
    }

    /// Derive the world-space viewpoint and near plane for this frame.
    ///
    /// The viewpoint is the view translation mapped back through the
    /// transposed rotation (rotation is orthonormal, so transpose is
    /// inverse). The near plane comes from the combined matrix with the
    /// same extraction the frustum culler uses.
    pub fn update_viewer_parameters(&mut self, view: &Mat4, projection: &Mat4) {
        let translation = view.w_axis.truncate();
        self.viewpoint = Mat3::from_mat4(*view).transpose() * -translation;

        let m = (*projection * *view).to_cols_array_2d();
        self.near_plane = Plane::new(
            m[0][3] + m[0][2],
            m[1][3] + m[1][2],
            m[2][3] + m[2][2],
            m[3][3] + m[3][2],
        );
        self.near_plane.normalize();
    }

    /// Minimum number of passed samples for a node to count as visible.
    /// Default 0 (any sample at all).
    pub fn set_visibility_threshold(&mut self, pixels: u32) {
        self.visibility_threshold = pixels;
    }

    pub fn visibility_threshold(&self) -> u32 {
        self.visibility_threshold
    }

    /// Run one frame of CHC traversal from `root`.
    ///
    /// Backend errors abort the traversal and surface to the caller;
    /// the host can then fall back to a naive draw.
    pub fn traverse(
        &mut self,
        tree: &Hierarchy,
        root: NodeId,
        backend: &mut dyn QueryBackend,
        callback: &mut dyn OcclusionCallback,
    ) -> Result<()> {
        debug_assert_eq!(
            self.occlusion_info.len(),
            tree.node_count(),
            "culler not initialized for this hierarchy"
        );

        let root_distance = self.occlusion_info[root as usize].distance_to_viewpoint;
        self.distance_queue.push(DistanceEntry {
            distance: root_distance,
            node: root,
        });
        self.frame_id += 1;

        while !self.distance_queue.is_empty() || !backend.done() {
            // -- Part 1: drain finished queries. Also blocks here when
            // traversal has nothing left to do but results are pending.
            while !backend.done()
                && (backend.front_result_available() || self.distance_queue.is_empty())
            {
                let Some(current) = backend.pop_front_node() else {
                    break;
                };

                let visible_pixels = backend.query_result(current)?;

                if visible_pixels > self.visibility_threshold {
                    self.pull_up_visibility(tree, current);

                    // Draw only nodes not already rendered this frame
                    let info = &mut self.occlusion_info[current as usize];
                    if info.last_rendered < self.frame_id {
                        info.last_rendered = self.frame_id;
                        callback.draw(tree, current);
                        self.push_children(tree, current);
                    }
                }
            }

            // -- Part 2: hierarchical traversal
            let Some(entry) = self.distance_queue.pop() else {
                continue;
            };
            let current = entry.node;

            // Frustum splice point
            if !callback.is_valid(tree, current) {
                continue;
            }

            // A bounding volume crossing the near plane gives wrong query
            // results: back-face culling lets us see through the inside
            // of the box, so parts of it rasterize nothing. Treat the
            // node as visible and traverse it without a query.
            if self.near_plane.classify_box(tree.node(current).bounding_box())
                == PlaneSide::Intersecting
            {
                self.pull_up_visibility(tree, current);
                let info = &mut self.occlusion_info[current as usize];
                info.last_visited = self.frame_id;
                info.last_rendered = self.frame_id;
                callback.draw(tree, current);
                self.push_children(tree, current);
                continue;
            }

            let info = &mut self.occlusion_info[current as usize];

            // Temporal coherence: trusted iff found visible last frame
            let was_visible = info.visible && info.last_visited == self.frame_id - 1;

            // Reset for this frame's query results
            info.visible = false;
            info.last_visited = self.frame_id;

            if was_visible {
                info.last_rendered = self.frame_id;

                if !tree.node(current).is_leaf() {
                    // Previously visible internal node: descend without
                    // a query, the children re-check themselves
                    self.push_children(tree, current);
                } else {
                    // Previously visible leaf: draw it inside a geometry
                    // query to re-validate for the next frame
                    backend.begin_geometry_query(current)?;
                    callback.draw(tree, current);
                    backend.end_geometry_query();
                }
            } else {
                // Previously invisible node (leaf or internal): test its
                // bounding volume before spending anything on the subtree
                backend.begin_bounding_volume_query(current)?;
                backend.draw_bounding_volume(&tree.node(current).bounding_box().corners());
                backend.end_bounding_volume_query();
            }
        }

        Ok(())
    }

    /// Enqueue both children keyed by viewpoint distance, guaranteeing
    /// front-to-back processing.
    fn push_children(&mut self, tree: &Hierarchy, node: NodeId) {
        let current = tree.node(node);
        for child in [current.left_child(), current.right_child()]
            .into_iter()
            .flatten()
        {
            let distance = tree
                .node(child)
                .bounding_box()
                .distance_to_point(self.viewpoint);
            self.occlusion_info[child as usize].distance_to_viewpoint = distance;
            self.distance_queue.push(DistanceEntry {
                distance,
                node: child,
            });
        }
    }

    /// Mark a node and its ancestors visible, stopping at the first
    /// ancestor already marked.
    fn pull_up_visibility(&mut self, tree: &Hierarchy, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let info = &mut self.occlusion_info[id as usize];
            if info.visible {
                break;
            }
            info.visible = true;
            current = tree.node(id).parent();
        }
    }
}

#[cfg(test)]
#[path = "occlusion_culler_tests.rs"]
mod tests;
