/// Hierarchy construction.
///
/// Transforms an assembled `SceneData` into a persistent binary
/// bounding-volume hierarchy by recursively partitioning the vertex
/// pool. Split planes use the "average center" heuristic: the plane
/// normal follows the longest axis of the node's bounding box and the
/// plane passes through the mean of the node's geometry box centers.
///
/// Construction works on transient raw nodes (vertex pool + geometry
/// records); only the persistent arena nodes survive. Child pools are
/// dropped as soon as each subtree is finished, so peak memory stays
/// proportional to one root-to-leaf path.

use std::sync::Arc;
use glam::Vec3;
use crate::error::{Error, Result};
use crate::math::{Box3, BoxKind, Plane};
use crate::scene::{GeometryRecord, SceneData};
use crate::{vis_debug, vis_error, vis_info};
use super::node::{Hierarchy, NodeId};

const SOURCE: &str = "vistree::TreeBuilder";

/// Construction statistics, also consumed by the cullers to size their
/// dense per-node side tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Statistics {
    /// Number of leaves in the hierarchy
    pub leaf_count: u32,
    /// Total number of nodes (internal + leaves)
    pub node_count: u32,
    /// Depth of the deepest leaf (root = 0)
    pub tree_depth: u32,
}

/// Transient construction node: the vertex pool and geometry records
/// of one subtree. Dropped once the subtree is built.
struct RawNode {
    vertices: Vec<f32>,
    records: Vec<GeometryRecord>,
    depth: u32,
}

enum Partition {
    /// Both children carry enough vertices; recurse into them
    Split { left: RawNode, right: RawNode },
    /// One side fell below the vertex minimum; the node stays a leaf
    Rejected(RawNode),
}

pub struct TreeBuilder {
    stats: Statistics,
    max_tree_depth: u32,
    min_vertex_count: usize,
    min_geometry_count: usize,
    box_kind: BoxKind,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            stats: Statistics::default(),
            max_tree_depth: 24,
            min_vertex_count: 3000,
            min_geometry_count: 1,
            box_kind: BoxKind::Aabb,
        }
    }

    /// Nodes with at most this many vertices become leaves (and splits
    /// producing a smaller child are rejected). Default 3000.
    pub fn set_min_vertex_count(&mut self, count: usize) {
        self.min_vertex_count = count;
    }

    /// Nodes with at most this many geometries become leaves. Default 1.
    pub fn set_min_geometry_count(&mut self, count: usize) {
        self.min_geometry_count = count;
    }

    /// Which bounding box kind to fit to node vertex pools. Default AABB.
    pub fn set_box_kind(&mut self, kind: BoxKind) {
        self.box_kind = kind;
    }

    /// Statistics of the last `create_tree` call.
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Build the hierarchy, consuming the assembled scene.
    ///
    /// The maximum tree depth is derived from the geometry count as
    /// `floor(1.2 * log2(n) + 2)`.
    pub fn create_tree(&mut self, scene: SceneData) -> Result<Hierarchy> {
        let (vertices, records) = scene.into_parts()?;

        if records.is_empty() {
            vis_error!(SOURCE, "cannot build a hierarchy from a scene without geometries");
            return Err(Error::BuildFailed("scene contains no geometries".to_string()));
        }

        self.stats = Statistics::default();
        // TODO: the depth heuristic constants are unverified for very
        // large or very flat scenes; re-tune against real datasets
        self.max_tree_depth = (1.2 * (records.len() as f64).log2() + 2.0) as u32;

        let mut tree = Hierarchy::new();
        let root = tree.push_node(None);
        self.stats.node_count = 1;

        self.build_recursive(
            &mut tree,
            root,
            RawNode {
                vertices,
                records,
                depth: 0,
            },
        );

        tree.debug_validate();

        vis_info!(
            SOURCE,
            "hierarchy built: {} nodes, {} leaves, depth {}",
            self.stats.node_count,
            self.stats.leaf_count,
            self.stats.tree_depth
        );

        Ok(tree)
    }

    fn build_recursive(&mut self, tree: &mut Hierarchy, id: NodeId, raw: RawNode) {
        // A single-geometry node reuses the geometry's own fitted box
        let bounding_box = if raw.records.len() == 1 {
            *raw.records[0].geometry.bounding_box()
        } else {
            Box3::fit(self.box_kind, &raw.vertices)
        };
        tree.node_mut(id).set_bounding_box(bounding_box);

        if self.should_terminate(&raw) {
            self.assign_leaf(tree, id, raw);
            return;
        }

        let split_plane = find_split_plane(&bounding_box, &raw.records);

        match self.partition(raw, &split_plane) {
            Partition::Split { left, right } => {
                let left_id = tree.push_node(Some(id));
                self.stats.node_count += 1;
                let right_id = tree.push_node(Some(id));
                self.stats.node_count += 1;
                tree.link_children(id, left_id, right_id);

                // Left subtree finishes (and frees its pool) before the
                // right subtree starts
                self.build_recursive(tree, left_id, left);
                self.build_recursive(tree, right_id, right);
            }
            Partition::Rejected(raw) => {
                vis_debug!(
                    SOURCE,
                    "split rejected at depth {}: a child would fall below {} vertices",
                    raw.depth,
                    self.min_vertex_count
                );
                self.assign_leaf(tree, id, raw);
            }
        }
    }

    /// Termination heuristics, in priority order: vertex minimum,
    /// geometry minimum, depth maximum.
    fn should_terminate(&self, raw: &RawNode) -> bool {
        raw.vertices.len() / 3 <= self.min_vertex_count
            || raw.records.len() <= self.min_geometry_count
            || raw.depth >= self.max_tree_depth
    }

    /// Partition the raw node's geometries around the split plane.
    ///
    /// A geometry goes left when its box center has strictly negative
    /// signed distance to the plane; boundary geometries go right.
    fn partition(&self, raw: RawNode, plane: &Plane) -> Partition {
        // First pass: vertex totals only, so a rejected split leaves
        // the node untouched
        let mut left_floats = 0;
        let mut right_floats = 0;
        for record in &raw.records {
            if plane.signed_distance(record.geometry.bounding_box().center) < 0.0 {
                left_floats += record.len;
            } else {
                right_floats += record.len;
            }
        }

        if left_floats / 3 < self.min_vertex_count || right_floats / 3 < self.min_vertex_count {
            return Partition::Rejected(raw);
        }

        let RawNode {
            vertices,
            records,
            depth,
        } = raw;

        let mut left = RawNode {
            vertices: Vec::with_capacity(left_floats),
            records: Vec::new(),
            depth: depth + 1,
        };
        let mut right = RawNode {
            vertices: Vec::with_capacity(right_floats),
            records: Vec::new(),
            depth: depth + 1,
        };

        // Second pass: move each record to its side, copying its vertex
        // range into the child pool and rewriting the slice start
        for mut record in records {
            let source = &vertices[record.start..record.start + record.len];
            let side = if plane.signed_distance(record.geometry.bounding_box().center) < 0.0 {
                &mut left
            } else {
                &mut right
            };

            record.start = side.vertices.len();
            side.vertices.extend_from_slice(source);
            side.records.push(record);
        }

        Partition::Split { left, right }
    }

    fn assign_leaf(&mut self, tree: &mut Hierarchy, id: NodeId, raw: RawNode) {
        let depth = raw.depth;
        let geometries = raw
            .records
            .into_iter()
            .map(|record| Arc::new(record.geometry))
            .collect();
        tree.node_mut(id).set_geometries(geometries);

        if depth > self.stats.tree_depth {
            self.stats.tree_depth = depth;
        }
        self.stats.leaf_count += 1;
    }
}

/// Average-center split: plane normal along the longest axis of the
/// node's box, positioned at the mean of the geometry box centers.
fn find_split_plane(bounding_box: &Box3, records: &[GeometryRecord]) -> Plane {
    let mut average_center = Vec3::ZERO;
    for record in records {
        average_center += record.geometry.bounding_box().center;
    }
    average_center /= records.len() as f32;

    Plane::from_point_normal(bounding_box.longest_axis(), average_center)
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
