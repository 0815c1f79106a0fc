/// Persistent hierarchy nodes.
///
/// The hierarchy is a flat arena: a `Vec<Node>` where the vector index
/// is the node's dense id (assigned consecutively in build order, root
/// first). Parent and child links are plain indices, so there are no
/// reference cycles to manage, and the cullers' per-node side tables
/// are dense arrays indexed by the same ids.

use std::sync::Arc;
use rustc_hash::FxHashSet;
use crate::math::Box3;
use crate::scene::Geometry;

/// Dense node id: index into the hierarchy's node arena.
pub type NodeId = u32;

/// A node of the bounding-volume hierarchy.
///
/// Internal nodes have both children and no geometries; leaves have
/// no children and a non-empty geometry list.
pub struct Node {
    /// Dense id, equal to this node's index in the arena
    id: NodeId,
    /// Parent node (None for the root)
    parent: Option<NodeId>,
    /// Left child (present iff right child is present)
    left_child: Option<NodeId>,
    /// Right child
    right_child: Option<NodeId>,
    /// Bounding box containing every vertex in the subtree
    bounding_box: Box3,
    /// Geometries stored at this node (leaves only)
    geometries: Vec<Arc<Geometry>>,
}

impl Node {
    fn new(id: NodeId, parent: Option<NodeId>) -> Self {
        Self {
            id,
            parent,
            left_child: None,
            right_child: None,
            bounding_box: Box3::default(),
            geometries: Vec::new(),
        }
    }

    /// Dense id assigned by the builder.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Left child, `None` for leaves.
    pub fn left_child(&self) -> Option<NodeId> {
        self.left_child
    }

    /// Right child, `None` for leaves.
    pub fn right_child(&self) -> Option<NodeId> {
        self.right_child
    }

    /// A node is a leaf iff it has no children (and then it holds
    /// geometries).
    pub fn is_leaf(&self) -> bool {
        self.left_child.is_none() && self.right_child.is_none()
    }

    /// Bounding box of the whole subtree.
    pub fn bounding_box(&self) -> &Box3 {
        &self.bounding_box
    }

    /// Geometries stored at this node. Non-empty only for leaves.
    pub fn geometries(&self) -> &[Arc<Geometry>] {
        &self.geometries
    }

    pub(crate) fn set_bounding_box(&mut self, bounding_box: Box3) {
        self.bounding_box = bounding_box;
    }

    pub(crate) fn set_geometries(&mut self, geometries: Vec<Arc<Geometry>>) {
        self.geometries = geometries;
    }
}

/// The persistent bounding-volume hierarchy.
///
/// Immutable after construction; cullers traverse it concurrently with
/// their own side tables.
pub struct Hierarchy {
    nodes: Vec<Node>,
}

impl Hierarchy {
    /// Id of the root node.
    pub const ROOT: NodeId = 0;

    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node, returning its dense id (= arena index).
    pub(crate) fn push_node(&mut self, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new(id, parent));
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    pub(crate) fn link_children(&mut self, parent: NodeId, left: NodeId, right: NodeId) {
        let node = &mut self.nodes[parent as usize];
        node.left_child = Some(left);
        node.right_child = Some(right);
    }

    /// Access a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT as usize]
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Assert the structural invariants in debug builds: dense unique
    /// ids reachable from the root, two-or-zero children, consistent
    /// parent back-links, geometries only at leaves.
    ///
    /// Compiles to nothing in release builds.
    pub fn debug_validate(&self) {
        if !cfg!(debug_assertions) || self.nodes.is_empty() {
            return;
        }

        let mut seen: FxHashSet<NodeId> = FxHashSet::default();
        let mut stack = vec![Self::ROOT];

        while let Some(id) = stack.pop() {
            let node = self.node(id);
            debug_assert_eq!(node.id(), id, "node id does not match arena index");
            let newly_seen = seen.insert(id);
            debug_assert!(newly_seen, "node {} reachable twice", id);

            match (node.left_child(), node.right_child()) {
                (Some(left), Some(right)) => {
                    debug_assert!(
                        node.geometries().is_empty(),
                        "internal node {} holds geometries",
                        id
                    );
                    debug_assert_eq!(self.node(left).parent(), Some(id));
                    debug_assert_eq!(self.node(right).parent(), Some(id));
                    stack.push(right);
                    stack.push(left);
                }
                (None, None) => {
                    debug_assert!(!node.geometries().is_empty(), "leaf {} is empty", id);
                }
                _ => {
                    debug_assert!(false, "node {} has exactly one child", id);
                }
            }
        }

        debug_assert_eq!(
            seen.len(),
            self.node_count(),
            "node ids are not dense over [0, node_count)"
        );
    }
}
