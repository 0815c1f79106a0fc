/*!
# Vistree

Visibility culling engine for large static 3D scenes.

The crate ingests a set of triangle meshes, builds a binary bounding-volume
hierarchy over them, and exposes three traversal strategies for rendering:

- **Naive**: walk the whole tree with a [`PreOrderIterator`] and draw every
  leaf. Baseline for comparison.
- **View-frustum culling**: [`FrustumCuller`] extracts six half-spaces from a
  view-projection matrix and rejects subtrees wholly outside the frustum,
  reusing per-node plane masks across frames for spatial and temporal
  coherence.
- **Coherent hierarchical culling**: [`OcclusionCuller`] walks the tree
  front-to-back, interleaving hardware occlusion queries with rendering and
  exploiting previous-frame visibility to skip queries. Frustum culling
  composes on top via the [`OcclusionCallback::is_valid`] hook.

## Architecture

- [`SceneData`]: assembles geometries and their vertex data
- [`TreeBuilder`]: partitions the assembled scene into a [`Hierarchy`]
- [`FrustumCuller`] / [`OcclusionCuller`]: per-frame tree traversal
- [`QueryBackend`]: abstract occlusion-query interface; implemented by GPU
  backends, or by [`MockQueryBackend`] for tests and headless runs

The host owns the draw calls: both cullers report visible nodes through
callback traits and never touch the GPU themselves.
*/

// Error types and Result alias
pub mod error;

// Internal logging system
pub mod log;

// Bounding boxes, planes, vertex statistics, eigen decomposition
pub mod math;

// Scene assembly (geometries and vertex pools)
pub mod scene;

// Persistent hierarchy, pre-order traversal, tree construction
pub mod tree;

// Frustum and occlusion culling strategies
pub mod culling;

pub use error::{Error, Result};
pub use math::{Box3, BoxKind, Plane, PlaneSide};
pub use scene::{Geometry, SceneData};
pub use tree::{Hierarchy, Node, NodeId, PreOrderIterator, Statistics, TreeBuilder};
pub use culling::{
    FrustumCallback, FrustumCuller, MockQueryBackend, OcclusionCallback, OcclusionCuller,
    QueryBackend,
};

// Re-export math library
pub use glam;
