//! Integration tests for scene assembly and hierarchy construction.
//!
//! End-to-end scenarios: a single-cube scene, and a large randomized
//! scene built with default parameters.


use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use scene_test_utils::{build_cubes, view_projection};
use vistree::glam::Vec3;
use vistree::{FrustumCuller, Hierarchy, NodeId, PreOrderIterator};

// ============================================================================
// SINGLE GEOMETRY SCENE
// ============================================================================

#[test]
fn test_integration_single_cube_scene() {
    let (tree, stats) = build_cubes(&[Vec3::ZERO], 3000);

    assert_eq!(stats.node_count, 1);
    assert_eq!(stats.leaf_count, 1);
    assert_eq!(stats.tree_depth, 0);
    assert!(tree.root().is_leaf());

    let mut culler = FrustumCuller::new();
    culler.init(&stats);

    // Camera at (0, 0, 5) looking at the origin: the cube is visible
    culler.update_frustum_planes(&view_projection(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO));
    assert!(culler.contains(&tree, Hierarchy::ROOT));

    // Camera at (10, 0, 0) facing +X: the cube is behind the near plane
    culler.update_frustum_planes(&view_projection(
        Vec3::new(10.0, 0.0, 0.0),
        Vec3::new(20.0, 0.0, 0.0),
    ));
    assert!(!culler.contains(&tree, Hierarchy::ROOT));
}

// ============================================================================
// LARGE RANDOMIZED SCENE
// ============================================================================

fn random_centers(count: usize, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            )
        })
        .collect()
}

#[test]
fn test_integration_thousand_cubes_with_defaults() {
    let centers = random_centers(1000, 1000);
    let (tree, stats) = build_cubes(&centers, 3000);

    // 8000 vertices against a 3000-vertex minimum must split at least once
    assert!(stats.leaf_count >= 2, "leaf_count = {}", stats.leaf_count);
    assert!(stats.node_count >= 3);

    // Depth bounded by the construction heuristic: floor(1.2*log2(1000) + 2)
    assert!(stats.tree_depth <= 14, "tree_depth = {}", stats.tree_depth);

    // Walking the whole tree yields every geometry exactly once
    let mut seen_geometry: Vec<i32> = Vec::new();
    let mut seen_nodes: FxHashSet<NodeId> = FxHashSet::default();
    let mut iterator = PreOrderIterator::new();
    iterator.begin(Hierarchy::ROOT);
    while let Some(id) = iterator.current() {
        assert!(seen_nodes.insert(id));
        seen_geometry.extend(tree.node(id).geometries().iter().map(|g| g.id()));
        iterator.next(&tree);
    }

    seen_geometry.sort();
    let expected: Vec<i32> = (0..1000).collect();
    assert_eq!(seen_geometry, expected);

    // Node ids are dense over [0, node_count)
    assert_eq!(seen_nodes.len(), tree.node_count());
    assert_eq!(stats.node_count as usize, tree.node_count());
    for id in 0..tree.node_count() as NodeId {
        assert!(seen_nodes.contains(&id));
    }
}

#[test]
fn test_integration_box_containment_holds_everywhere() {
    let centers = random_centers(200, 7);
    let (tree, _) = build_cubes(&centers, 100);

    // Every geometry's box corners lie inside every ancestor node box
    let mut iterator = PreOrderIterator::new();
    iterator.begin(Hierarchy::ROOT);
    while let Some(id) = iterator.current() {
        for geometry in tree.node(id).geometries() {
            for corner in geometry.bounding_box().corners() {
                let mut ancestor = Some(id);
                while let Some(a) = ancestor {
                    let node = tree.node(a);
                    assert!(
                        node.bounding_box().distance_to_point(corner) < 1e-3,
                        "corner {:?} escapes node {}",
                        corner,
                        a
                    );
                    ancestor = node.parent();
                }
            }
        }
        iterator.next(&tree);
    }
}

#[test]
fn test_integration_whole_world_frustum_sees_everything() {
    let centers = random_centers(300, 99);
    let (tree, stats) = build_cubes(&centers, 100);

    let mut culler = FrustumCuller::new();
    culler.init(&stats);
    culler.update_frustum_planes(&scene_test_utils::world_volume());

    struct Gather {
        geometry: Vec<i32>,
    }
    impl vistree::FrustumCallback for Gather {
        fn inside(&mut self, tree: &Hierarchy, node: NodeId) {
            self.geometry
                .extend(tree.node(node).geometries().iter().map(|g| g.id()));
        }
    }

    let mut gather = Gather { geometry: Vec::new() };
    culler.traverse(&tree, Hierarchy::ROOT, &mut gather);

    gather.geometry.sort();
    let expected: Vec<i32> = (0..300).collect();
    assert_eq!(gather.geometry, expected);
}
