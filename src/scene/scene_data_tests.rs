use glam::{Mat4, Vec3};
use crate::math::BoxKind;
use super::*;

const CUBE: [f32; 24] = [
    -1.0, -1.0, -1.0,
    1.0, -1.0, -1.0,
    1.0, 1.0, -1.0,
    -1.0, 1.0, -1.0,
    -1.0, -1.0, 1.0,
    1.0, -1.0, 1.0,
    1.0, 1.0, 1.0,
    -1.0, 1.0, 1.0,
];

fn open_scene() -> SceneData {
    let mut scene = SceneData::new(BoxKind::Aabb);
    scene.begin_scene().unwrap();
    scene
}

// ============================================================================
// Assembly protocol
// ============================================================================

#[test]
fn test_full_assembly_round() {
    let mut scene = open_scene();

    scene.begin_geometry(Geometry::new(7)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene.end_geometry().unwrap();
    scene.end_scene().unwrap();

    assert_eq!(scene.geometry_count(), 1);
    assert_eq!(scene.vertex_count(), 8);
}

#[test]
fn test_add_vertices_without_geometry_fails() {
    let mut scene = open_scene();
    assert!(scene.add_vertices(&CUBE).is_err());
}

#[test]
fn test_begin_geometry_without_scene_fails() {
    let mut scene = SceneData::new(BoxKind::Aabb);
    assert!(scene.begin_geometry(Geometry::new(0)).is_err());
}

#[test]
fn test_end_geometry_without_begin_fails() {
    let mut scene = open_scene();
    assert!(scene.end_geometry().is_err());
}

#[test]
fn test_end_scene_with_open_geometry_fails() {
    let mut scene = open_scene();
    scene.begin_geometry(Geometry::new(0)).unwrap();
    assert!(scene.end_scene().is_err());
}

#[test]
fn test_non_triple_vertex_data_fails() {
    let mut scene = open_scene();
    scene.begin_geometry(Geometry::new(0)).unwrap();
    assert!(scene.add_vertices(&[1.0, 2.0]).is_err());
}

// ============================================================================
// Vertex pool layout
// ============================================================================

#[test]
fn test_geometry_slices_are_contiguous() {
    let mut scene = open_scene();

    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene.add_vertices(&CUBE[..12]).unwrap();
    scene.add_vertices(&CUBE[12..]).unwrap();
    scene.end_geometry().unwrap();

    scene.begin_geometry(Geometry::new(1)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene.end_geometry().unwrap();
    scene.end_scene().unwrap();

    let (vertices, records) = scene.into_parts().unwrap();
    assert_eq!(vertices.len(), 48);
    assert_eq!(records[0].start, 0);
    assert_eq!(records[0].len, 24);
    assert_eq!(records[1].start, 24);
    assert_eq!(records[1].len, 24);
}

#[test]
fn test_add_vertices_f64_narrows() {
    let mut scene = open_scene();
    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene
        .add_vertices_f64(&[1.5_f64, -2.25_f64, 1.0e-3_f64])
        .unwrap();

    let current = scene.current_vertices().unwrap();
    assert_eq!(current, &[1.5_f32, -2.25_f32, 1.0e-3_f32]);
}

#[test]
fn test_current_vertices_is_only_current_slice() {
    let mut scene = open_scene();

    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene.end_geometry().unwrap();

    scene.begin_geometry(Geometry::new(1)).unwrap();
    scene.add_vertices(&[9.0, 9.0, 9.0]).unwrap();

    assert_eq!(scene.current_vertices().unwrap(), &[9.0, 9.0, 9.0]);
}

// ============================================================================
// Transforms
// ============================================================================

#[test]
fn test_transform_identity_is_noop() {
    let mut scene = open_scene();
    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene.transform_vertices(&Mat4::IDENTITY).unwrap();

    assert_eq!(scene.current_vertices().unwrap(), &CUBE);
}

#[test]
fn test_transform_translates_current_geometry_only() {
    let mut scene = open_scene();

    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene.end_geometry().unwrap();

    scene.begin_geometry(Geometry::new(1)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene
        .transform_vertices(&Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)))
        .unwrap();
    scene.end_geometry().unwrap();
    scene.end_scene().unwrap();

    let (vertices, records) = scene.into_parts().unwrap();

    // First geometry untouched
    assert_eq!(&vertices[..24], &CUBE);

    // Second geometry shifted by +10 in X
    let second = &vertices[records[1].start..records[1].start + records[1].len];
    for (chunk, original) in second.chunks_exact(3).zip(CUBE.chunks_exact(3)) {
        assert!((chunk[0] - (original[0] + 10.0)).abs() < 1e-6);
        assert_eq!(chunk[1], original[1]);
        assert_eq!(chunk[2], original[2]);
    }
}

#[test]
fn test_transform_applies_perspective_divide() {
    let mut scene = open_scene();
    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene.add_vertices(&[2.0, 4.0, 1.0]).unwrap();

    // Scale w by 2: a pure homogeneous scale halves the point
    let mut matrix = Mat4::IDENTITY;
    matrix.w_axis.w = 2.0;
    scene.transform_vertices(&matrix).unwrap();

    let current = scene.current_vertices().unwrap();
    assert!((current[0] - 1.0).abs() < 1e-6);
    assert!((current[1] - 2.0).abs() < 1e-6);
    assert!((current[2] - 0.5).abs() < 1e-6);
}

// ============================================================================
// Bounding boxes
// ============================================================================

#[test]
fn test_end_geometry_fits_bounding_box() {
    let mut scene = open_scene();
    scene.begin_geometry(Geometry::new(0)).unwrap();
    scene.add_vertices(&CUBE).unwrap();
    scene
        .transform_vertices(&Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)))
        .unwrap();
    scene.end_geometry().unwrap();
    scene.end_scene().unwrap();

    let (_, records) = scene.into_parts().unwrap();
    let bounds = records[0].geometry.bounding_box();

    assert!((bounds.center - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    assert!((bounds.extents - Vec3::ONE).length() < 1e-5);
}
