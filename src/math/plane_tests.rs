use glam::Vec3;
use super::*;

fn unit_box_at(center: Vec3, extents: Vec3) -> Box3 {
    Box3 {
        center,
        axis: [Vec3::X, Vec3::Y, Vec3::Z],
        extents,
    }
}

// ============================================================================
// Constructors and normalization
// ============================================================================

#[test]
fn test_new_from_coefficients() {
    let plane = Plane::new(0.0, 1.0, 0.0, -2.0);
    assert_eq!(plane.normal, Vec3::Y);
    assert_eq!(plane.position, -2.0);

    // Point on the plane: y = 2
    assert_eq!(plane.signed_distance(Vec3::new(5.0, 2.0, -3.0)), 0.0);
}

#[test]
fn test_from_point_normal() {
    let plane = Plane::from_point_normal(Vec3::Z, Vec3::new(0.0, 0.0, 4.0));

    assert_eq!(plane.position, -4.0);
    assert_eq!(plane.signed_distance(Vec3::new(1.0, 2.0, 4.0)), 0.0);
    assert!(plane.signed_distance(Vec3::new(0.0, 0.0, 5.0)) > 0.0);
    assert!(plane.signed_distance(Vec3::new(0.0, 0.0, 3.0)) < 0.0);
}

#[test]
fn test_normalize_rescales_position() {
    let mut plane = Plane::new(0.0, 3.0, 0.0, 6.0);
    plane.normalize();

    assert!((plane.normal.length() - 1.0).abs() < 1e-6);
    assert!((plane.position - 2.0).abs() < 1e-6);

    // The plane itself is unchanged: y = -2 still lies on it
    assert!(plane.signed_distance(Vec3::new(0.0, -2.0, 0.0)).abs() < 1e-6);
}

#[test]
fn test_normalize_zero_normal_is_noop() {
    let mut plane = Plane::new(0.0, 0.0, 0.0, 3.0);
    plane.normalize();

    assert_eq!(plane.normal, Vec3::ZERO);
    assert_eq!(plane.position, 3.0);
}

// ============================================================================
// signed_distance
// ============================================================================

#[test]
fn test_signed_distance() {
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0); // x = 0

    assert_eq!(plane.signed_distance(Vec3::new(3.0, 1.0, 1.0)), 3.0);
    assert_eq!(plane.signed_distance(Vec3::new(-2.0, 0.0, 0.0)), -2.0);
    assert_eq!(plane.signed_distance(Vec3::ZERO), 0.0);
}

// ============================================================================
// classify_box
// ============================================================================

#[test]
fn test_classify_box_positive() {
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0); // x = 0, normal +X
    let bounds = unit_box_at(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE);

    assert_eq!(plane.classify_box(&bounds), PlaneSide::Positive);
}

#[test]
fn test_classify_box_negative() {
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0);
    let bounds = unit_box_at(Vec3::new(-5.0, 0.0, 0.0), Vec3::ONE);

    assert_eq!(plane.classify_box(&bounds), PlaneSide::Negative);
}

#[test]
fn test_classify_box_intersecting() {
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0);
    let bounds = unit_box_at(Vec3::new(0.5, 0.0, 0.0), Vec3::ONE);

    assert_eq!(plane.classify_box(&bounds), PlaneSide::Intersecting);
}

#[test]
fn test_classify_box_touching_counts_as_positive() {
    // Box touching the plane from the positive side: d == r
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0);
    let bounds = unit_box_at(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);

    assert_eq!(plane.classify_box(&bounds), PlaneSide::Positive);
}

#[test]
fn test_classify_oriented_box() {
    // Box rotated 45 degrees around Z; projected radius shrinks along
    // the world X compared to the axis-aligned case
    let diagonal = Vec3::new(1.0, 1.0, 0.0).normalize();
    let perpendicular = Vec3::new(-1.0, 1.0, 0.0).normalize();
    let bounds = Box3 {
        center: Vec3::new(2.0, 0.0, 0.0),
        axis: [diagonal, perpendicular, Vec3::Z],
        extents: Vec3::new(1.0, 1.0, 1.0),
    };
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0);

    // Projected radius along X = 2 * (1/sqrt(2)) ~ 1.414 < 2 -> positive
    assert_eq!(plane.classify_box(&bounds), PlaneSide::Positive);
}

#[test]
fn test_classify_zero_extent_box_has_no_nan() {
    // A box flattened to a plane slab must classify without NaN
    let bounds = unit_box_at(Vec3::new(3.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
    let plane = Plane::new(1.0, 0.0, 0.0, 0.0);

    assert_eq!(plane.classify_box(&bounds), PlaneSide::Positive);

    // Fully degenerate point box exactly on the plane
    let bounds = unit_box_at(Vec3::ZERO, Vec3::ZERO);
    assert_eq!(plane.classify_box(&bounds), PlaneSide::Positive);
}
