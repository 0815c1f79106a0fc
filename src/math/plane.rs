/// Planes in Hessian normal form.
///
/// A plane is stored as a normal and a scalar `position` such that a
/// point `p` lies on the plane when `normal . p + position == 0`.
/// `position` is the negated signed distance of the plane from the
/// origin along the normal.

use glam::Vec3;
use super::box3::Box3;

/// Result of a 3-way plane/box classification.
///
/// Used by the cullers for hierarchical decisions:
/// - `Negative` → the box is wholly in the negative half-space (culled)
/// - `Positive` → wholly in the positive half-space (no further tests)
/// - `Intersecting` → the plane cuts the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Box entirely in the positive half-space
    Positive,
    /// Box entirely in the negative half-space
    Negative,
    /// Box intersected by the plane
    Intersecting,
}

/// Plane in Hessian normal form: `normal . p + position = 0`.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Plane normal (unit length after `normalize`)
    pub normal: Vec3,
    /// Negated signed distance from the origin
    pub position: f32,
}

impl Plane {
    /// Create a plane from raw coefficients `(a, b, c, d)` of
    /// `a*x + b*y + c*z + d = 0`.
    pub fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self {
            normal: Vec3::new(a, b, c),
            position: d,
        }
    }

    /// Create a plane from a normal and a point on the plane.
    pub fn from_point_normal(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal,
            position: -normal.dot(point),
        }
    }

    /// Rescale to Hessian form: unit normal, `position` divided by the
    /// pre-normalisation length. A zero normal is left untouched.
    pub fn normalize(&mut self) {
        let length = self.normal.length();
        if length > 0.0 {
            self.normal /= length;
            self.position /= length;
        }
    }

    /// Signed distance from a point to the plane (positive on the side
    /// the normal points to).
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.position
    }

    /// Classify a box against the plane.
    ///
    /// Compares the signed distance of the box center with the box's
    /// projected radius `r = SUM |normal . axis[i]| * extents[i]`.
    /// Boxes with zero extents degenerate cleanly to a point test.
    pub fn classify_box(&self, bounds: &Box3) -> PlaneSide {
        let projected_center = self.signed_distance(bounds.center);
        let projected_radius = (self.normal.dot(bounds.axis[0]) * bounds.extents.x).abs()
            + (self.normal.dot(bounds.axis[1]) * bounds.extents.y).abs()
            + (self.normal.dot(bounds.axis[2]) * bounds.extents.z).abs();

        if projected_center >= projected_radius {
            PlaneSide::Positive
        } else if projected_center <= -projected_radius {
            PlaneSide::Negative
        } else {
            PlaneSide::Intersecting
        }
    }
}

#[cfg(test)]
#[path = "plane_tests.rs"]
mod tests;
