/// Bounding boxes for visibility culling.
///
/// A `Box3` is an oriented box: a center, three orthonormal axes and
/// non-negative half-lengths along them. Axis-aligned boxes are the
/// special case with the canonical basis. Boxes are fitted to flat
/// vertex streams either by a min/max scan (AABB) or by principal
/// component analysis of the cloud's covariance matrix (OBB).

use glam::Vec3;
use crate::vis_warn;
use super::eigen::EigenSolver;
use super::statistics;

const SOURCE: &str = "vistree::Box3";

/// Which kind of bounding box to fit.
///
/// Passed explicitly to `SceneData` and `TreeBuilder`; there is no
/// process-wide default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxKind {
    /// Axis-aligned box (canonical basis, min/max scan)
    Aabb,
    /// Oriented box (basis from PCA of the vertex cloud)
    Obb,
}

/// Oriented bounding box.
///
/// Invariants: `axis` is an orthonormal right-handed basis and every
/// extent is non-negative. Degenerate vertex clouds (empty, or all
/// points coincident) fit to a zero-extent box at the centroid.
#[derive(Debug, Clone, Copy)]
pub struct Box3 {
    /// Center point
    pub center: Vec3,
    /// Orthonormal basis (right-handed)
    pub axis: [Vec3; 3],
    /// Half-lengths along each axis (non-negative)
    pub extents: Vec3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            axis: [Vec3::X, Vec3::Y, Vec3::Z],
            extents: Vec3::ZERO,
        }
    }
}

impl Box3 {
    /// Fit a box of the given kind to a flat `(x, y, z)` vertex stream.
    ///
    /// An empty stream yields the default zero-extent box at the origin.
    pub fn fit(kind: BoxKind, vertices: &[f32]) -> Self {
        if vertices.len() < 3 {
            return Self::default();
        }

        match kind {
            BoxKind::Aabb => Self::fit_aabb(vertices),
            BoxKind::Obb => Self::fit_obb(vertices),
        }
    }

    /// Axis-aligned fit: one min/max scan, canonical basis.
    fn fit_aabb(vertices: &[f32]) -> Self {
        let (min, max) = statistics::min_max_vertices(vertices);

        Self {
            center: (min + max) * 0.5,
            axis: [Vec3::X, Vec3::Y, Vec3::Z],
            extents: (max - min) * 0.5,
        }
    }

    /// Oriented fit: principal axes from the eigenvectors of the cloud's
    /// covariance matrix, sorted by increasing eigenvalue.
    ///
    /// Let C be the cloud mean and U0, U1, U2 the eigenbasis. Each vertex
    /// is of the form `X = C + y0*U0 + y1*U1 + y2*U2`; a second scan finds
    /// min/max of each `yi` and the center is shifted to
    /// `C + 0.5*(min_i + max_i)*Ui` with extents `(max_i - min_i)/2`.
    fn fit_obb(vertices: &[f32]) -> Self {
        let average = statistics::average(vertices);
        let covariance = statistics::covariance(vertices, average);

        let mut solver = EigenSolver::new(covariance);
        if !solver.solve_ascending() {
            vis_warn!(SOURCE, "eigen decomposition did not converge; using partial basis");
        }

        let axis = [solver.eigenvector(0), solver.eigenvector(1), solver.eigenvector(2)];
        let (min, max) = statistics::axis_min_max_values(vertices, &axis, average);

        let mut center = average;
        for i in 0..3 {
            center += axis[i] * (0.5 * (min[i] + max[i]));
        }

        Self {
            center,
            axis,
            extents: (max - min) * 0.5,
        }
    }

    /// The eight corner points of the box.
    ///
    /// Ordered bottom face (-axis2) counter-clockwise, then top face:
    /// the order backends rely on when rasterizing the hull.
    pub fn corners(&self) -> [Vec3; 8] {
        let ex = self.axis[0] * self.extents.x;
        let ey = self.axis[1] * self.extents.y;
        let ez = self.axis[2] * self.extents.z;

        [
            self.center - ex - ey - ez,
            self.center + ex - ey - ez,
            self.center + ex + ey - ez,
            self.center - ex + ey - ez,
            self.center - ex - ey + ez,
            self.center + ex - ey + ez,
            self.center + ex + ey + ez,
            self.center - ex + ey + ez,
        ]
    }

    /// The basis axis with the largest extent.
    pub fn longest_axis(&self) -> Vec3 {
        if self.extents.x > self.extents.y && self.extents.x > self.extents.z {
            self.axis[0]
        } else if self.extents.y > self.extents.z {
            self.axis[1]
        } else {
            self.axis[2]
        }
    }

    /// Euclidean distance from a point to the box surface.
    ///
    /// Works in box-local coordinates: the projection of `point - center`
    /// onto each axis is clamped to the extent interval and the squared
    /// excess accumulated. Points inside the box return 0.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        let point_minus_center = point - self.center;

        let mut sqr_distance = 0.0;
        for i in 0..3 {
            let projection = point_minus_center.dot(self.axis[i]);
            let extent = self.extents[i];

            if projection < -extent {
                let delta = projection + extent;
                sqr_distance += delta * delta;
            } else if projection > extent {
                let delta = projection - extent;
                sqr_distance += delta * delta;
            }
        }

        sqr_distance.sqrt()
    }
}

#[cfg(test)]
#[path = "box3_tests.rs"]
mod tests;
