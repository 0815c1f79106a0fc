/// Statistical moments over flat vertex streams.
///
/// All functions operate on a contiguous `&[f32]` of (x, y, z) triples —
/// the format of the scene vertex pool — and none of them allocate.
/// Empty streams yield zeroed results; callers decide how to interpret
/// a degenerate cloud.

use glam::Vec3;

/// Arithmetic mean of all vertices in the stream.
pub fn average(vertices: &[f32]) -> Vec3 {
    debug_assert!(vertices.len() % 3 == 0, "vertex stream must be (x, y, z) triples");

    if vertices.is_empty() {
        return Vec3::ZERO;
    }

    let mut sum = Vec3::ZERO;
    for vertex in vertices.chunks_exact(3) {
        sum += Vec3::from_slice(vertex);
    }

    // 1/n = 3 / (float count)
    sum * (3.0 / vertices.len() as f32)
}

/// Covariance matrix of the stream around a given mean.
///
/// `C[i][j] = 1/n * SUM( (v - m)[i] * (v - m)[j] )`
///
/// Only the six unique sums are accumulated; the symmetric matrix is
/// filled from them.
pub fn covariance(vertices: &[f32], average: Vec3) -> [[f32; 3]; 3] {
    debug_assert!(vertices.len() % 3 == 0, "vertex stream must be (x, y, z) triples");

    if vertices.is_empty() {
        return [[0.0; 3]; 3];
    }

    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xz = 0.0;
    let mut sum_yy = 0.0;
    let mut sum_yz = 0.0;
    let mut sum_zz = 0.0;

    for vertex in vertices.chunks_exact(3) {
        let v = Vec3::from_slice(vertex) - average;

        sum_xx += v.x * v.x;
        sum_xy += v.x * v.y;
        sum_xz += v.x * v.z;
        sum_yy += v.y * v.y;
        sum_yz += v.y * v.z;
        sum_zz += v.z * v.z;
    }

    let inv_count = 3.0 / vertices.len() as f32;

    [
        [sum_xx * inv_count, sum_xy * inv_count, sum_xz * inv_count],
        [sum_xy * inv_count, sum_yy * inv_count, sum_yz * inv_count],
        [sum_xz * inv_count, sum_yz * inv_count, sum_zz * inv_count],
    ]
}

/// Axis-aligned extremes of the stream: `(min, max)` per world axis.
pub fn min_max_vertices(vertices: &[f32]) -> (Vec3, Vec3) {
    debug_assert!(vertices.len() % 3 == 0, "vertex stream must be (x, y, z) triples");

    if vertices.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }

    let first = Vec3::from_slice(&vertices[0..3]);
    let mut min = first;
    let mut max = first;

    for vertex in vertices[3..].chunks_exact(3) {
        let v = Vec3::from_slice(vertex);
        min = min.min(v);
        max = max.max(v);
    }

    (min, max)
}

/// Extremes of the stream along an arbitrary orthonormal basis.
///
/// Each vertex is expressed relative to `center` and projected onto the
/// three `axes`; the result holds the per-axis `(min, max)` of those
/// projections.
pub fn axis_min_max_values(vertices: &[f32], axes: &[Vec3; 3], center: Vec3) -> (Vec3, Vec3) {
    debug_assert!(vertices.len() % 3 == 0, "vertex stream must be (x, y, z) triples");

    if vertices.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }

    let project = |vertex: &[f32]| {
        let diff = Vec3::from_slice(vertex) - center;
        Vec3::new(diff.dot(axes[0]), diff.dot(axes[1]), diff.dot(axes[2]))
    };

    let first = project(&vertices[0..3]);
    let mut min = first;
    let mut max = first;

    for vertex in vertices[3..].chunks_exact(3) {
        let p = project(vertex);
        min = min.min(p);
        max = max.max(p);
    }

    (min, max)
}

#[cfg(test)]
#[path = "statistics_tests.rs"]
mod tests;
