/// Symmetric 3x3 eigensolver.
///
/// Householder tridiagonalisation followed by the QL algorithm with
/// implicit shifts, bounded at 32 sweeps per eigenvalue. Used to extract
/// the principal axes of a vertex cloud's covariance matrix when fitting
/// oriented bounding boxes.
///
/// The accumulated orthogonal factor is kept a proper rotation
/// (determinant +1): eigenvector column swaps during sorting and the
/// Householder reflection each flip the sign, and an odd total is
/// compensated by negating the first column.

use glam::Vec3;

const SIZE: usize = 3;
const MAX_SWEEPS: usize = 32;

pub struct EigenSolver {
    matrix: [[f32; SIZE]; SIZE],
    diag: [f32; SIZE],
    subd: [f32; SIZE],
    is_rotation: bool,
}

impl EigenSolver {
    /// Create a solver for the given symmetric matrix.
    ///
    /// Only the upper triangle is read; symmetry is assumed.
    pub fn new(matrix: [[f32; SIZE]; SIZE]) -> Self {
        Self {
            matrix,
            diag: [0.0; SIZE],
            subd: [0.0; SIZE],
            is_rotation: false,
        }
    }

    /// Solve the eigenproblem, sorting eigenvalues in ascending order.
    ///
    /// Returns `false` if the QL iteration failed to converge within the
    /// sweep bound; diagonal and basis then hold the partial result.
    pub fn solve_ascending(&mut self) -> bool {
        self.tridiagonalize();
        let converged = self.ql_iterate();
        self.sort_ascending();
        self.guarantee_rotation();
        converged
    }

    /// Eigenvalue `i` (valid after a solve).
    pub fn eigenvalue(&self, i: usize) -> f32 {
        self.diag[i]
    }

    /// Eigenvector `i`: column `i` of the accumulated orthogonal factor.
    pub fn eigenvector(&self, i: usize) -> Vec3 {
        Vec3::new(self.matrix[0][i], self.matrix[1][i], self.matrix[2][i])
    }

    /// Reduce the symmetric matrix to tridiagonal form with a single
    /// Householder reflection (the 3x3 case needs at most one).
    fn tridiagonalize(&mut self) {
        let m00 = self.matrix[0][0];
        let mut m01 = self.matrix[0][1];
        let mut m02 = self.matrix[0][2];
        let m11 = self.matrix[1][1];
        let m12 = self.matrix[1][2];
        let m22 = self.matrix[2][2];

        self.diag[0] = m00;
        self.subd[2] = 0.0;

        if m02.abs() > 1e-6 {
            let length = (m01 * m01 + m02 * m02).sqrt();
            let inv_length = 1.0 / length;
            m01 *= inv_length;
            m02 *= inv_length;
            let q = 2.0 * m01 * m12 + m02 * (m22 - m11);
            self.diag[1] = m11 + m02 * q;
            self.diag[2] = m22 - m02 * q;
            self.subd[0] = length;
            self.subd[1] = m12 - m01 * q;
            self.matrix = [
                [1.0, 0.0, 0.0],
                [0.0, m01, m02],
                [0.0, m02, -m01],
            ];
            self.is_rotation = false;
        } else {
            self.diag[1] = m11;
            self.diag[2] = m22;
            self.subd[0] = m01;
            self.subd[1] = m12;
            self.matrix = [
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
            ];
            self.is_rotation = true;
        }
    }

    /// QL iteration with implicit shifts over the tridiagonal form.
    ///
    /// Returns `false` if any eigenvalue fails to converge within
    /// `MAX_SWEEPS` sweeps.
    fn ql_iterate(&mut self) -> bool {
        for i0 in 0..SIZE {
            let mut sweep = 0;
            while sweep < MAX_SWEEPS {
                // Find the first negligible subdiagonal entry at or after i0
                let mut i2 = i0;
                while i2 + 2 <= SIZE {
                    let tmp = self.diag[i2].abs() + self.diag[i2 + 1].abs();
                    if self.subd[i2].abs() + tmp == tmp {
                        break;
                    }
                    i2 += 1;
                }
                if i2 == i0 {
                    break;
                }

                let mut g = (self.diag[i0 + 1] - self.diag[i0]) / (2.0 * self.subd[i0]);
                let mut r = (g * g + 1.0).sqrt();
                if g < 0.0 {
                    g = self.diag[i2] - self.diag[i0] + self.subd[i0] / (g - r);
                } else {
                    g = self.diag[i2] - self.diag[i0] + self.subd[i0] / (g + r);
                }

                let mut sin = 1.0_f32;
                let mut cos = 1.0_f32;
                let mut p = 0.0_f32;

                for i3 in (i0..i2).rev() {
                    let mut f = sin * self.subd[i3];
                    let b = cos * self.subd[i3];
                    if f.abs() >= g.abs() {
                        cos = g / f;
                        r = (cos * cos + 1.0).sqrt();
                        self.subd[i3 + 1] = f * r;
                        sin = 1.0 / r;
                        cos *= sin;
                    } else {
                        sin = f / g;
                        r = (sin * sin + 1.0).sqrt();
                        self.subd[i3 + 1] = g * r;
                        cos = 1.0 / r;
                        sin *= cos;
                    }
                    g = self.diag[i3 + 1] - p;
                    r = (self.diag[i3] - g) * sin + 2.0 * b * cos;
                    p = sin * r;
                    self.diag[i3 + 1] = g + p;
                    g = cos * r - b;

                    // Accumulate the Givens rotation into the basis columns
                    for row in self.matrix.iter_mut() {
                        f = row[i3 + 1];
                        row[i3 + 1] = sin * row[i3] + cos * f;
                        row[i3] = cos * row[i3] - sin * f;
                    }
                }
                self.diag[i0] -= p;
                self.subd[i0] = g;
                self.subd[i2] = 0.0;

                sweep += 1;
            }
            if sweep == MAX_SWEEPS {
                return false;
            }
        }
        true
    }

    /// Sort eigenvalues in ascending order, permuting basis columns.
    fn sort_ascending(&mut self) {
        for i0 in 0..SIZE - 1 {
            // Locate minimum eigenvalue in the unsorted tail
            let mut i1 = i0;
            let mut min = self.diag[i1];
            for i2 in i0 + 1..SIZE {
                if self.diag[i2] < min {
                    i1 = i2;
                    min = self.diag[i1];
                }
            }

            if i1 != i0 {
                self.diag[i1] = self.diag[i0];
                self.diag[i0] = min;

                for row in self.matrix.iter_mut() {
                    row.swap(i0, i1);
                }

                // Each column swap flips the orientation of the basis
                self.is_rotation = !self.is_rotation;
            }
        }
    }

    /// Negate the first basis column if the accumulated factor is a
    /// reflection, so callers always receive a right-handed basis.
    fn guarantee_rotation(&mut self) {
        if !self.is_rotation {
            for row in self.matrix.iter_mut() {
                row[0] = -row[0];
            }
            self.is_rotation = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn solve(matrix: [[f32; 3]; 3]) -> EigenSolver {
        let mut solver = EigenSolver::new(matrix);
        assert!(solver.solve_ascending());
        solver
    }

    #[test]
    fn test_diagonal_matrix() {
        let solver = solve([
            [3.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 2.0],
        ]);

        assert!((solver.eigenvalue(0) - 1.0).abs() < 1e-5);
        assert!((solver.eigenvalue(1) - 2.0).abs() < 1e-5);
        assert!((solver.eigenvalue(2) - 3.0).abs() < 1e-5);

        // Eigenvectors are the (possibly negated) canonical axes
        assert!(solver.eigenvector(0).dot(Vec3::Y).abs() > 0.999);
        assert!(solver.eigenvector(1).dot(Vec3::Z).abs() > 0.999);
        assert!(solver.eigenvector(2).dot(Vec3::X).abs() > 0.999);
    }

    #[test]
    fn test_known_symmetric_matrix() {
        // Eigenvalues of [[2,1,0],[1,2,0],[0,0,5]] are 1, 3 and 5
        let solver = solve([
            [2.0, 1.0, 0.0],
            [1.0, 2.0, 0.0],
            [0.0, 0.0, 5.0],
        ]);

        assert!((solver.eigenvalue(0) - 1.0).abs() < 1e-4);
        assert!((solver.eigenvalue(1) - 3.0).abs() < 1e-4);
        assert!((solver.eigenvalue(2) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_basis_is_orthonormal_rotation() {
        let solver = solve([
            [4.0, 2.0, 0.5],
            [2.0, 3.0, 1.0],
            [0.5, 1.0, 2.0],
        ]);

        let x = solver.eigenvector(0);
        let y = solver.eigenvector(1);
        let z = solver.eigenvector(2);

        assert!((x.length() - 1.0).abs() < 1e-4);
        assert!((y.length() - 1.0).abs() < 1e-4);
        assert!((z.length() - 1.0).abs() < 1e-4);
        assert!(x.dot(y).abs() < 1e-4);
        assert!(y.dot(z).abs() < 1e-4);
        assert!(z.dot(x).abs() < 1e-4);

        // Proper rotation: x cross y == z
        assert!((x.cross(y) - z).length() < 1e-3);
    }

    #[test]
    fn test_zero_matrix() {
        let solver = solve([[0.0; 3]; 3]);

        for i in 0..3 {
            assert_eq!(solver.eigenvalue(i), 0.0);
            assert!((solver.eigenvector(i).length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_eigenvector_satisfies_definition() {
        let m = [
            [4.0, 2.0, 0.5],
            [2.0, 3.0, 1.0],
            [0.5, 1.0, 2.0],
        ];
        let solver = solve(m);

        for i in 0..3 {
            let v = solver.eigenvector(i);
            let mv = Vec3::new(
                m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
                m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
                m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
            );
            assert!((mv - v * solver.eigenvalue(i)).length() < 1e-3);
        }
    }
}
