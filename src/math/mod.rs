//! Geometric primitives and vertex-cloud statistics
//!
//! Bounding boxes (axis-aligned and oriented), Hessian-form planes,
//! statistical moments over flat vertex streams, and the symmetric 3x3
//! eigensolver used for oriented-box fitting.

mod box3;
mod eigen;
mod plane;
pub mod statistics;

pub use box3::{Box3, BoxKind};
pub use eigen::EigenSolver;
pub use plane::{Plane, PlaneSide};
