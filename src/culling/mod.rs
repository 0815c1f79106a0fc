//! Per-frame visibility culling strategies
//!
//! View-frustum culling with coherence masks, and coherent hierarchical
//! occlusion culling driven by an abstract query backend.

mod frustum_culler;
mod mock_query_backend;
mod occlusion_culler;
mod query_backend;

pub use frustum_culler::{
    FrustumCallback, FrustumCuller, PLANE_BOTTOM, PLANE_FAR, PLANE_LEFT, PLANE_NEAR, PLANE_RIGHT,
    PLANE_TOP,
};
pub use mock_query_backend::MockQueryBackend;
pub use occlusion_culler::{OcclusionCallback, OcclusionCuller};
pub use query_backend::QueryBackend;
