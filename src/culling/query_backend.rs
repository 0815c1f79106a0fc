/// Abstract occlusion-query backend.
///
/// The occlusion culler never talks to the GPU directly; everything it
/// needs — issuing queries, rasterizing box hulls with writes disabled,
/// polling for results — goes through this trait. A real implementation
/// wraps the graphics API's occlusion queries; `MockQueryBackend`
/// provides a deterministic software stand-in so CHC traversal is
/// testable without a GPU.

use glam::Vec3;
use crate::error::Result;
use crate::tree::{NodeId, Statistics};

/// Occlusion-query interface used by `OcclusionCuller`.
///
/// Implementations pre-allocate one query handle per hierarchy node,
/// indexed by node id, and keep issued queries in a FIFO whose results
/// arrive asynchronously from the driver.
pub trait QueryBackend {
    /// Allocate query handles for a freshly built hierarchy, one per
    /// node id.
    fn init(&mut self, stats: &Statistics) -> Result<()>;

    /// Start an occlusion query for `node` with color and depth writes
    /// (and lighting) disabled: the bounding volume drawn inside the
    /// bracket affects nothing but the sample counter.
    fn begin_bounding_volume_query(&mut self, node: NodeId) -> Result<()>;

    /// End the bounding-volume query and restore write state.
    fn end_bounding_volume_query(&mut self);

    /// Start an occlusion query for `node` with writes left enabled:
    /// the geometry drawn inside the bracket lands in the framebuffer
    /// while being counted.
    fn begin_geometry_query(&mut self, node: NodeId) -> Result<()>;

    /// End the geometry query.
    fn end_geometry_query(&mut self);

    /// Rasterize a box hull given its eight corners, in the order
    /// produced by `Box3::corners`. Called between a bounding-volume
    /// query bracket.
    fn draw_bounding_volume(&mut self, corners: &[Vec3; 8]);

    /// True iff no queries are in flight.
    fn done(&self) -> bool;

    /// Remove and return the node whose query was issued earliest.
    fn pop_front_node(&mut self) -> Option<NodeId>;

    /// Has the earliest-issued query's result been returned by the
    /// driver yet? Non-blocking.
    fn front_result_available(&self) -> bool;

    /// The number of rasterized samples that passed for `node`'s query.
    ///
    /// The culler only calls this for nodes popped from the queue, after
    /// `front_result_available` reported the result ready (or when it
    /// decides to block on the front query).
    fn query_result(&mut self, node: NodeId) -> Result<u32>;
}
