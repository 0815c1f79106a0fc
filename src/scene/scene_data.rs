/// Scene assembler.
///
/// The host feeds geometries and their vertices through a begin/end
/// protocol:
///
/// ```text
/// begin_scene
///   begin_geometry(g)
///     add_vertices(..)        // repeated; f32 or f64 buffers
///     transform_vertices(m)   // optional, current geometry only
///   end_geometry              // fits g's own bounding box
///   ...
/// end_scene                   // trims excess capacity
/// ```
///
/// All vertices live in one flat pool; each geometry records a
/// contiguous `(start, len)` slice of it. Out-of-order calls surface
/// `Error::InvalidScene` instead of corrupting the pool.

use glam::{Mat4, Vec3};
use crate::error::Result;
use crate::math::{Box3, BoxKind};
use crate::vis_bail;
use super::geometry::Geometry;

const SOURCE: &str = "vistree::SceneData";

/// A geometry plus its slice of the scene vertex pool.
///
/// `start` and `len` are measured in floats (three per vertex); the
/// builder rewrites `start` when it repartitions the pool between
/// child nodes.
pub(crate) struct GeometryRecord {
    pub(crate) geometry: Geometry,
    pub(crate) start: usize,
    pub(crate) len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblyState {
    /// No scene open (initial, or after end_scene)
    Idle,
    /// Scene open, between geometries
    SceneOpen,
    /// Inside a begin_geometry / end_geometry pair
    GeometryOpen,
}

pub struct SceneData {
    box_kind: BoxKind,
    vertices: Vec<f32>,
    records: Vec<GeometryRecord>,
    state: AssemblyState,
}

impl SceneData {
    /// Create an assembler. `box_kind` selects how per-geometry (and
    /// later per-node) bounding boxes are fitted.
    pub fn new(box_kind: BoxKind) -> Self {
        Self {
            box_kind,
            vertices: Vec::new(),
            records: Vec::new(),
            state: AssemblyState::Idle,
        }
    }

    /// Start a new scene, discarding any previous content.
    pub fn begin_scene(&mut self) -> Result<()> {
        if self.state == AssemblyState::GeometryOpen {
            vis_bail!(SOURCE, "begin_scene called inside an open geometry");
        }

        self.vertices.clear();
        self.records.clear();
        self.state = AssemblyState::SceneOpen;
        Ok(())
    }

    /// Start a new geometry; subsequent vertices belong to it.
    ///
    /// Takes ownership of the geometry; it is handed to the hierarchy
    /// leaf that ends up containing it.
    pub fn begin_geometry(&mut self, geometry: Geometry) -> Result<()> {
        if self.state != AssemblyState::SceneOpen {
            vis_bail!(SOURCE, "begin_geometry requires an open scene");
        }

        self.records.push(GeometryRecord {
            geometry,
            start: self.vertices.len(),
            len: 0,
        });
        self.state = AssemblyState::GeometryOpen;
        Ok(())
    }

    /// Append `(x, y, z)` triples to the current geometry.
    pub fn add_vertices(&mut self, vertices: &[f32]) -> Result<()> {
        let record = self.open_record("add_vertices")?;
        record.len += vertices.len();
        self.vertices.extend_from_slice(vertices);
        self.check_triples()
    }

    /// Append double-precision `(x, y, z)` triples, narrowing each
    /// element to f32.
    pub fn add_vertices_f64(&mut self, vertices: &[f64]) -> Result<()> {
        let record = self.open_record("add_vertices_f64")?;
        record.len += vertices.len();
        self.vertices.extend(vertices.iter().map(|&v| v as f32));
        self.check_triples()
    }

    /// Transform the current geometry's vertices by a 4x4 matrix
    /// (homogeneous transform with perspective divide).
    ///
    /// An identity matrix is a no-op. Earlier geometries are untouched.
    pub fn transform_vertices(&mut self, matrix: &Mat4) -> Result<()> {
        let start = self.open_record("transform_vertices")?.start;

        if *matrix == Mat4::IDENTITY {
            return Ok(());
        }

        for vertex in self.vertices[start..].chunks_exact_mut(3) {
            let transformed = matrix.project_point3(Vec3::from_slice(vertex));
            vertex.copy_from_slice(&transformed.to_array());
        }
        Ok(())
    }

    /// Read-only view of the current geometry's vertices.
    ///
    /// Lets the host echo transformed vertices into its own render
    /// buffers.
    pub fn current_vertices(&self) -> Result<&[f32]> {
        if self.state != AssemblyState::GeometryOpen {
            vis_bail!(SOURCE, "current_vertices requires an open geometry");
        }

        match self.records.last() {
            Some(record) => Ok(&self.vertices[record.start..]),
            None => Ok(&[]),
        }
    }

    /// Close the current geometry and fit its bounding box from the
    /// vertices added since `begin_geometry`.
    pub fn end_geometry(&mut self) -> Result<()> {
        if self.state != AssemblyState::GeometryOpen {
            vis_bail!(SOURCE, "end_geometry without begin_geometry");
        }

        let box_kind = self.box_kind;
        if let Some(record) = self.records.last_mut() {
            let slice = &self.vertices[record.start..record.start + record.len];
            record.geometry.set_bounding_box(Box3::fit(box_kind, slice));
        }

        self.state = AssemblyState::SceneOpen;
        Ok(())
    }

    /// Close the scene and trim excess pool capacity.
    pub fn end_scene(&mut self) -> Result<()> {
        if self.state != AssemblyState::SceneOpen {
            vis_bail!(SOURCE, "end_scene requires an open scene with no open geometry");
        }

        self.vertices.shrink_to_fit();
        self.records.shrink_to_fit();
        self.state = AssemblyState::Idle;
        Ok(())
    }

    /// Number of geometries assembled so far.
    pub fn geometry_count(&self) -> usize {
        self.records.len()
    }

    /// Number of vertices in the pool.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// The configured bounding-box kind.
    pub fn box_kind(&self) -> BoxKind {
        self.box_kind
    }

    /// Hand the pool and geometry records to the tree builder.
    pub(crate) fn into_parts(self) -> Result<(Vec<f32>, Vec<GeometryRecord>)> {
        if self.state == AssemblyState::GeometryOpen {
            vis_bail!(SOURCE, "scene handed to the builder with an open geometry");
        }
        Ok((self.vertices, self.records))
    }

    fn open_record(&mut self, operation: &str) -> Result<&mut GeometryRecord> {
        if self.state != AssemblyState::GeometryOpen {
            vis_bail!(SOURCE, "{} requires an open geometry", operation);
        }

        match self.records.last_mut() {
            Some(record) => Ok(record),
            None => vis_bail!(SOURCE, "{} requires an open geometry", operation),
        }
    }

    fn check_triples(&self) -> Result<()> {
        if self.vertices.len() % 3 != 0 {
            vis_bail!(SOURCE, "vertex data is not a whole number of (x, y, z) triples");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "scene_data_tests.rs"]
mod tests;
