/// Leaf payload of the hierarchy.
///
/// A Geometry carries an application-assigned id — the host's handle for
/// issuing the actual draw calls — and the bounding box fitted to its
/// vertices during scene assembly. Created by the host, owned by
/// `SceneData` while the scene is assembled, then shared-owned by the
/// hierarchy leaves that contain it.

use crate::math::Box3;

pub struct Geometry {
    id: i32,
    bounding_box: Box3,
}

impl Geometry {
    /// Create a geometry with an application-assigned id.
    ///
    /// The bounding box starts empty and is fitted by
    /// `SceneData::end_geometry`.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            bounding_box: Box3::default(),
        }
    }

    /// The application-assigned id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Bounding box fitted to this geometry's own vertices.
    pub fn bounding_box(&self) -> &Box3 {
        &self.bounding_box
    }

    pub(crate) fn set_bounding_box(&mut self, bounding_box: Box3) {
        self.bounding_box = bounding_box;
    }
}
