use super::SurfacePosition;
use crate::geom3::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// A mesh vertex.  Nodes are owned by a mesh arena and shared by all panels referencing them by
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub position: Point3,

    /// The area weighted average of the normals of the panels using the node, zero until the
    /// mesh has been assembled
    pub normal: Vector3,
    pub surface_position: SurfacePosition,

    /// The index of the surface of the wing which created the node
    pub surface: usize,
}

impl Node {
    pub fn new(position: Point3, surface_position: SurfacePosition, surface: usize) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            surface_position,
            surface,
        }
    }
}
