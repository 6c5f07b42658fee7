//! Triangular panels.

use super::SurfacePosition;
use crate::geom3::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Edges shorter than this make a triangle null
const LENGTH_PRECISION: f64 = 1.0e-6;

/// Internal angles smaller than this, in degrees, make a triangle null
const ANGLE_PRECISION: f64 = 1.0e-4;

/// A triangular panel referencing three nodes of a `TriMesh`.  Edge `i` is the edge opposite to
/// vertex `i`, so `neighbours[i]` is the panel across the edge joining the two other vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel3 {
    /// The position of the panel in its arena
    pub index: usize,
    pub nodes: [usize; 3],

    pub normal: Vector3,
    pub centroid: Point3,
    pub area: f64,

    pub position: SurfacePosition,

    /// The index of the surface of the wing which created the panel
    pub surface: usize,

    /// The normal of the surface which created the panel
    pub surface_normal: Vector3,

    pub neighbours: [Option<usize>; 3],

    /// The chordwise neighbours on the developed surface.  Down is towards the trailing edge on
    /// the bottom and mid surfaces.
    pub down: Option<usize>,
    pub up: Option<usize>,

    /// The trailing panel on the other side of the trailing edge
    pub opposite: Option<usize>,

    /// The wake column shed from the trailing edge of a trailing panel.  The top and bottom
    /// trailing panels of a strip shed into the same column.
    pub wake: Option<usize>,

    pub trailing: bool,
    pub leading: bool,
    pub flap: bool,
    pub left_wing: bool,
    pub in_sym_plane: bool,

    /// The trailing edge bisectors at the two trailing vertices of a bottom or mid trailing
    /// panel, giving the initial direction of the wake
    pub te_bisectors: Option<[Vector3; 2]>,
}

impl Panel3 {
    /// Creates a panel from the positions and indices of its three nodes.  Returns `None` if the
    /// triangle is null: one of its edges is shorter than 1e-6 or one of its angles is smaller
    /// than 1e-4 degrees.
    ///
    /// # Arguments
    ///
    /// * `vertices`: the positions of the three nodes
    /// * `nodes`: the indices of the three nodes in the arena
    ///
    /// returns: Option<Panel3>
    pub fn new(vertices: [Point3; 3], nodes: [usize; 3]) -> Option<Self> {
        if Self::is_null(&vertices) {
            return None;
        }
        let n = (vertices[1] - vertices[0]).cross(&(vertices[2] - vertices[0]));
        let centroid = Point3::from((vertices[0].coords + vertices[1].coords + vertices[2].coords) / 3.0);

        Some(Self {
            index: 0,
            nodes,
            normal: n.normalize(),
            centroid,
            area: n.norm() / 2.0,
            position: SurfacePosition::None,
            surface: 0,
            surface_normal: Vector3::zeros(),
            neighbours: [None; 3],
            down: None,
            up: None,
            opposite: None,
            wake: None,
            trailing: false,
            leading: false,
            flap: false,
            left_wing: false,
            in_sym_plane: false,
            te_bisectors: None,
        })
    }

    /// Checks whether a triangle is too small or too flat to be used as a panel.
    pub fn is_null(vertices: &[Point3; 3]) -> bool {
        for i in 0..3 {
            let a = vertices[(i + 1) % 3] - vertices[i];
            let b = vertices[(i + 2) % 3] - vertices[i];
            if a.norm() < LENGTH_PRECISION || b.norm() < LENGTH_PRECISION {
                return true;
            }
            let angle = a.cross(&b).norm().atan2(a.dot(&b)).to_degrees();
            if angle.abs() < ANGLE_PRECISION {
                return true;
            }
        }
        false
    }

    /// The indices of the two nodes bounding edge `i`
    pub fn edge(&self, i: usize) -> (usize, usize) {
        (self.nodes[(i + 1) % 3], self.nodes[(i + 2) % 3])
    }

    /// The local vertex of the panel which references `node`, if any
    pub fn local_vertex(&self, node: usize) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    pub fn neighbour_count(&self) -> usize {
        self.neighbours.iter().flatten().count()
    }

    pub fn is_neighbour(&self, panel: usize) -> bool {
        self.neighbours.contains(&Some(panel))
    }
}
