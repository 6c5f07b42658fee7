//! Quadrilateral panels.

use super::SurfacePosition;
use crate::geom3::{Point3, Vector3, is_same, lerp, normalized_or_zero};
use serde::{Deserialize, Serialize};

/// Corners closer than this are merged when computing the collocation point
const CORNER_PRECISION: f64 = 0.001;
const SYMMETRY_PRECISION: f64 = 1.0e-5;

/// A quadrilateral panel referencing four nodes of a `QuadMesh`.  The corners are named in the
/// panel frame: `la`/`ta` are the leading and trailing corners of side A, `lb`/`tb` those of side
/// B.  Bottom panels are built with their sides swapped so that every normal points out of the
/// wing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel4 {
    pub index: usize,

    /// Node indices in the order la, lb, ta, tb
    pub nodes: [usize; 4],

    pub normal: Vector3,
    pub area: f64,

    /// The mean of the distinct corners
    pub collocation: Point3,

    /// The middle of the 3/4 chord line
    pub control_point: Point3,

    /// The end points of the bound vortex on the 1/4 chord line
    pub vortex_a: Point3,
    pub vortex_b: Point3,

    pub position: SurfacePosition,
    pub surface: usize,
    pub surface_normal: Vector3,

    /// Neighbours across the la-ta edge and across the lb-tb edge
    pub left: Option<usize>,
    pub right: Option<usize>,

    /// Chordwise neighbours on the developed surface
    pub down: Option<usize>,
    pub up: Option<usize>,

    /// The wake column shed by a trailing panel, shared by the top and bottom panels of a strip
    pub wake: Option<usize>,

    pub trailing: bool,
    pub leading: bool,
    pub flap: bool,
    pub left_wing: bool,
    pub in_sym_plane: bool,
    pub te_bisectors: Option<[Vector3; 2]>,
}

impl Panel4 {
    /// Creates a panel from its corner positions and node indices, both in the order
    /// la, lb, ta, tb.
    pub fn new(corners: [Point3; 4], nodes: [usize; 4]) -> Self {
        let [la, lb, ta, tb] = corners;
        let n = (tb - la).cross(&(lb - ta));

        let mut distinct = vec![la];
        for p in [lb, tb, ta] {
            if distinct.last().is_some_and(|q| !is_same(&p, q, CORNER_PRECISION)) {
                distinct.push(p);
            }
        }
        let sum = distinct.iter().fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let collocation = Point3::from(sum / distinct.len() as f64);

        let ca = lerp(&la, &ta, 0.75);
        let cb = lerp(&lb, &tb, 0.75);

        Self {
            index: 0,
            nodes,
            normal: normalized_or_zero(&n),
            area: n.norm() / 2.0,
            collocation,
            control_point: lerp(&ca, &cb, 0.5),
            vortex_a: lerp(&la, &ta, 0.25),
            vortex_b: lerp(&lb, &tb, 0.25),
            position: SurfacePosition::None,
            surface: 0,
            surface_normal: Vector3::zeros(),
            left: None,
            right: None,
            down: None,
            up: None,
            wake: None,
            trailing: false,
            leading: false,
            flap: false,
            left_wing: false,
            in_sym_plane: corners.iter().all(|p| p.y.abs() < SYMMETRY_PRECISION),
            te_bisectors: None,
        }
    }

    /// The middle of the bound vortex
    pub fn vortex_position(&self) -> Point3 {
        lerp(&self.vortex_a, &self.vortex_b, 0.5)
    }

    /// The bound vortex vector, from side A to side B
    pub fn vortex(&self) -> Vector3 {
        self.vortex_b - self.vortex_a
    }

    /// The node indices of the la-ta edge
    pub fn edge_a(&self) -> (usize, usize) {
        (self.nodes[0], self.nodes[2])
    }

    /// The node indices of the lb-tb edge
    pub fn edge_b(&self) -> (usize, usize) {
        (self.nodes[1], self.nodes[3])
    }
}
