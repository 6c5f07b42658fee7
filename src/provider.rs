//! The seam between the geometry kinds of a plane and the mesh builders.  A plane part which can
//! hand out its surfaces as panels implements `SurfaceProvider`; rebuilds report what they
//! invalidated through `Dirty` instead of global flags.

use crate::Result;
use crate::config::MeshConfig;
use crate::geom3::Point3;
use crate::mesh::{MeshRange, QuadMesh, TriMesh, quadrangulate_surfaces, triangulate_surfaces};
use crate::wing::Wing;
use serde::{Deserialize, Serialize};

/// A geometry which can be meshed into the shared arenas of a plane.
pub trait SurfaceProvider {
    /// Appends the triangles of the part to `mesh` and returns the range they occupy.
    fn triangulate(&self, mesh: &mut TriMesh, config: &MeshConfig) -> Result<MeshRange>;

    /// Appends the quads of the part to `mesh` and returns the range they occupy.
    fn quadrangulate(&self, mesh: &mut QuadMesh, config: &MeshConfig) -> Result<MeshRange>;

    /// The leading and trailing edge points of every spanwise junction, from the left tip to the
    /// right tip, for display
    fn outline(&self) -> Vec<[Point3; 2]>;

    /// The top and bottom hinge lines of every leading and trailing edge flap, for display
    fn flap_outline(&self) -> Vec<[Point3; 2]>;

    fn planform_area(&self) -> f64;
}

/// What a rebuild has invalidated.  Returned to the caller, which decides what to redraw or
/// recompute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dirty {
    pub geometry: bool,
    pub mesh: bool,
    pub stations: bool,
    pub results: bool,
}

impl Dirty {
    /// Everything a full rebuild invalidates
    pub fn all() -> Self {
        Self {
            geometry: true,
            mesh: true,
            stations: true,
            results: true,
        }
    }

    pub fn any(&self) -> bool {
        self.geometry || self.mesh || self.stations || self.results
    }

    /// Combines the flags of two rebuilds.
    pub fn merge(self, other: Dirty) -> Self {
        Self {
            geometry: self.geometry || other.geometry,
            mesh: self.mesh || other.mesh,
            stations: self.stations || other.stations,
            results: self.results || other.results,
        }
    }
}

/// The wing meshes the surfaces of its last build.  It must have been rebuilt before.
impl SurfaceProvider for Wing {
    fn triangulate(&self, mesh: &mut TriMesh, config: &MeshConfig) -> Result<MeshRange> {
        triangulate_surfaces(self.surfaces(), mesh, config)
    }

    fn quadrangulate(&self, mesh: &mut QuadMesh, config: &MeshConfig) -> Result<MeshRange> {
        quadrangulate_surfaces(self.surfaces(), mesh, config)
    }

    fn outline(&self) -> Vec<[Point3; 2]> {
        let mut points: Vec<[Point3; 2]> = self.surfaces().iter().map(|s| [s.la, s.ta]).collect();
        if let Some(last) = self.surfaces().last() {
            points.push([last.lb, last.tb]);
        }
        points
    }

    fn flap_outline(&self) -> Vec<[Point3; 2]> {
        self.surfaces().iter().flat_map(|s| s.hinge_lines()).collect()
    }

    fn planform_area(&self) -> f64 {
        Wing::planform_area(self)
    }
}
