//! The plane aggregate.  A `Plane` owns its wings and the triangle and quad arenas shared by all
//! of them; each wing only knows the `MeshRange` of the arena it occupies.  Rebuilds are atomic:
//! everything is built into fresh arenas from rebuilt copies of the wings, and nothing is swapped
//! in unless every step succeeded.  A successful rebuild of one arena drops the other one, which
//! was meshed from the previous geometry, as does any edit of the wing list.

use crate::Result;
use crate::aero::{OperatingPoint, PanelSolution, PolarSettings, WingLoads, analyse_quad_wing, analyse_tri_wing};
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::foil::FoilSource;
use crate::mesh::{MeshRange, QuadMesh, TriMesh};
use crate::provider::{Dirty, SurfaceProvider};
use crate::wing::{Placement, Wing};
use serde::{Deserialize, Serialize};

/// A wing and where it sits on the plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedWing {
    pub wing: Wing,
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plane {
    pub name: String,
    wings: Vec<PlacedWing>,

    #[serde(skip)]
    tri_mesh: TriMesh,

    #[serde(skip)]
    quad_mesh: QuadMesh,

    #[serde(skip)]
    tri_ranges: Vec<MeshRange>,

    #[serde(skip)]
    quad_ranges: Vec<MeshRange>,
}

impl Plane {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Adds a wing to the plane and returns its index.  The meshes of the plane do not include
    /// it until the next rebuild.
    pub fn add_wing(&mut self, wing: Wing, placement: Placement) -> usize {
        self.wings.push(PlacedWing { wing, placement });
        self.wings.len() - 1
    }

    pub fn wings(&self) -> &[PlacedWing] {
        &self.wings
    }

    pub fn wing(&self, index: usize) -> Option<&PlacedWing> {
        self.wings.get(index)
    }

    /// Gives mutable access to wing `index`.  Both arenas are dropped since they may no longer
    /// match the wing, and the plane must be rebuilt before it is analysed again.
    pub fn wing_mut(&mut self, index: usize) -> Option<&mut PlacedWing> {
        if index < self.wings.len() {
            self.clear_meshes();
        }
        self.wings.get_mut(index)
    }

    /// Removes and returns wing `index`, dropping both arenas.
    pub fn remove_wing(&mut self, index: usize) -> Option<PlacedWing> {
        if index >= self.wings.len() {
            return None;
        }
        self.clear_meshes();
        Some(self.wings.remove(index))
    }

    pub fn tri_mesh(&self) -> &TriMesh {
        &self.tri_mesh
    }

    pub fn quad_mesh(&self) -> &QuadMesh {
        &self.quad_mesh
    }

    /// The part of the triangle arena which belongs to wing `index`
    pub fn tri_range(&self, index: usize) -> Result<&MeshRange> {
        self.tri_ranges.get(index).ok_or_else(|| MeshError::NotMeshed.into())
    }

    /// The part of the quad arena which belongs to wing `index`
    pub fn quad_range(&self, index: usize) -> Result<&MeshRange> {
        self.quad_ranges.get(index).ok_or_else(|| MeshError::NotMeshed.into())
    }

    /// The total planform area of the wings
    pub fn planform_area(&self) -> f64 {
        self.wings.iter().map(|w| SurfaceProvider::planform_area(&w.wing)).sum()
    }

    /// Rebuilds the geometry of every wing and the triangle arena.  On failure the previous
    /// wings and mesh are kept and the error is returned.
    ///
    /// # Arguments
    ///
    /// * `foils`: the source of the foils named by the wing sections
    /// * `config`: the build configuration
    ///
    /// returns: Result<Dirty, Box<dyn Error, Global>>
    pub fn rebuild_tri_mesh(&mut self, foils: &dyn FoilSource, config: &MeshConfig) -> Result<Dirty> {
        let built = self.rebuild_wings(foils, config).and_then(|wings| {
            let mut mesh = TriMesh::new();
            let ranges = mesh_wings(&wings, |w| w.triangulate(&mut mesh, config))?;
            Ok((wings, mesh, ranges))
        });

        match built {
            Ok((wings, mesh, ranges)) => {
                self.swap_wings(wings);
                self.clear_meshes();
                self.tri_mesh = mesh;
                self.tri_ranges = ranges;
                Ok(Dirty::all())
            }
            Err(e) => {
                log::warn!("triangle mesh rebuild of {} failed, keeping the previous mesh: {}", self.name, e);
                Err(e)
            }
        }
    }

    /// Rebuilds the geometry of every wing and the quad arena, as `rebuild_tri_mesh` does.
    pub fn rebuild_quad_mesh(&mut self, foils: &dyn FoilSource, config: &MeshConfig) -> Result<Dirty> {
        let built = self.rebuild_wings(foils, config).and_then(|wings| {
            let mut mesh = QuadMesh::new();
            let ranges = mesh_wings(&wings, |w| w.quadrangulate(&mut mesh, config))?;
            Ok((wings, mesh, ranges))
        });

        match built {
            Ok((wings, mesh, ranges)) => {
                self.swap_wings(wings);
                self.clear_meshes();
                self.quad_mesh = mesh;
                self.quad_ranges = ranges;
                Ok(Dirty::all())
            }
            Err(e) => {
                log::warn!("quad mesh rebuild of {} failed, keeping the previous mesh: {}", self.name, e);
                Err(e)
            }
        }
    }

    /// Integrates a triangle solution computed on the arena of the plane over wing `index`.
    pub fn analyse_tri(
        &self,
        index: usize,
        polar: &PolarSettings,
        op: &OperatingPoint,
        solution: &PanelSolution,
        pcd: Option<&[f64]>,
    ) -> Result<WingLoads> {
        let wing = self.wings.get(index).ok_or(MeshError::SurfaceIndexOutOfBounds(index))?;
        let range = self.tri_range(index)?;
        analyse_tri_wing(&wing.wing, &self.tri_mesh, range, polar, op, solution, pcd)
    }

    /// Integrates a quad or vortex lattice solution over wing `index`.
    pub fn analyse_quad(
        &self,
        index: usize,
        polar: &PolarSettings,
        op: &OperatingPoint,
        solution: &PanelSolution,
        pcd: Option<&[f64]>,
    ) -> Result<WingLoads> {
        let wing = self.wings.get(index).ok_or(MeshError::SurfaceIndexOutOfBounds(index))?;
        let range = self.quad_range(index)?;
        analyse_quad_wing(&wing.wing, &self.quad_mesh, range, polar, op, solution, pcd)
    }

    fn rebuild_wings(&self, foils: &dyn FoilSource, config: &MeshConfig) -> Result<Vec<Wing>> {
        self.wings
            .iter()
            .map(|pw| pw.wing.rebuilt(&pw.placement, foils, config))
            .collect()
    }

    fn clear_meshes(&mut self) {
        self.tri_mesh.clear();
        self.quad_mesh.clear();
        self.tri_ranges.clear();
        self.quad_ranges.clear();
    }

    fn swap_wings(&mut self, wings: Vec<Wing>) {
        for (pw, w) in self.wings.iter_mut().zip(wings) {
            pw.wing = w;
        }
    }
}

/// Meshes each wing in turn and checks that its stations match the strips of its mesh.
fn mesh_wings<F>(wings: &[Wing], mut build: F) -> Result<Vec<MeshRange>>
where
    F: FnMut(&Wing) -> Result<MeshRange>,
{
    let mut ranges = Vec::with_capacity(wings.len());
    for w in wings {
        let range = build(w)?;
        let stations = w.stations();
        if !stations.is_consistent() || stations.len() != range.strip_count() {
            return Err(Box::new(MeshError::StationMismatch {
                expected: range.strip_count(),
                found: stations.len(),
            }));
        }
        ranges.push(range);
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aero::{AeroForces, AnalysisMethod, tri_inviscid_forces};
    use crate::foil::{Foil, FoilDatabase};
    use crate::geom3::Vector3;
    use crate::wing::{WingSection, WingType};
    use approx::assert_relative_eq;

    fn foils() -> FoilDatabase {
        vec![Foil::naca4("0012").unwrap(), Foil::naca4("2412").unwrap()]
            .into_iter()
            .collect()
    }

    fn rect(nx: usize, ny: usize) -> Wing {
        Wing::from_sections(
            "rect",
            WingType::Main,
            true,
            vec![
                WingSection::new(0.0, 0.3, 0.0).with_panels(nx, ny).with_foil("NACA 0012"),
                WingSection::new(0.5, 0.3, 0.0).with_foil("NACA 0012"),
            ],
        )
    }

    fn plane() -> Plane {
        let mut p = Plane::new("test");
        p.add_wing(rect(4, 3), Placement::default());
        let mut fin = Wing::new(WingType::Fin);
        for s in fin.sections.iter_mut() {
            *s = s.clone().with_foil("NACA 0012");
        }
        p.add_wing(fin, Placement::at(Vector3::new(0.8, 0.0, 0.0)));
        p
    }

    #[test]
    fn rectangular_wing_through_a_plane() {
        let mut p = Plane::new("rect");
        p.add_wing(rect(4, 3), Placement::default());
        p.rebuild_tri_mesh(&foils(), &MeshConfig::default()).unwrap();
        let w = &p.wing(0).unwrap().wing;
        assert_relative_eq!(w.planform_area(), 0.3, epsilon = 1.0e-12);
        assert_relative_eq!(w.projected_span(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(w.mac(), 0.3, epsilon = 1.0e-12);
    }

    #[test]
    fn triangle_count_of_a_two_sided_wing() {
        let mut p = Plane::new("rect");
        p.add_wing(rect(4, 3), Placement::default());
        let config = MeshConfig::default();
        p.rebuild_tri_mesh(&foils(), &config).unwrap();
        let range = p.tri_range(0).unwrap();

        // two surfaces of 4 x 3 quads on top and bottom, and a tip patch of 4 quads on each side
        // missing its two degenerate triangles
        let expected = 2 * 4 * 3 * 2 * 2 + 2 * (2 * 4 - 2);
        assert_eq!(range.panel_count(), expected);
        assert_eq!(p.wing(0).unwrap().wing.triangle_count(&config), expected);

        // only the trailing edge lines of the strips are open
        let mesh = p.tri_mesh();
        assert_eq!(mesh.free_edge_count(range.panels.clone()), 2 * range.strip_count());
        assert!(mesh.asymmetric_neighbours().is_empty());
    }

    #[test]
    fn uniform_suction_on_a_thin_mesh() {
        let mut p = Plane::new("rect");
        p.add_wing(rect(4, 3), Placement::default());
        p.rebuild_tri_mesh(&foils(), &MeshConfig::thin()).unwrap();
        let range = p.tri_range(0).unwrap();

        let mut polar = PolarSettings::new(AnalysisMethod::TriUniform);
        polar.thin_surfaces = true;
        let op = OperatingPoint::new(0.0, 0.0, 20.0);
        let solution = PanelSolution::from_cp(vec![-1.0; 3 * p.tri_mesh().panel_count()]);
        let mut af = AeroForces::new(0.0, 0.0, 20.0);
        tri_inviscid_forces(p.tri_mesh(), range, &polar, &op, &solution, &mut af).unwrap();

        let q = polar.dynamic_pressure(op.q_inf);
        af.scale_forces(q);
        let expected = q * 0.3;
        assert!((af.fsum.norm() - expected).abs() / expected < 0.01, "{}", af.fsum.norm());
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut p = plane();
        let config = MeshConfig::default();
        let dirty = p.rebuild_tri_mesh(&foils(), &config).unwrap();
        assert_eq!(dirty, Dirty::all());
        let mesh = p.tri_mesh().clone();
        let stations = p.wing(0).unwrap().wing.stations().clone();
        let ranges = p.tri_ranges.clone();

        p.rebuild_tri_mesh(&foils(), &config).unwrap();
        assert_eq!(p.tri_mesh(), &mesh);
        assert_eq!(p.wing(0).unwrap().wing.stations(), &stations);
        assert_eq!(p.tri_ranges, ranges);
    }

    #[test]
    fn wings_share_the_arena() {
        let mut p = plane();
        p.rebuild_quad_mesh(&foils(), &MeshConfig::default()).unwrap();
        let a = p.quad_range(0).unwrap();
        let b = p.quad_range(1).unwrap();
        assert_eq!(a.panels.end, b.panels.start);
        assert_eq!(a.nodes.end, b.nodes.start);
        assert_eq!(b.panels.end, p.quad_mesh().panel_count());
        assert!(p.quad_mesh().asymmetric_neighbours().is_empty());
        assert!(p.tri_range(0).is_err());
    }

    #[test]
    fn rebuilding_one_arena_drops_the_other() {
        let mut p = plane();
        let config = MeshConfig::default();
        p.rebuild_quad_mesh(&foils(), &config).unwrap();
        assert!(p.quad_range(0).is_ok());

        p.rebuild_tri_mesh(&foils(), &config).unwrap();
        assert!(p.quad_range(0).is_err());
        assert!(p.quad_mesh().is_empty());
        assert!(p.tri_range(0).is_ok());
    }

    #[test]
    fn edited_wing_is_not_analysed_on_a_stale_arena() {
        let mut p = plane();
        let config = MeshConfig::thin();
        p.rebuild_quad_mesh(&foils(), &config).unwrap();

        let w = &mut p.wing_mut(0).unwrap().wing;
        let root = w.sections[0].clone().with_panels(4, 5);
        w.sections[0] = root;
        assert!(p.quad_range(0).is_err());

        p.rebuild_tri_mesh(&foils(), &config).unwrap();
        assert!(p.quad_range(0).is_err());
        let strips = p.tri_range(0).unwrap().strip_count();
        assert_eq!(strips, 10);
        assert_eq!(p.wing(0).unwrap().wing.stations().len(), strips);

        let mut polar = PolarSettings::new(AnalysisMethod::Quad);
        polar.thin_surfaces = true;
        let solution = PanelSolution::from_cp(vec![-1.0; 1000]);
        let op = OperatingPoint::new(0.0, 0.0, 15.0);
        assert!(p.analyse_quad(0, &polar, &op, &solution, None).is_err());
    }

    #[test]
    fn removing_a_wing_drops_the_arenas() {
        let mut p = plane();
        p.rebuild_tri_mesh(&foils(), &MeshConfig::default()).unwrap();
        assert!(p.remove_wing(5).is_none());
        assert!(p.tri_range(1).is_ok());

        let fin = p.remove_wing(1).unwrap();
        assert_eq!(fin.wing.wing_type, WingType::Fin);
        assert_eq!(p.wings().len(), 1);
        assert!(p.tri_range(0).is_err());
        assert!(p.tri_mesh().is_empty());

        p.rebuild_tri_mesh(&foils(), &MeshConfig::default()).unwrap();
        assert_eq!(p.tri_range(0).unwrap().panels.end, p.tri_mesh().panel_count());
    }

    #[test]
    fn station_area_is_the_planform_area() {
        let mut p = plane();
        p.rebuild_quad_mesh(&foils(), &MeshConfig::thin()).unwrap();
        for pw in p.wings() {
            let w = &pw.wing;
            assert_relative_eq!(w.stations().total_area(), w.planform_area(), max_relative = 1.0e-9);
        }
        assert_relative_eq!(
            p.planform_area(),
            p.wings().iter().map(|w| w.wing.planform_area()).sum::<f64>()
        );
    }

    #[test]
    fn failed_rebuild_keeps_the_previous_mesh() {
        let mut p = plane();
        let config = MeshConfig::default();
        p.rebuild_tri_mesh(&foils(), &config).unwrap();
        let mesh = p.tri_mesh().clone();
        let surfaces = p.wing(0).unwrap().wing.surfaces().len();

        // a section naming a foil which is not in the database
        p.wings[0].wing.sections[1].right_foil = "NACA 4412".to_string();
        let e = p.rebuild_tri_mesh(&foils(), &config).unwrap_err();
        assert_eq!(
            e.downcast_ref::<MeshError>(),
            Some(&MeshError::MissingFoil("NACA 4412".to_string()))
        );
        assert_eq!(p.tri_mesh(), &mesh);
        assert_eq!(p.wing(0).unwrap().wing.surfaces().len(), surfaces);
        assert!(p.tri_range(1).is_ok());
    }

    #[test]
    fn analysis_through_the_plane() {
        let mut p = plane();
        p.rebuild_quad_mesh(&foils(), &MeshConfig::thin()).unwrap();
        let mut polar = PolarSettings::new(AnalysisMethod::Quad);
        polar.thin_surfaces = true;
        let op = OperatingPoint::new(0.0, 0.0, 15.0);
        let solution = PanelSolution::from_cp(vec![-1.0; p.quad_mesh().panel_count()]);

        let n = p.wing(0).unwrap().wing.stations().len();
        let pcd = vec![0.01; n];
        let loads = p.analyse_quad(0, &polar, &op, &solution, Some(&pcd)).unwrap();
        assert_eq!(loads.spans.len(), n);
        assert_eq!(loads.panel_cp.len(), p.quad_range(0).unwrap().panel_count());
        assert_relative_eq!(loads.forces.cl(), 1.0, max_relative = 1.0e-6);
        assert_relative_eq!(loads.forces.cdv(), 0.01, max_relative = 1.0e-6);

        // the root carries the largest bending moment
        let root = loads.spans.bending_moment[n / 2 - 1];
        assert!(loads.spans.bending_moment.iter().all(|&m| m <= root + 1.0e-12));

        assert!(p.analyse_quad(0, &polar, &op, &solution, Some(&pcd[1..])).is_err());
        assert!(p.analyse_quad(5, &polar, &op, &solution, None).is_err());
        assert!(p.analyse_tri(0, &polar, &op, &solution, None).is_err());
    }
}
