//! Whole wing resultants of the inviscid panel forces.

use super::strips::{check_panels, check_quad_solution, check_surface_kind, quad_panel_force, tri_panel_force};
use super::{AeroForces, OperatingPoint, PanelSolution, PolarSettings};
use crate::Result;
use crate::geom3::{Point3, Vector3};
use crate::mesh::{MeshRange, QuadMesh, TriMesh};

/// Running sums of the panel forces
struct Resultant {
    fsum: Vector3,
    mi: Vector3,
    m0: Vector3,
}

impl Resultant {
    fn new() -> Self {
        Self {
            fsum: Vector3::zeros(),
            mi: Vector3::zeros(),
            m0: Vector3::zeros(),
        }
    }

    fn add(&mut self, pt: &Point3, f: &Vector3, cog: &Point3, wind_normal: &Vector3) {
        self.fsum += f;
        self.mi += (pt - cog).cross(f);
        self.m0 += pt.coords * f.dot(wind_normal);
    }

    fn store(self, forces: &mut AeroForces) {
        forces.fsum = self.fsum;
        forces.mi = self.mi;
        forces.m0 = self.m0;
    }
}

/// Sums the forces of every triangle of a wing into `forces`: the resultant, its moment about
/// the centre of gravity and the wind normal weighted position sum used for the centre of
/// pressure.  Tip patch panels are skipped unless the polar includes tip moments.  Forces are per
/// unit of dynamic pressure.
///
/// A polar with thin surfaces integrates the mid panels of a thin mesh, any other polar the top
/// and bottom panels of a thick mesh.  A mesh of the other kind is an error.
pub fn tri_inviscid_forces(
    mesh: &TriMesh,
    range: &MeshRange,
    polar: &PolarSettings,
    op: &OperatingPoint,
    solution: &PanelSolution,
    forces: &mut AeroForces,
) -> Result<()> {
    check_panels(range, mesh.panel_count())?;
    check_surface_kind(polar, mesh.panels[range.panels.clone()].iter().map(|p| p.position))?;
    solution.check_tri(mesh.panel_count())?;

    let wind = op.wind();
    let mut sum = Resultant::new();
    for p in &mesh.panels[range.panels.clone()] {
        if p.position.is_side() && !polar.include_tip_moments {
            continue;
        }
        let (pt, f) = tri_panel_force(mesh, p, polar.method, solution.cp());
        sum.add(&pt, &f, &polar.cog, &wind.normal);
    }
    sum.store(forces);
    Ok(())
}

/// Sums the forces of every quad of a wing into `forces`, as `tri_inviscid_forces` does.
///
/// Returns the pressure coefficients of the wing panels in range order.  For a vortex lattice
/// they are derived from the panel forces, otherwise they are the solver values.  The solution
/// itself is never modified.
pub fn quad_inviscid_forces(
    mesh: &QuadMesh,
    range: &MeshRange,
    polar: &PolarSettings,
    op: &OperatingPoint,
    solution: &PanelSolution,
    forces: &mut AeroForces,
) -> Result<Vec<f64>> {
    check_quad_solution(mesh, range, polar, solution)?;

    let wind = op.wind();
    let mut sum = Resultant::new();
    let mut cp = Vec::with_capacity(range.panel_count());
    for p in &mesh.panels[range.panels.clone()] {
        let (pt, f) = quad_panel_force(p, polar, op, &wind, solution);
        if polar.method.is_vlm() && p.position.is_mid() {
            cp.push(if p.area > 0.0 { -f.dot(&p.normal) / p.area } else { 0.0 });
        } else {
            cp.push(solution.cp()[p.index]);
        }

        if p.position.is_side() && !polar.include_tip_moments {
            continue;
        }
        sum.add(&pt, &f, &polar.cog, &wind.normal);
    }
    sum.store(forces);
    Ok(cp)
}
