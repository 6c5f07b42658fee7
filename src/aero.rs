//! Integration of panel solver results into the loads of a wing: spanwise strip coefficients,
//! bending moments, hinge moments and the whole wing forces and moments.
//!
//! Every force produced here is per unit of dynamic pressure, except the hinge moments which are
//! dimensional.  `AeroForces::scale_forces` turns the wing resultants into dimensional values.

mod bending;
mod inviscid;
mod polar;
mod results;
mod solution;
mod strips;
mod viscous;

use crate::Result;
use crate::errors::MeshError;
use crate::mesh::{MeshRange, QuadMesh, TriMesh};
use crate::wing::Wing;
use serde::{Deserialize, Serialize};

pub use bending::compute_bending;
pub use inviscid::{quad_inviscid_forces, tri_inviscid_forces};
pub use polar::{AnalysisMethod, OperatingPoint, PolarSettings};
pub use results::{AeroForces, SpanDistribs};
pub use solution::PanelSolution;
pub use strips::{quad_strip_loads, tri_strip_loads};
pub use viscous::viscous_forces;

/// The complete loads of one wing at one operating point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingLoads {
    pub spans: SpanDistribs,
    pub forces: AeroForces,

    /// The hinge moment of each surface with a trailing edge flap, in N·m
    pub flap_moments: Vec<f64>,

    /// The pressure coefficient of each panel of the wing, in range order.  Only filled by the
    /// quad analysis.
    pub panel_cp: Vec<f64>,
}

impl WingLoads {
    fn start(wing: &Wing, op: &OperatingPoint, pcd: Option<&[f64]>) -> Result<(SpanDistribs, AeroForces)> {
        let mut spans = SpanDistribs::from_stations(wing.stations());
        if let Some(pcd) = pcd {
            if pcd.len() != spans.len() {
                return Err(Box::new(MeshError::StationMismatch {
                    expected: spans.len(),
                    found: pcd.len(),
                }));
            }
            spans.pcd = pcd.to_vec();
        }
        let forces = AeroForces::new(op.alpha, op.beta, op.q_inf).with_reference(
            wing.planform_area(),
            wing.mac(),
            wing.planform_span(),
        );
        Ok((spans, forces))
    }
}

/// Runs every integration step on the triangle solution of a wing.
///
/// # Arguments
///
/// * `wing`: the wing, rebuilt with the surfaces the mesh was made from
/// * `mesh`: the triangle arena the solution was computed on
/// * `range`: the part of the arena which belongs to the wing
/// * `polar`: the polar settings
/// * `op`: the operating point
/// * `solution`: the solver output
/// * `pcd`: optional profile drag coefficients, one per station
///
/// returns: Result<WingLoads, Box<dyn Error, Global>>
pub fn analyse_tri_wing(
    wing: &Wing,
    mesh: &TriMesh,
    range: &MeshRange,
    polar: &PolarSettings,
    op: &OperatingPoint,
    solution: &PanelSolution,
    pcd: Option<&[f64]>,
) -> Result<WingLoads> {
    let (mut spans, mut forces) = WingLoads::start(wing, op, pcd)?;
    let flap_moments = tri_strip_loads(mesh, range, wing.surfaces(), polar, op, solution, &mut spans)?;
    compute_bending(&mut spans)?;
    tri_inviscid_forces(mesh, range, polar, op, solution, &mut forces)?;
    viscous_forces(&mut spans, polar, op, &mut forces)?;

    log::debug!(
        "wing {}: CL={:.4} CDi={:.5} CDv={:.5} at alpha={}",
        wing.name,
        forces.cl(),
        forces.cdi(),
        forces.cdv(),
        op.alpha
    );
    Ok(WingLoads {
        spans,
        forces,
        flap_moments,
        panel_cp: Vec::new(),
    })
}

/// Runs every integration step on the quad or vortex lattice solution of a wing, as
/// `analyse_tri_wing` does.
pub fn analyse_quad_wing(
    wing: &Wing,
    mesh: &QuadMesh,
    range: &MeshRange,
    polar: &PolarSettings,
    op: &OperatingPoint,
    solution: &PanelSolution,
    pcd: Option<&[f64]>,
) -> Result<WingLoads> {
    let (mut spans, mut forces) = WingLoads::start(wing, op, pcd)?;
    let flap_moments = quad_strip_loads(mesh, range, wing.surfaces(), polar, op, solution, &mut spans)?;
    compute_bending(&mut spans)?;
    let panel_cp = quad_inviscid_forces(mesh, range, polar, op, solution, &mut forces)?;
    viscous_forces(&mut spans, polar, op, &mut forces)?;

    log::debug!(
        "wing {}: CL={:.4} CDi={:.5} CDv={:.5} at alpha={}",
        wing.name,
        forces.cl(),
        forces.cdi(),
        forces.cdv(),
        op.alpha
    );
    Ok(WingLoads {
        spans,
        forces,
        flap_moments,
        panel_cp,
    })
}
