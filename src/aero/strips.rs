//! Integration of panel forces over the spanwise strips of a wing.
//!
//! Panel forces are computed per unit of dynamic pressure from the solver output, summed over
//! each strip and reduced to the strip coefficients stored in `SpanDistribs`.  Stations are
//! independent of each other and are integrated in parallel, then written back in station order.

use super::{AnalysisMethod, OperatingPoint, PanelSolution, PolarSettings, SpanDistribs};
use crate::Result;
use crate::common::WindAxes;
use crate::errors::MeshError;
use crate::geom3::{Point3, Vector3};
use crate::mesh::{MeshRange, Panel3, Panel4, QuadMesh, SurfacePosition, TriMesh};
use crate::wing::Surface;
use rayon::prelude::*;
use std::ops::Range;

/// The force acting on a triangle per unit of dynamic pressure, and the point where it acts.
/// With the linear method each vertex carries a third of the panel area along its node normal,
/// otherwise the vertex pressures are averaged over the panel.
pub(crate) fn tri_panel_force(mesh: &TriMesh, p: &Panel3, method: AnalysisMethod, cp: &[f64]) -> (Point3, Vector3) {
    let i = 3 * p.index;
    let force = if method == AnalysisMethod::TriLinear {
        p.nodes
            .iter()
            .enumerate()
            .fold(Vector3::zeros(), |acc, (iv, &n)| {
                acc + mesh.nodes[n].normal * (-cp[i + iv]) * p.area / 3.0
            })
    } else {
        let average = (cp[i] + cp[i + 1] + cp[i + 2]) / 3.0;
        p.normal * (-average) * p.area
    };
    (p.centroid, force)
}

/// The force acting on a quad per unit of dynamic pressure, and the point where it acts.  Mid
/// panels of a vortex lattice take their force from the circulation of the bound vortex.
pub(crate) fn quad_panel_force(
    p: &Panel4,
    polar: &PolarSettings,
    op: &OperatingPoint,
    wind: &WindAxes,
    solution: &PanelSolution,
) -> (Point3, Vector3) {
    if !(polar.method.is_vlm() && p.position.is_mid()) {
        return (p.collocation, p.normal * (-solution.cp()[p.index]) * p.area);
    }

    let gamma = solution.gamma();
    let lift = wind.direction.cross(&p.vortex());
    let mut force = lift * (2.0 * gamma[p.index] / op.q_inf);
    if polar.method == AnalysisMethod::Vlm2 && !p.leading {
        let upstream = gamma.get(p.index + 1).copied().unwrap_or(0.0);
        force -= lift * (2.0 * upstream / op.q_inf);
    }
    (p.vortex_position(), force)
}

/// Checks that a quad solution covers every value the panels of `range` will read.
pub(crate) fn check_quad_solution(
    mesh: &QuadMesh,
    range: &MeshRange,
    polar: &PolarSettings,
    solution: &PanelSolution,
) -> Result<()> {
    check_panels(range, mesh.panel_count())?;
    check_surface_kind(polar, mesh.panels[range.panels.clone()].iter().map(|p| p.position))?;
    let vlm = polar.method.is_vlm();
    solution.check_quad(mesh.panel_count(), vlm)?;
    if vlm && mesh.panels[range.panels.clone()].iter().any(|p| !p.position.is_mid()) {
        solution.check_quad(mesh.panel_count(), false)?;
    }
    Ok(())
}

/// Checks that the wing panels are of the kind the polar integrates: mid panels for thin
/// surfaces, top and bottom panels otherwise.
pub(crate) fn check_surface_kind<I>(polar: &PolarSettings, positions: I) -> Result<()>
where
    I: IntoIterator<Item = SurfacePosition>,
{
    let thin = polar.thin_surfaces;
    let mismatch = positions
        .into_iter()
        .any(|p| if thin { p.is_top() || p.is_bottom() } else { p.is_mid() });
    if mismatch {
        Err(Box::new(MeshError::SurfaceKindMismatch { thin_polar: thin }))
    } else {
        Ok(())
    }
}

pub(crate) fn check_panels(range: &MeshRange, len: usize) -> Result<()> {
    if range.surfaces.is_empty() {
        return Err(Box::new(MeshError::NotMeshed));
    }
    if range.panels.end > len {
        return Err(Box::new(MeshError::PanelIndexOutOfBounds {
            index: range.panels.end - 1,
            len,
        }));
    }
    Ok(())
}

/// The integrated loads of one strip
struct StripLoad {
    force: Vector3,
    cl: f64,
    icd: f64,
    cm_c4: f64,
    cm_pressure: f64,
    xcp_abs: f64,
    xcp_rel: f64,
    re: f64,

    /// Hinge moment of the flap panels of the strip, in N·m
    hinge: f64,
}

/// The strip geometry of one station
struct StationGeometry<'a> {
    surface: &'a Surface,
    k: usize,
    c4: Point3,
    chord: f64,
    area: f64,
}

fn strip_load<F>(
    station: &StationGeometry,
    panels: Range<usize>,
    polar: &PolarSettings,
    op: &OperatingPoint,
    wind: &WindAxes,
    panel_force: &F,
) -> StripLoad
where
    F: Fn(usize) -> (Point3, Vector3, bool),
{
    let surface = station.surface;
    let q = polar.dynamic_pressure(op.q_inf);

    let mut force = Vector3::zeros();
    let mut moment_c4 = 0.0;
    let mut moment_cog = Vector3::zeros();
    let mut cp_x = 0.0;
    let mut hinge = 0.0;
    for i in panels {
        let (pt, f, flap) = panel_force(i);
        force += f;
        moment_c4 += (pt - station.c4).cross(&f).dot(&wind.side);
        moment_cog += (pt - polar.cog).cross(&f);
        cp_x += pt.x * f.dot(&surface.normal);
        if surface.te_flap && flap {
            hinge += (pt - surface.hinge_point).cross(&f).dot(&surface.hinge_vector) * q;
        }
    }

    let normal_force = force.dot(&surface.normal);
    let (xcp_abs, xcp_rel) = if normal_force.abs() < 1.0e-12 {
        log::warn!("no normal force on strip {} of a surface, the centre of pressure is undefined", station.k);
        (f64::NAN, f64::NAN)
    } else {
        let x = cp_x / normal_force;
        (x, (x - surface.leading_point(station.k).x) / station.chord)
    };

    let ca = station.chord * station.area;
    StripLoad {
        force,
        cl: force.dot(&wind.normal) / station.area,
        icd: force.dot(&wind.direction) / station.area,
        cm_c4: moment_c4 / ca,
        cm_pressure: moment_cog.dot(&wind.side) / ca,
        xcp_abs,
        xcp_rel,
        re: station.chord * op.q_inf / polar.viscosity,
        hinge,
    }
}

/// Integrates every strip of a wing and writes the results into `spans`.  Returns the hinge
/// moments of the flapped surfaces, in surface order.
fn integrate<F>(
    range: &MeshRange,
    surfaces: &[Surface],
    polar: &PolarSettings,
    op: &OperatingPoint,
    spans: &mut SpanDistribs,
    panel_force: F,
) -> Result<Vec<f64>>
where
    F: Fn(usize) -> (Point3, Vector3, bool) + Sync,
{
    let expected = range.strip_count();
    if spans.len() != expected || !spans.is_consistent() {
        return Err(Box::new(MeshError::StationMismatch {
            expected,
            found: spans.len(),
        }));
    }

    let jobs: Vec<(usize, usize, Range<usize>)> = range
        .surfaces
        .iter()
        .flat_map(|sp| sp.strips.iter().enumerate().map(move |(k, r)| (sp.surface, k, r.clone())))
        .collect();
    if let Some(&(is, _, _)) = jobs.iter().find(|j| j.0 >= surfaces.len()) {
        return Err(Box::new(MeshError::SurfaceIndexOutOfBounds(is)));
    }

    let wind = op.wind();
    let (c4, chord, area) = (&spans.c4, &spans.chord, &spans.strip_area);
    let loads: Vec<StripLoad> = jobs
        .par_iter()
        .enumerate()
        .map(|(m, (is, k, panels))| {
            let station = StationGeometry {
                surface: &surfaces[*is],
                k: *k,
                c4: c4[m],
                chord: chord[m],
                area: area[m],
            };
            strip_load(&station, panels.clone(), polar, op, &wind, &panel_force)
        })
        .collect();

    let mut flap_index = Vec::with_capacity(surfaces.len());
    let mut count = 0;
    for s in surfaces {
        flap_index.push(s.te_flap.then(|| {
            count += 1;
            count - 1
        }));
    }
    let mut flap_moments = vec![0.0; count];

    for (m, (load, (is, _, _))) in loads.into_iter().zip(&jobs).enumerate() {
        spans.f[m] = load.force;
        spans.cl[m] = load.cl;
        spans.icd[m] = load.icd;
        spans.cm_c4[m] = load.cm_c4;
        spans.cm_pressure[m] = load.cm_pressure;
        spans.xcp_abs[m] = load.xcp_abs;
        spans.xcp_rel[m] = load.xcp_rel;
        spans.re[m] = load.re;
        if let Some(f) = flap_index[*is] {
            flap_moments[f] += load.hinge;
        }
    }
    Ok(flap_moments)
}

/// Integrates the triangle loads of a wing strip by strip.  Tip patches are not part of any
/// strip and are ignored.
///
/// # Arguments
///
/// * `mesh`: the triangle arena the solution was computed on
/// * `range`: the panels of the wing
/// * `surfaces`: the surfaces the wing was meshed from
/// * `polar`: the polar settings, of which the method decides between uniform and linear
///   pressure
/// * `op`: the operating point
/// * `solution`: the solver output, three pressure coefficients per panel
/// * `spans`: the distributions to fill, built from the stations of the wing
///
/// returns: Result<Vec<f64, Global>, Box<dyn Error, Global>>, the hinge moment of each flapped
/// surface in N·m
pub fn tri_strip_loads(
    mesh: &TriMesh,
    range: &MeshRange,
    surfaces: &[Surface],
    polar: &PolarSettings,
    op: &OperatingPoint,
    solution: &PanelSolution,
    spans: &mut SpanDistribs,
) -> Result<Vec<f64>> {
    check_panels(range, mesh.panel_count())?;
    check_surface_kind(polar, mesh.panels[range.panels.clone()].iter().map(|p| p.position))?;
    solution.check_tri(mesh.panel_count())?;

    let cp = solution.cp();
    integrate(range, surfaces, polar, op, spans, |i| {
        let p = &mesh.panels[i];
        let (pt, f) = tri_panel_force(mesh, p, polar.method, cp);
        (pt, f, p.flap)
    })
}

/// Integrates the quad or vortex lattice loads of a wing strip by strip.  Tip patches are
/// ignored.
pub fn quad_strip_loads(
    mesh: &QuadMesh,
    range: &MeshRange,
    surfaces: &[Surface],
    polar: &PolarSettings,
    op: &OperatingPoint,
    solution: &PanelSolution,
    spans: &mut SpanDistribs,
) -> Result<Vec<f64>> {
    check_quad_solution(mesh, range, polar, solution)?;

    let wind = op.wind();
    integrate(range, surfaces, polar, op, spans, |i| {
        let p = &mesh.panels[i];
        let (pt, f) = quad_panel_force(p, polar, op, &wind, solution);
        (pt, f, p.flap)
    })
}
