use super::{AeroForces, OperatingPoint, PolarSettings, SpanDistribs};
use crate::Result;
use crate::errors::MeshError;
use crate::geom3::Vector3;

/// Adds the viscous drag of the strips to `forces`.  The profile drag coefficients must already
/// be stored in `spans.pcd`; each strip then carries a drag of `pcd · area` along the wind
/// direction, acting at its quarter chord point.  The pitching moment of each strip drag about
/// the centre of gravity is stored in `spans.cm_viscous`.  Forces are per unit of dynamic
/// pressure.
///
/// # Arguments
///
/// * `spans`: the distributions of the wing, with the profile drag filled in
/// * `polar`: the polar settings, for the centre of gravity
/// * `op`: the operating point, which sets the wind direction
/// * `forces`: receives the profile drag and the viscous moment
///
/// returns: Result<(), Box<dyn Error, Global>>
pub fn viscous_forces(
    spans: &mut SpanDistribs,
    polar: &PolarSettings,
    op: &OperatingPoint,
    forces: &mut AeroForces,
) -> Result<()> {
    if !spans.is_consistent() {
        return Err(Box::new(MeshError::StationMismatch {
            expected: spans.len(),
            found: spans.pcd.len().min(spans.c4.len()),
        }));
    }

    let wind = op.wind();
    let mut fv = Vector3::zeros();
    let mut mv = Vector3::zeros();
    for m in 0..spans.len() {
        let (area, chord) = (spans.strip_area[m], spans.chord[m]);
        let drag = wind.direction * (spans.pcd[m] * area);
        let moment = (spans.c4[m] - polar.cog).cross(&drag);
        spans.cm_viscous[m] = if area * chord > 0.0 { moment.dot(&wind.side) / chord / area } else { 0.0 };
        fv += drag;
        mv += moment;
    }

    forces.profile_drag = fv.dot(&wind.direction);
    forces.mv = mv;
    Ok(())
}
