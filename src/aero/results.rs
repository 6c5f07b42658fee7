//! Result containers for the loads of one wing at one operating point.

use crate::common::WindAxes;
use crate::geom3::{Point3, Vector3};
use crate::wing::StationLayout;
use serde::{Deserialize, Serialize};

/// Reference areas and lengths below this value give zero coefficients
const MIN_REFERENCE: f64 = 1.0e-6;

/// The spanwise distributions of a wing, one value per station.  Forces are stored per unit of
/// dynamic pressure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanDistribs {
    pub chord: Vec<f64>,
    pub offset: Vec<f64>,
    pub twist: Vec<f64>,
    pub strip_area: Vec<f64>,
    pub strip_pos: Vec<f64>,
    pub c4: Vec<Point3>,

    /// Lift coefficient on the wind normal
    pub cl: Vec<f64>,

    /// Induced drag coefficient on the wind direction
    pub icd: Vec<f64>,

    /// Profile drag coefficient, from the two dimensional viscous results
    pub pcd: Vec<f64>,
    pub cm_c4: Vec<f64>,
    pub cm_pressure: Vec<f64>,
    pub cm_viscous: Vec<f64>,
    pub re: Vec<f64>,
    pub xcp_abs: Vec<f64>,
    pub xcp_rel: Vec<f64>,
    pub bending_moment: Vec<f64>,
    pub f: Vec<Vector3>,
}

impl SpanDistribs {
    /// Creates distributions with the geometry of the stations and zeroed results.
    pub fn from_stations(stations: &StationLayout) -> Self {
        let mut d = Self::default();
        d.set_geometry(stations);
        d.resize_results(stations.len());
        d
    }

    pub fn len(&self) -> usize {
        self.chord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chord.is_empty()
    }

    pub fn set_geometry(&mut self, stations: &StationLayout) {
        self.chord = stations.chords.clone();
        self.offset = stations.offsets.clone();
        self.twist = stations.twists.clone();
        self.strip_area = stations.areas.clone();
        self.strip_pos = stations.positions.clone();
        self.c4 = stations.c4.clone();
    }

    /// Resizes every result array to `n` stations and sets them to zero.
    pub fn resize_results(&mut self, n: usize) {
        for v in [
            &mut self.cl,
            &mut self.icd,
            &mut self.pcd,
            &mut self.cm_c4,
            &mut self.cm_pressure,
            &mut self.cm_viscous,
            &mut self.re,
            &mut self.xcp_abs,
            &mut self.xcp_rel,
            &mut self.bending_moment,
        ] {
            v.clear();
            v.resize(n, 0.0);
        }
        self.f.clear();
        self.f.resize(n, Vector3::zeros());
    }

    /// The lift acting on strip `m` at the dynamic pressure `q`, or zero outside of the stations
    pub fn strip_lift(&self, m: usize, q: f64) -> f64 {
        match (self.cl.get(m), self.strip_area.get(m)) {
            (Some(cl), Some(area)) => q * cl * area,
            _ => 0.0,
        }
    }

    /// Checks that every array has the length of the chord array.
    pub fn is_consistent(&self) -> bool {
        let n = self.chord.len();
        let lengths = [
            self.offset.len(),
            self.twist.len(),
            self.strip_area.len(),
            self.strip_pos.len(),
            self.c4.len(),
            self.cl.len(),
            self.icd.len(),
            self.pcd.len(),
            self.cm_c4.len(),
            self.cm_pressure.len(),
            self.cm_viscous.len(),
            self.re.len(),
            self.xcp_abs.len(),
            self.xcp_rel.len(),
            self.bending_moment.len(),
            self.f.len(),
        ];
        lengths.iter().all(|&l| l == n)
    }
}

/// The resultant forces and moments of a wing at one operating point.  Until `scale_forces` is
/// called, forces are per unit of dynamic pressure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AeroForces {
    pub alpha: f64,
    pub beta: f64,
    pub q_inf: f64,

    pub ref_area: f64,
    pub ref_chord: f64,
    pub ref_span: f64,

    /// Sum of the inviscid panel forces
    pub fsum: Vector3,

    /// Inviscid moment about the centre of gravity
    pub mi: Vector3,

    /// Sum of the panel force points weighted by the panel force on the wind normal
    pub m0: Vector3,

    /// Viscous moment about the centre of gravity
    pub mv: Vector3,
    pub profile_drag: f64,
}

impl Default for AeroForces {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            q_inf: 0.0,
            ref_area: 1.0,
            ref_chord: 1.0,
            ref_span: 1.0,
            fsum: Vector3::zeros(),
            mi: Vector3::zeros(),
            m0: Vector3::zeros(),
            mv: Vector3::zeros(),
            profile_drag: 0.0,
        }
    }
}

impl AeroForces {
    pub fn new(alpha: f64, beta: f64, q_inf: f64) -> Self {
        Self {
            alpha,
            beta,
            q_inf,
            ..Self::default()
        }
    }

    pub fn with_reference(mut self, area: f64, chord: f64, span: f64) -> Self {
        self.ref_area = area;
        self.ref_chord = chord;
        self.ref_span = span;
        self
    }

    pub fn reset_results(&mut self) {
        self.fsum = Vector3::zeros();
        self.mi = Vector3::zeros();
        self.m0 = Vector3::zeros();
        self.mv = Vector3::zeros();
        self.profile_drag = 0.0;
    }

    /// The coefficient frame, which follows the incidence only
    fn frame(&self) -> WindAxes {
        WindAxes::new(self.alpha, 0.0)
    }

    fn has_area(&self) -> bool {
        self.ref_area >= MIN_REFERENCE
    }

    fn has_dims(&self) -> bool {
        self.has_area() && self.ref_chord >= MIN_REFERENCE
    }

    pub fn cl(&self) -> f64 {
        if self.has_area() { self.fsum.dot(&self.frame().normal) / self.ref_area } else { 0.0 }
    }

    pub fn c_side(&self) -> f64 {
        if self.has_area() { self.fsum.dot(&self.frame().side) / self.ref_area } else { 0.0 }
    }

    pub fn cdi(&self) -> f64 {
        if self.has_area() { self.fsum.dot(&self.frame().direction) / self.ref_area } else { 0.0 }
    }

    pub fn cdv(&self) -> f64 {
        if self.has_area() { self.profile_drag / self.ref_area } else { 0.0 }
    }

    pub fn cd(&self) -> f64 {
        self.cdi() + self.cdv()
    }

    /// Inviscid rolling moment coefficient
    pub fn cli(&self) -> f64 {
        if self.has_dims() {
            self.mi.dot(&self.frame().direction) / self.ref_span / self.ref_area
        } else {
            0.0
        }
    }

    pub fn cmi(&self) -> f64 {
        if self.has_dims() { self.mi.dot(&self.frame().side) / self.ref_chord / self.ref_area } else { 0.0 }
    }

    pub fn cmv(&self) -> f64 {
        if self.has_dims() { self.mv.dot(&self.frame().side) / self.ref_chord / self.ref_area } else { 0.0 }
    }

    pub fn cm(&self) -> f64 {
        self.cmi() + self.cmv()
    }

    pub fn cni(&self) -> f64 {
        if self.has_dims() { self.mi.dot(&self.frame().normal) / self.ref_span / self.ref_area } else { 0.0 }
    }

    pub fn cnv(&self) -> f64 {
        if self.has_dims() { self.mv.dot(&self.frame().normal) / self.ref_span / self.ref_area } else { 0.0 }
    }

    pub fn cn(&self) -> f64 {
        self.cni() + self.cnv()
    }

    /// The centre of pressure, weighting the panel force points by their force on the wind
    /// normal.  Undefined (NaN) when the resultant has no component on the wind normal.
    pub fn centre_of_pressure(&self) -> Point3 {
        let norm = self.fsum.dot(&self.frame().normal);
        if norm.abs() < 1.0e-12 {
            log::warn!("no normal force, the centre of pressure is undefined");
            return Point3::new(f64::NAN, f64::NAN, f64::NAN);
        }
        Point3::from(self.m0 / norm)
    }

    /// Scales the forces and moments from per unit of dynamic pressure to dimensional values.
    /// `m0` is scaled with them so that the centre of pressure is unchanged.
    pub fn scale_forces(&mut self, q: f64) {
        self.fsum *= q;
        self.mi *= q;
        self.m0 *= q;
        self.mv *= q;
        self.profile_drag *= q;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stations(n: usize) -> StationLayout {
        StationLayout {
            positions: (0..n).map(|i| i as f64 * 0.1).collect(),
            chords: vec![0.2; n],
            c4: vec![Point3::origin(); n],
            offsets: vec![0.0; n],
            twists: vec![0.0; n],
            areas: vec![0.02; n],
        }
    }

    #[test]
    fn distributions_follow_the_stations() {
        let mut d = SpanDistribs::from_stations(&stations(5));
        assert_eq!(d.len(), 5);
        assert!(d.is_consistent());
        d.cl[2] = 0.5;
        assert_relative_eq!(d.strip_lift(2, 100.0), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(d.strip_lift(7, 100.0), 0.0);

        d.bending_moment.pop();
        assert!(!d.is_consistent());
    }

    #[test]
    fn coefficients_at_incidence() {
        let mut af = AeroForces::new(90.0, 0.0, 10.0).with_reference(2.0, 0.5, 4.0);
        af.fsum = Vector3::new(-1.0, 0.0, 0.0);
        assert_relative_eq!(af.cl(), 0.5, epsilon = 1.0e-12);
        assert_relative_eq!(af.cdi(), 0.0, epsilon = 1.0e-12);

        af.mi = Vector3::new(0.0, 0.3, 0.0);
        af.mv = Vector3::new(0.0, 0.1, 0.0);
        assert_relative_eq!(af.cm(), 0.4, epsilon = 1.0e-12);
        af.profile_drag = 0.2;
        assert_relative_eq!(af.cdv(), 0.1, epsilon = 1.0e-12);
    }

    #[test]
    fn tiny_reference_area_gives_zero() {
        let mut af = AeroForces::new(3.0, 0.0, 10.0).with_reference(1.0e-9, 1.0, 1.0);
        af.fsum = Vector3::new(1.0, 2.0, 3.0);
        af.mi = Vector3::new(1.0, 2.0, 3.0);
        assert_eq!(af.cl(), 0.0);
        assert_eq!(af.cmi(), 0.0);
        assert_eq!(af.cn(), 0.0);
    }

    #[test]
    fn centre_of_pressure() {
        let mut af = AeroForces::new(0.0, 0.0, 10.0);
        af.fsum = Vector3::new(0.0, 0.0, 2.0);
        af.m0 = Vector3::new(0.1, 0.0, 0.0) * 2.0;
        assert_relative_eq!(af.centre_of_pressure(), Point3::new(0.1, 0.0, 0.0), epsilon = 1.0e-12);

        af.fsum = Vector3::zeros();
        assert!(af.centre_of_pressure().x.is_nan());
    }

    #[test]
    fn scaling_keeps_coefficients() {
        let mut af = AeroForces::new(2.0, 0.0, 10.0).with_reference(0.3, 0.3, 1.0);
        af.fsum = Vector3::new(0.01, 0.0, 0.2);
        let cl = af.cl();
        af.scale_forces(50.0);
        assert_relative_eq!(af.fsum.z, 10.0, epsilon = 1.0e-12);
        assert_relative_eq!(af.cl() / 50.0, cl, epsilon = 1.0e-12);

        af.m0 = Vector3::new(0.04, 0.0, 0.0);
        let cp = af.centre_of_pressure();
        af.scale_forces(2.0);
        assert_relative_eq!(af.centre_of_pressure(), cp, epsilon = 1.0e-12);
    }
}
