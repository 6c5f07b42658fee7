//! Two dimensional foil sections as seen by the wing builder.  The wing only needs a handful of
//! things from a foil: the relative height of its mid, upper and lower lines at a chordwise
//! position, the associated normals, the cross-section area and the flap hinge definitions.
//! Foils are looked up by name through the `FoilSource` trait.

use crate::geom2::{Point2, UnitVec2, Vector2, polygon_area};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const CONTOUR_POINTS: usize = 100;
const MIN_X: f64 = 1.0e-6;

/// A foil section defined by the NACA four digit equations, optionally carrying leading and
/// trailing edge flap hinges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Foil {
    pub name: String,

    /// Maximum camber as a fraction of the chord
    pub camber: f64,

    /// Chordwise position of the maximum camber as a fraction of the chord
    pub camber_pos: f64,

    /// Maximum thickness as a fraction of the chord
    pub thickness: f64,

    /// Chordwise position of the trailing edge flap hinge, if the foil has one
    pub te_hinge: Option<f64>,

    /// Chordwise position of the leading edge flap hinge, if the foil has one
    pub le_hinge: Option<f64>,
}

impl Foil {
    pub fn new(name: &str, camber: f64, camber_pos: f64, thickness: f64) -> Self {
        Self {
            name: name.to_string(),
            camber,
            camber_pos,
            thickness,
            te_hinge: None,
            le_hinge: None,
        }
    }

    /// Creates a foil from a four digit NACA designation such as `"2412"`.  Returns `None` if the
    /// designation is not made of exactly four digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use wingpanel::foil::Foil;
    /// let f = Foil::naca4("2412").unwrap();
    /// assert_eq!(f.name, "NACA 2412");
    /// assert!((f.thickness - 0.12).abs() < 1.0e-12);
    /// ```
    pub fn naca4(digits: &str) -> Option<Self> {
        let d: Vec<u32> = digits.chars().map(|c| c.to_digit(10)).collect::<Option<_>>()?;
        if d.len() != 4 {
            return None;
        }
        let m = d[0] as f64 / 100.0;
        let p = d[1] as f64 / 10.0;
        let t = (d[2] * 10 + d[3]) as f64 / 100.0;
        Some(Self::new(&format!("NACA {}", digits), m, p, t))
    }

    /// Returns a copy of the foil with a trailing edge flap hinged at `x_hinge`.
    pub fn with_te_flap(mut self, x_hinge: f64) -> Self {
        self.te_hinge = Some(x_hinge);
        self
    }

    /// Returns a copy of the foil with a leading edge flap hinged at `x_hinge`.
    pub fn with_le_flap(mut self, x_hinge: f64) -> Self {
        self.le_hinge = Some(x_hinge);
        self
    }

    pub fn has_te_flap(&self) -> bool {
        self.te_hinge.is_some()
    }

    pub fn has_le_flap(&self) -> bool {
        self.le_hinge.is_some()
    }

    /// The trailing edge hinge position, or 1.0 when there is no trailing edge flap.
    pub fn te_x_hinge(&self) -> f64 {
        self.te_hinge.unwrap_or(1.0)
    }

    /// The leading edge hinge position, or 0.0 when there is no leading edge flap.
    pub fn le_x_hinge(&self) -> f64 {
        self.le_hinge.unwrap_or(0.0)
    }

    fn camber_line(&self, x: f64) -> (f64, f64) {
        let (m, p) = (self.camber, self.camber_pos);
        if m == 0.0 || p <= 0.0 || p >= 1.0 {
            (0.0, 0.0)
        } else if x <= p {
            let y = m / (p * p) * (2.0 * p * x - x * x);
            let dy = 2.0 * m / (p * p) * (p - x);
            (y, dy)
        } else {
            let q = 1.0 - p;
            let y = m / (q * q) * (1.0 - 2.0 * p + 2.0 * p * x - x * x);
            let dy = 2.0 * m / (q * q) * (p - x);
            (y, dy)
        }
    }

    fn half_thickness(&self, x: f64) -> f64 {
        let xs = x.max(MIN_X);
        5.0 * self.thickness
            * (0.2969 * xs.sqrt() - 0.1260 * xs - 0.3516 * xs.powi(2) + 0.2843 * xs.powi(3)
                - 0.1015 * xs.powi(4))
    }

    /// The point on the camber line at the chordwise position `x_rel`, in chord-relative
    /// coordinates.
    pub fn mid_y_rel(&self, x_rel: f64) -> Point2 {
        let x = x_rel.clamp(0.0, 1.0);
        Point2::new(x, self.camber_line(x).0)
    }

    /// The point on the upper surface at the chordwise position `x_rel`.
    pub fn upper_y_rel(&self, x_rel: f64) -> Point2 {
        let x = x_rel.clamp(0.0, 1.0);
        Point2::new(x, self.camber_line(x).0 + self.half_thickness(x))
    }

    /// The point on the lower surface at the chordwise position `x_rel`.
    pub fn lower_y_rel(&self, x_rel: f64) -> Point2 {
        let x = x_rel.clamp(0.0, 1.0);
        Point2::new(x, self.camber_line(x).0 - self.half_thickness(x))
    }

    /// The cross-section area of the foil for a unit chord.
    pub fn area(&self) -> f64 {
        let mut contour = Vec::with_capacity(2 * CONTOUR_POINTS);
        // lower surface from the leading edge to the trailing edge, then back along the upper
        for i in 0..CONTOUR_POINTS {
            let x = 0.5 * (1.0 - (i as f64 / (CONTOUR_POINTS - 1) as f64 * std::f64::consts::PI).cos());
            contour.push(self.lower_y_rel(x));
        }
        for i in (0..CONTOUR_POINTS).rev() {
            let x = 0.5 * (1.0 - (i as f64 / (CONTOUR_POINTS - 1) as f64 * std::f64::consts::PI).cos());
            contour.push(self.upper_y_rel(x));
        }
        polygon_area(&contour).abs()
    }

    /// The unit vector bisecting the upper and lower surfaces at the trailing edge, pointing aft.
    pub fn te_bisector(&self) -> UnitVec2 {
        let (_, dyc) = self.camber_line(1.0);
        UnitVec2::new_normalize(Vector2::new(1.0, dyc))
    }
}

/// The seam through which the wing builder retrieves foils.  Implementations are free to hold
/// foils however they like, the builder only ever looks them up by name.
pub trait FoilSource {
    fn foil(&self, name: &str) -> Option<&Foil>;
}

/// A simple in-memory foil library keyed by foil name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoilDatabase {
    foils: HashMap<String, Foil>,
}

impl FoilDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a foil, replacing and returning any foil previously stored under the same name.
    pub fn insert(&mut self, foil: Foil) -> Option<Foil> {
        self.foils.insert(foil.name.clone(), foil)
    }

    pub fn remove(&mut self, name: &str) -> Option<Foil> {
        self.foils.remove(name)
    }

    pub fn len(&self) -> usize {
        self.foils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foils.is_empty()
    }
}

impl FromIterator<Foil> for FoilDatabase {
    fn from_iter<T: IntoIterator<Item = Foil>>(iter: T) -> Self {
        let mut db = FoilDatabase::new();
        for f in iter {
            db.insert(f);
        }
        db
    }
}

impl FoilSource for FoilDatabase {
    fn foil(&self, name: &str) -> Option<&Foil> {
        self.foils.get(name)
    }
}
