//! A `Surface` is one planform strip of a wing between two adjacent sections on one side.  It
//! owns the corner points of the strip, the foils bounding it and the chordwise rows of mesh
//! points on its two sides, from which every panel of the strip is interpolated.

use crate::common::{Distribution, point_distribution};
use crate::foil::Foil;
use crate::geom2::Point2;
use crate::geom3::{Point3, Vector3, lerp, normalized_or_zero, rotate_point, rotate_vector};
use crate::mesh::SurfacePosition;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

const SYMMETRY_PRECISION: f64 = 1.0e-5;
const LENGTH_PRECISION: f64 = 1.0e-6;

/// The four corners of a panel interpolated on a surface.  Side A is the side of the lower span
/// fraction and the leading points are the ones closer to the leading edge.
#[derive(Debug, Clone, Copy)]
pub struct PanelCorners {
    pub la: Point3,
    pub lb: Point3,
    pub ta: Point3,
    pub tb: Point3,
}

/// The points of one chordwise station on both sides of a surface
struct SideRow {
    a: [Point3; 3],
    b: [Point3; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    /// Leading and trailing edge corners of side A
    pub la: Point3,
    pub ta: Point3,

    /// Leading and trailing edge corners of side B
    pub lb: Point3,
    pub tb: Point3,

    /// The surface normal, set before twist is applied
    pub normal: Vector3,

    /// The junction normals on sides A and B, averaged with the neighbouring surfaces
    pub normal_a: Vector3,
    pub normal_b: Vector3,

    pub twist_a: f64,
    pub twist_b: f64,

    pub foil_a: Foil,
    pub foil_b: Foil,

    pub nx: usize,
    pub ny: usize,
    pub x_dist: Distribution,
    pub y_dist: Distribution,

    /// The planform span length between the two bounding sections
    pub length: f64,
    pub inner_section: usize,
    pub outer_section: usize,

    pub is_left: bool,
    pub is_center: bool,
    pub is_tip_left: bool,
    pub is_tip_right: bool,
    pub is_closed_left: bool,
    pub is_closed_right: bool,
    pub join_right: bool,
    pub in_sym_plane: bool,

    pub te_flap: bool,
    pub nx_flap: usize,
    pub hinge_a: f64,
    pub hinge_b: f64,
    pub hinge_point: Point3,
    pub hinge_vector: Vector3,

    /// Relative chordwise positions of the mesh points from the trailing edge to the leading edge
    pub x_points_a: Vec<f64>,
    pub x_points_b: Vec<f64>,

    side_a: Vec<Point3>,
    side_b: Vec<Point3>,
    side_a_top: Vec<Point3>,
    side_b_top: Vec<Point3>,
    side_a_bot: Vec<Point3>,
    side_b_bot: Vec<Point3>,

    te_bisector_a: Vector3,
    te_bisector_b: Vector3,
}

impl Surface {
    /// Creates a surface from its two foils and four corner points.  The normal is computed from
    /// the corners and both junction normals are initialized to it.
    pub fn new(foil_a: Foil, foil_b: Foil, la: Point3, ta: Point3, lb: Point3, tb: Point3) -> Self {
        let mut s = Self {
            la,
            ta,
            lb,
            tb,
            normal: Vector3::z(),
            normal_a: Vector3::z(),
            normal_b: Vector3::z(),
            twist_a: 0.0,
            twist_b: 0.0,
            foil_a,
            foil_b,
            nx: 1,
            ny: 1,
            x_dist: Distribution::Uniform,
            y_dist: Distribution::Uniform,
            length: 0.0,
            inner_section: 0,
            outer_section: 1,
            is_left: false,
            is_center: false,
            is_tip_left: false,
            is_tip_right: false,
            is_closed_left: false,
            is_closed_right: false,
            join_right: false,
            in_sym_plane: false,
            te_flap: false,
            nx_flap: 0,
            hinge_a: 1.0,
            hinge_b: 1.0,
            hinge_point: Point3::origin(),
            hinge_vector: Vector3::y(),
            x_points_a: Vec::new(),
            x_points_b: Vec::new(),
            side_a: Vec::new(),
            side_b: Vec::new(),
            side_a_top: Vec::new(),
            side_b_top: Vec::new(),
            side_a_bot: Vec::new(),
            side_b_bot: Vec::new(),
            te_bisector_a: Vector3::x(),
            te_bisector_b: Vector3::x(),
        };
        s.set_normal();
        s.normal_a = s.normal;
        s.normal_b = s.normal;
        s
    }

    /// Sets the surface normal from the diagonals of the corner quadrilateral.
    pub fn set_normal(&mut self) {
        let n = (self.tb - self.la).cross(&(self.lb - self.ta));
        self.normal = normalized_or_zero(&n);
    }

    pub fn is_right(&self) -> bool {
        !self.is_left
    }

    /// The span fractions bounding the strip `k`
    pub fn y_dist(&self, k: usize) -> (f64, f64) {
        let n = self.ny.max(1) as f64;
        (
            self.y_dist.fraction(k as f64 / n),
            self.y_dist.fraction((k + 1) as f64 / n),
        )
    }

    /// The chord length at the relative span position `tau`, interpolated linearly between the
    /// chords of the two sides.
    pub fn chord(&self, tau: f64) -> f64 {
        let ca = (self.ta - self.la).norm();
        let cb = (self.tb - self.lb).norm();
        ca + (cb - ca) * tau.abs()
    }

    pub fn strip_chord(&self, k: usize) -> f64 {
        let (y1, y2) = self.y_dist(k);
        self.chord((y1 + y2) / 2.0)
    }

    /// The width of the strip `k` measured in the yz plane
    pub fn strip_width(&self, k: usize) -> f64 {
        let c = self.panel_corners(k, 0, SurfacePosition::Mid);
        ((c.la.y - c.lb.y).powi(2) + (c.la.z - c.lb.z).powi(2)).sqrt()
    }

    pub fn twist_at(&self, tau: f64) -> f64 {
        self.twist_a + (self.twist_b - self.twist_a) * tau
    }

    pub fn strip_twist(&self, k: usize) -> f64 {
        let (y1, y2) = self.y_dist(k);
        self.twist_at((y1 + y2) / 2.0)
    }

    /// The middle point of the leading edge of strip `k`
    pub fn leading_point(&self, k: usize) -> Point3 {
        let c = self.panel_corners(k, self.nx - 1, SurfacePosition::Mid);
        lerp(&c.la, &c.lb, 0.5)
    }

    /// The quarter chord point of strip `k`
    pub fn c4(&self, k: usize) -> Point3 {
        let le = self.leading_point(k);
        let c = self.panel_corners(k, 0, SurfacePosition::Mid);
        let te = lerp(&c.ta, &c.tb, 0.5);
        lerp(&le, &te, 0.25)
    }

    /// The length of the surface projected in the yz plane
    pub fn span_length(&self) -> f64 {
        ((self.lb.y - self.la.y).powi(2) + (self.lb.z - self.la.z).powi(2)).sqrt()
    }

    fn sides(&self, pos: SurfacePosition) -> (&[Point3], &[Point3]) {
        match pos {
            SurfacePosition::Top => (&self.side_a_top, &self.side_b_top),
            SurfacePosition::Bottom => (&self.side_a_bot, &self.side_b_bot),
            _ => (&self.side_a, &self.side_b),
        }
    }

    /// The mesh point at chordwise index `l` and relative span position `tau` on the top, bottom
    /// or mid surface.  Chordwise indices run from the trailing edge (0) to the leading edge.
    pub fn node_at(&self, l: usize, tau: f64, pos: SurfacePosition) -> Point3 {
        let (a, b) = self.sides(pos);
        lerp(&a[l], &b[l], tau)
    }

    /// The corner points of panel `(k, l)`, with `k` the spanwise strip index and `l` the
    /// chordwise index counted from the trailing edge.
    ///
    /// # Arguments
    ///
    /// * `k`: the strip index, in 0..ny
    /// * `l`: the chordwise index, in 0..nx
    /// * `pos`: which of the top, bottom or mid lines to use
    ///
    /// returns: PanelCorners
    pub fn panel_corners(&self, k: usize, l: usize, pos: SurfacePosition) -> PanelCorners {
        let (y1, y2) = self.y_dist(k);
        PanelCorners {
            la: self.node_at(l + 1, y1, pos),
            ta: self.node_at(l, y1, pos),
            lb: self.node_at(l + 1, y2, pos),
            tb: self.node_at(l, y2, pos),
        }
    }

    fn foil_point(foil: &Foil, x_rel: f64, pos: SurfacePosition) -> Point2 {
        match pos {
            SurfacePosition::Top => foil.upper_y_rel(x_rel),
            SurfacePosition::Bottom => foil.lower_y_rel(x_rel),
            _ => foil.mid_y_rel(x_rel),
        }
    }

    /// Places the foil point at `x_rel` on side A (or B) in the untwisted surface frame.
    fn side_node(&self, x_rel: f64, side_b: bool, pos: SurfacePosition) -> Point3 {
        let (foil, l, t, chord) = if side_b {
            (&self.foil_b, &self.lb, &self.tb, self.chord(1.0))
        } else {
            (&self.foil_a, &self.la, &self.ta, self.chord(0.0))
        };
        let fp = Self::foil_point(foil, x_rel, pos);
        lerp(l, t, fp.x) + self.normal * fp.y * chord
    }

    /// A point on the top, bottom or mid surface at the chordwise positions `xa` and `xb` of the
    /// two sides and the relative span position `y_rel`.
    pub fn surface_point(&self, xa: f64, xb: f64, y_rel: f64, pos: SurfacePosition) -> Point3 {
        let a = self.side_node(xa, false, pos);
        let b = self.side_node(xb, true, pos);
        lerp(&a, &b, y_rel)
    }

    fn junction_angle(&self, junction_normal: &Vector3, l: &Point3, t: &Point3) -> f64 {
        let v = self.normal.cross(junction_normal);
        let u = normalized_or_zero(&(*t - *l));
        (-v.dot(&u)).clamp(-1.0, 1.0).asin()
    }

    fn side_row(&self, l: usize, alpha_a: f64, alpha_b: f64) -> SideRow {
        let positions = [SurfacePosition::Mid, SurfacePosition::Top, SurfacePosition::Bottom];
        let make = |x: f64, side_b: bool, alpha: f64| -> [Point3; 3] {
            let (le, te) = if side_b { (self.lb, self.tb) } else { (self.la, self.ta) };
            let o = lerp(&le, &te, x);
            let cos_d = alpha.cos();
            let axis = le - te;
            positions.map(|pos| {
                let mut p = self.side_node(x, side_b, pos);
                p.y = o.y + (p.y - o.y) / cos_d;
                p.z = o.z + (p.z - o.z) / cos_d;
                rotate_point(&p, &le, &axis, alpha.to_degrees())
            })
        };

        SideRow {
            a: make(self.x_points_a[l], false, alpha_a),
            b: make(self.x_points_b[l], true, alpha_b),
        }
    }

    /// Builds the chordwise rows of mesh points on both sides of the surface.  The foil
    /// thickness is stretched and rotated at each junction so that the points of two adjacent
    /// surfaces coincide, the trailing edge points of the top and bottom lines are merged and
    /// points lying very close to the symmetry plane are moved onto it.
    ///
    /// The x-points must have been created beforehand.
    pub fn make_side_nodes(&mut self) {
        let alpha_a = self.junction_angle(&self.normal_a, &self.la, &self.ta);
        let alpha_b = self.junction_angle(&self.normal_b, &self.lb, &self.tb);

        let rows: Vec<SideRow> = (0..=self.nx)
            .into_par_iter()
            .map(|l| self.side_row(l, alpha_a, alpha_b))
            .collect();

        self.side_a = rows.iter().map(|r| r.a[0]).collect();
        self.side_a_top = rows.iter().map(|r| r.a[1]).collect();
        self.side_a_bot = rows.iter().map(|r| r.a[2]).collect();
        self.side_b = rows.iter().map(|r| r.b[0]).collect();
        self.side_b_top = rows.iter().map(|r| r.b[1]).collect();
        self.side_b_bot = rows.iter().map(|r| r.b[2]).collect();

        // merge the trailing edge points in case the foils have a trailing edge gap
        let te_a = lerp(&self.side_a_bot[0], &self.side_a_top[0], 0.5);
        self.side_a_bot[0] = te_a;
        self.side_a_top[0] = te_a;
        let te_b = lerp(&self.side_b_bot[0], &self.side_b_top[0], 0.5);
        self.side_b_bot[0] = te_b;
        self.side_b_top[0] = te_b;

        for side in [
            &mut self.side_a,
            &mut self.side_a_top,
            &mut self.side_a_bot,
            &mut self.side_b,
            &mut self.side_b_top,
            &mut self.side_b_bot,
        ] {
            for p in side.iter_mut() {
                if p.y.abs() < SYMMETRY_PRECISION {
                    p.y = 0.0;
                }
            }
        }
    }

    /// Creates the relative chordwise positions of the mesh points on both sides.  Flapped sides
    /// split their panels at the hinge.
    ///
    /// # Arguments
    ///
    /// * `n_ref_flaps`: when greater than zero, the number of flap panels to use on both sides
    ///   instead of the count derived from the hinge positions
    pub fn create_x_points(&mut self, n_ref_flaps: usize) {
        let nx = self.nx;
        let xh_a = self.foil_a.te_x_hinge();
        let xh_b = self.foil_b.te_x_hinge();

        let (nf_a, nf_b) = if n_ref_flaps > 0 {
            (n_ref_flaps, n_ref_flaps)
        } else {
            let count = |foil: &Foil, xh: f64| {
                let n = ((1.0 - xh) * nx as f64 * (1.0 + LENGTH_PRECISION)) as usize;
                if foil.has_te_flap() { n + 1 } else { n }
            };
            let a = count(&self.foil_a, xh_a);
            let b = count(&self.foil_b, xh_b);
            if a > 0 && b > 0 { ((a + b) / 2, (a + b) / 2) } else { (a, b) }
        };
        let nf_a = nf_a.min(nx);
        let nf_b = nf_b.min(nx);

        self.nx_flap = nf_a.max(nf_b);
        self.x_points_a = Self::x_points(nx, nf_a, xh_a, self.x_dist);
        self.x_points_b = Self::x_points(nx, nf_b, xh_b, self.x_dist);
    }

    fn x_points(nx: usize, n_flap: usize, x_hinge: f64, dist: Distribution) -> Vec<f64> {
        let n_lead = nx - n_flap;
        let flap = point_distribution(n_flap, dist);
        let lead = point_distribution(n_lead, dist);

        let mut points = Vec::with_capacity(nx + 1);
        points.extend(flap.iter().take(n_flap).map(|f| 1.0 - (1.0 - x_hinge) * f));
        points.extend(lead.iter().take(n_lead).map(|f| x_hinge - x_hinge * f));
        points.push(0.0);
        points
    }

    /// Sets the flap hinge of the surface.  The surface only carries a flap when both of its
    /// foils do.
    pub fn set_flap(&mut self) {
        self.hinge_a = self.foil_a.te_x_hinge().clamp(0.0, 1.0);
        self.hinge_b = self.foil_b.te_x_hinge().clamp(0.0, 1.0);
        self.te_flap = self.foil_a.has_te_flap() && self.foil_b.has_te_flap();

        if self.te_flap {
            self.hinge_point = self.surface_point(self.hinge_a, self.hinge_b, 0.0, SurfacePosition::Mid);
            let hb = self.surface_point(self.hinge_a, self.hinge_b, 1.0, SurfacePosition::Mid);
            self.hinge_vector = normalized_or_zero(&(hb - self.hinge_point));
        }
    }

    /// The top and bottom hinge lines of the trailing and leading edge flaps, from side A to
    /// side B.  A flap only exists when both foils carry its hinge.
    pub fn hinge_lines(&self) -> Vec<[Point3; 2]> {
        let (fa, fb) = (&self.foil_a, &self.foil_b);
        let mut hinges = Vec::with_capacity(2);
        if fa.has_te_flap() && fb.has_te_flap() {
            hinges.push((fa.te_x_hinge(), fb.te_x_hinge()));
        }
        if fa.has_le_flap() && fb.has_le_flap() {
            hinges.push((fa.le_x_hinge(), fb.le_x_hinge()));
        }

        let mut lines = Vec::with_capacity(2 * hinges.len());
        for (xa, xb) in hinges {
            for pos in [SurfacePosition::Top, SurfacePosition::Bottom] {
                lines.push([self.surface_point(xa, xb, 0.0, pos), self.surface_point(xa, xb, 1.0, pos)]);
            }
        }
        lines
    }

    /// Twists sides A and B about the quarter chord point, around an axis perpendicular to the x
    /// axis and to the junction normal.
    pub fn set_twist(&mut self) {
        let a4 = lerp(&self.la, &self.ta, 0.25);
        let axis = Vector3::new(0.0, self.normal_a.z, -self.normal_a.y);
        self.la = rotate_point(&self.la, &a4, &axis, self.twist_a);
        self.ta = rotate_point(&self.ta, &a4, &axis, self.twist_a);
        self.normal_a = rotate_vector(&self.normal_a, &axis, self.twist_a);

        let b4 = lerp(&self.lb, &self.tb, 0.25);
        let axis = Vector3::new(0.0, self.normal_b.z, -self.normal_b.y);
        self.lb = rotate_point(&self.lb, &b4, &axis, self.twist_b);
        self.tb = rotate_point(&self.tb, &b4, &axis, self.twist_b);
        self.normal_b = rotate_vector(&self.normal_b, &axis, self.twist_b);
    }

    /// Computes the trailing edge bisectors on both sides from the foils, the dihedral and the
    /// twist of the surface.
    pub fn init_te_bisectors(&mut self) {
        let dihedral = (-self.normal.y).atan2(self.normal.z).to_degrees();
        let a4 = lerp(&self.la, &self.ta, 0.25);
        let b4 = lerp(&self.lb, &self.tb, 0.25);
        let span_axis = b4 - a4;

        let make = |foil: &Foil, twist: f64| {
            let b = foil.te_bisector();
            let v = rotate_vector(&Vector3::new(b.x, 0.0, b.y), &Vector3::x(), dihedral);
            rotate_vector(&v, &span_axis, twist)
        };
        self.te_bisector_a = make(&self.foil_a, self.twist_a);
        self.te_bisector_b = make(&self.foil_b, self.twist_b);
    }

    /// The trailing edge bisector at a point of the trailing edge, interpolated between the
    /// bisectors of the two sides.
    pub fn te_bisector(&self, pt: &Point3) -> Vector3 {
        let te = self.tb - self.ta;
        let l2 = te.norm_squared();
        let tau = if l2 > 0.0 {
            (te.dot(&(*pt - self.ta)) / l2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        normalized_or_zero(&(self.te_bisector_a * (1.0 - tau) + self.te_bisector_b * tau))
    }

    fn points_mut(&mut self) -> [&mut Point3; 5] {
        [
            &mut self.la,
            &mut self.lb,
            &mut self.ta,
            &mut self.tb,
            &mut self.hinge_point,
        ]
    }

    fn vectors_mut(&mut self) -> [&mut Vector3; 4] {
        [
            &mut self.normal,
            &mut self.normal_a,
            &mut self.normal_b,
            &mut self.hinge_vector,
        ]
    }

    fn rotate(&mut self, origin: &Point3, axis: &Vector3, degrees: f64) {
        for p in self.points_mut() {
            *p = rotate_point(p, origin, axis, degrees);
        }
        for v in self.vectors_mut() {
            *v = rotate_vector(v, axis, degrees);
        }
    }

    /// Rotates the surface about an axis parallel to x through `origin`.
    pub fn rotate_x(&mut self, origin: &Point3, degrees: f64) {
        self.rotate(origin, &Vector3::x(), degrees);
    }

    /// Rotates the surface about an axis parallel to y through `origin`.
    pub fn rotate_y(&mut self, origin: &Point3, degrees: f64) {
        self.rotate(origin, &Vector3::y(), degrees);
    }

    /// Rotates the surface about an axis parallel to z through `origin`.
    pub fn rotate_z(&mut self, origin: &Point3, degrees: f64) {
        self.rotate(origin, &Vector3::z(), degrees);
    }

    pub fn translate(&mut self, t: &Vector3) {
        for p in self.points_mut() {
            *p += *t;
        }
    }
}
