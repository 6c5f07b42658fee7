//! Three dimensional point and vector types along with the small set of rigid transformations used
//! when positioning wing surfaces and their panels.

use parry3d_f64::na::Rotation3;

pub type Point3 = parry3d_f64::na::Point3<f64>;
pub type Vector3 = parry3d_f64::na::Vector3<f64>;
pub type UnitVec3 = parry3d_f64::na::Unit<Vector3>;

/// Returns `true` if the two points are within `tol` of each other along every axis. This is the
/// coincidence test used for node merging, so it intentionally works on a per-axis box rather
/// than on the euclidean distance.
pub fn is_same(a: &Point3, b: &Point3, tol: f64) -> bool {
    (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol && (a.z - b.z).abs() < tol
}

/// Rotates a vector about an axis passing through the origin.
///
/// # Arguments
///
/// * `v`: the vector to rotate
/// * `axis`: the rotation axis, which does not need to be normalized
/// * `degrees`: the rotation angle in degrees, positive by the right-hand rule
///
/// returns: Vector3
///
/// # Examples
///
/// ```
/// use wingpanel::{rotate_vector, Vector3};
/// use approx::assert_relative_eq;
/// let v = rotate_vector(&Vector3::new(0.0, 1.0, 0.0), &Vector3::x(), 90.0);
/// assert_relative_eq!(v, Vector3::new(0.0, 0.0, 1.0), epsilon = 1.0e-12);
/// ```
pub fn rotate_vector(v: &Vector3, axis: &Vector3, degrees: f64) -> Vector3 {
    if axis.norm() < f64::EPSILON {
        return *v;
    }
    let r = Rotation3::from_axis_angle(&UnitVec3::new_normalize(*axis), degrees.to_radians());
    r * v
}

/// Rotates a point about an axis passing through `origin`.
pub fn rotate_point(p: &Point3, origin: &Point3, axis: &Vector3, degrees: f64) -> Point3 {
    origin + rotate_vector(&(p - origin), axis, degrees)
}

/// Returns a normalized copy of the vector, or the zero vector if its length is too small to
/// normalize.
pub fn normalized_or_zero(v: &Vector3) -> Vector3 {
    let n = v.norm();
    if n > 1.0e-12 { v / n } else { Vector3::zeros() }
}

/// Linear interpolation between two points.
pub fn lerp(a: &Point3, b: &Point3, t: f64) -> Point3 {
    Point3::from(a.coords * (1.0 - t) + b.coords * t)
}
