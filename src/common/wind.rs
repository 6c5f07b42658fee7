//! The wind reference frame for an operating point defined by an angle of attack and a sideslip
//! angle, both in degrees.

use crate::Vector3;
use serde::{Deserialize, Serialize};

/// The three unit axes of the wind frame, expressed in body axes.  The direction axis points aft
/// along the freestream, the normal axis is perpendicular to it in the symmetry plane and points
/// up, and the side axis completes the frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindAxes {
    pub direction: Vector3,
    pub side: Vector3,
    pub normal: Vector3,
}

impl WindAxes {
    /// Builds the wind frame for the given angle of attack and sideslip angle.
    ///
    /// # Arguments
    ///
    /// * `alpha`: the angle of attack in degrees
    /// * `beta`: the sideslip angle in degrees
    ///
    /// returns: WindAxes
    pub fn new(alpha: f64, beta: f64) -> Self {
        let (sa, ca) = alpha.to_radians().sin_cos();
        let (sb, cb) = (-beta).to_radians().sin_cos();

        Self {
            direction: Vector3::new(ca * cb, sb, sa * cb),
            side: Vector3::new(-ca * sb, cb, -sa * sb),
            normal: Vector3::new(-sa, 0.0, ca),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test]
    fn zero_incidence() {
        let w = WindAxes::new(0.0, 0.0);
        assert_relative_eq!(w.direction, Vector3::x(), epsilon = 1.0e-12);
        assert_relative_eq!(w.side, Vector3::y(), epsilon = 1.0e-12);
        assert_relative_eq!(w.normal, Vector3::z(), epsilon = 1.0e-12);
    }

    #[test_case(5.0, 0.0)]
    #[test_case(-3.0, 4.0)]
    #[test_case(12.0, -7.5)]
    fn direction_and_side_are_orthonormal(alpha: f64, beta: f64) {
        let w = WindAxes::new(alpha, beta);
        assert_relative_eq!(w.direction.norm(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(w.side.norm(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(w.direction.dot(&w.side), 0.0, epsilon = 1.0e-12);
    }

    #[test]
    fn positive_alpha_tilts_direction_up() {
        let w = WindAxes::new(10.0, 0.0);
        assert!(w.direction.z > 0.0);
        assert!(w.normal.x < 0.0);
    }
}
