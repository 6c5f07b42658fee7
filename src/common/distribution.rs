//! Panel spacing laws used to place mesh nodes along the chord and along the span of a surface.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const SINH_STRETCH: f64 = 5.0;
const TANH_STRETCH: f64 = 1.35;
const EXP_POWER: f64 = 1.5;

/// Enumerates the spacing laws which map a uniform parameter in [0, 1] onto a non-uniform set of
/// positions in [0, 1].  Refinement at the ends of a surface (leading and trailing edges, root and
/// tip) is obtained by choosing the appropriate law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Distribution {
    #[default]
    Uniform,

    /// Refined at both ends
    Cosine,

    /// Refined at the start
    Sine,

    /// Refined at the end
    InvSine,

    /// Refined in the middle
    InvSinh,

    /// Refined at both ends, less aggressively than `Cosine`
    Tanh,

    /// Refined at the start
    Exp,

    /// Refined at the end
    InvExp,
}

impl Distribution {
    /// Maps the uniform parameter `tau` onto the distributed fraction.
    ///
    /// # Arguments
    ///
    /// * `tau`: the uniform parameter, expected in the range [0, 1]
    ///
    /// returns: f64
    ///
    /// # Examples
    ///
    /// ```
    /// use wingpanel::common::Distribution;
    /// use approx::assert_relative_eq;
    /// assert_relative_eq!(Distribution::Cosine.fraction(0.5), 0.5, epsilon = 1.0e-12);
    /// ```
    pub fn fraction(&self, tau: f64) -> f64 {
        match self {
            Distribution::Uniform => tau,
            Distribution::Cosine => 0.5 * (1.0 - (tau * PI).cos()),
            Distribution::Sine => 1.0 - (tau * PI / 2.0).cos(),
            Distribution::InvSine => (tau * PI / 2.0).sin(),
            Distribution::InvSinh => {
                0.5 * (1.0 + (SINH_STRETCH * (2.0 * tau - 1.0)).asinh() / SINH_STRETCH.asinh())
            }
            Distribution::Tanh => {
                0.5 * (1.0 + (TANH_STRETCH * (2.0 * tau - 1.0)).tanh() / TANH_STRETCH.tanh())
            }
            Distribution::Exp => tau.powf(EXP_POWER),
            Distribution::InvExp => 1.0 - (1.0 - tau).powf(EXP_POWER),
        }
    }

    /// Returns the law which produces the same physical spacing when the direction of travel is
    /// reversed, which is how the spanwise spacing of a right-side surface is carried over to its
    /// mirrored left-side twin.
    pub fn mirrored(&self) -> Self {
        match self {
            Distribution::Sine => Distribution::InvSine,
            Distribution::InvSine => Distribution::Sine,
            Distribution::Exp => Distribution::InvExp,
            Distribution::InvExp => Distribution::Exp,
            other => *other,
        }
    }
}

/// Generates the `n + 1` fractions obtained by applying the distribution to the uniform values
/// `i / n` for `i` in `0..=n`. A zero count yields the single fraction `0`.
pub fn point_distribution(n: usize, dist: Distribution) -> Vec<f64> {
    if n == 0 {
        return vec![0.0];
    }
    (0..=n)
        .map(|i| dist.fraction(i as f64 / n as f64))
        .collect()
}
