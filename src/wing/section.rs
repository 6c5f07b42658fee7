use crate::common::Distribution;
use serde::{Deserialize, Serialize};

/// One spanwise defining station of a wing.  Sections are stored root first, and the dihedral and
/// panel counts of a section apply to the panel between it and the next section outboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WingSection {
    /// Span position of the section, measured from the symmetry plane
    pub y: f64,

    pub chord: f64,

    /// Leading edge position along x
    pub offset: f64,

    /// Twist angle in degrees, positive nose up
    pub twist: f64,

    /// Dihedral of the panel outboard of this section, in degrees
    pub dihedral: f64,

    /// Number of chordwise panels
    pub nx: usize,

    /// Number of spanwise panels of the panel outboard of this section
    pub ny: usize,

    pub x_dist: Distribution,
    pub y_dist: Distribution,

    pub left_foil: String,
    pub right_foil: String,
}

impl Default for WingSection {
    fn default() -> Self {
        Self {
            y: 0.0,
            chord: 0.1,
            offset: 0.0,
            twist: 0.0,
            dihedral: 0.0,
            nx: 5,
            ny: 5,
            x_dist: Distribution::Uniform,
            y_dist: Distribution::Uniform,
            left_foil: String::new(),
            right_foil: String::new(),
        }
    }
}

impl WingSection {
    pub fn new(y: f64, chord: f64, offset: f64) -> Self {
        Self {
            y,
            chord,
            offset,
            ..Self::default()
        }
    }

    pub fn with_twist(mut self, twist: f64) -> Self {
        self.twist = twist;
        self
    }

    pub fn with_dihedral(mut self, dihedral: f64) -> Self {
        self.dihedral = dihedral;
        self
    }

    pub fn with_panels(mut self, nx: usize, ny: usize) -> Self {
        self.nx = nx;
        self.ny = ny;
        self
    }

    pub fn with_distributions(mut self, x_dist: Distribution, y_dist: Distribution) -> Self {
        self.x_dist = x_dist;
        self.y_dist = y_dist;
        self
    }

    /// Uses the same foil on both sides of the wing.
    pub fn with_foil(mut self, name: &str) -> Self {
        self.left_foil = name.to_string();
        self.right_foil = name.to_string();
        self
    }

    pub fn with_foils(mut self, left: &str, right: &str) -> Self {
        self.left_foil = left.to_string();
        self.right_foil = right.to_string();
        self
    }

    /// The x position of the quarter chord point.
    pub fn c4(&self) -> f64 {
        self.offset + self.chord / 4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let s = WingSection::new(0.5, 0.2, 0.05)
            .with_twist(-2.0)
            .with_dihedral(5.0)
            .with_panels(8, 3)
            .with_foil("NACA 0012");
        assert_eq!(s.nx, 8);
        assert_eq!(s.ny, 3);
        assert_eq!(s.left_foil, "NACA 0012");
        assert_eq!(s.right_foil, "NACA 0012");
        assert_eq!(s.c4(), 0.05 + 0.05);
    }
}
