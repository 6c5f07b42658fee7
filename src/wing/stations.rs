//! The spanwise station layout of a wing, one station per strip of panels.

use super::Surface;
use crate::geom3::Point3;
use serde::{Deserialize, Serialize};

/// The geometry of the spanwise stations of a wing.  All arrays have the same length, and the
/// stations are ordered from the left tip to the right tip (or from the tip to the root for a
/// one-sided wing).  The ordering is relied upon by the bending moment integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationLayout {
    /// Span position of the station, negative on the left side
    pub positions: Vec<f64>,
    pub chords: Vec<f64>,

    /// Quarter chord point of the strip
    pub c4: Vec<Point3>,

    /// x position of the leading edge
    pub offsets: Vec<f64>,

    /// Twist in degrees
    pub twists: Vec<f64>,

    /// Planform area of the strip
    pub areas: Vec<f64>,
}

impl StationLayout {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn total_area(&self) -> f64 {
        self.areas.iter().sum()
    }

    /// Checks that all of the station arrays have the same length.
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        [
            self.chords.len(),
            self.c4.len(),
            self.offsets.len(),
            self.twists.len(),
            self.areas.len(),
        ]
        .iter()
        .all(|&l| l == n)
    }
}

/// Computes the station layout from the surfaces of a wing.  Span positions are measured along
/// the planform, so that dihedral does not change them.
///
/// # Arguments
///
/// * `surfaces`: the surfaces of the wing, ordered from the left tip to the right tip
/// * `two_sided`: whether the surfaces cover both sides of the wing
///
/// returns: StationLayout
pub fn compute_stations(surfaces: &[Surface], two_sided: bool) -> StationLayout {
    let mut layout = StationLayout::default();
    if surfaces.is_empty() {
        return layout;
    }

    // span positions of the left side, from the root to the left tip
    let n_left = if two_sided { surfaces.len() / 2 } else { surfaces.len() };
    let mut left = Vec::new();
    let mut y0 = 0.0;
    for surf in surfaces[..n_left].iter().rev() {
        for k in (0..surf.ny).rev() {
            let (y1, y2) = surf.y_dist(k);
            left.push(y0 - (1.0 - (y1 + y2) / 2.0) * surf.length);
        }
        y0 -= surf.length;
    }

    layout.positions.extend(left.iter().rev());
    if two_sided {
        layout.positions.extend(left.iter().map(|y| -y));
    }

    for surf in surfaces {
        for k in 0..surf.ny {
            let chord = surf.strip_chord(k);
            layout.chords.push(chord);
            layout.c4.push(surf.c4(k));
            layout.offsets.push(surf.leading_point(k).x);
            layout.twists.push(surf.strip_twist(k));
            layout.areas.push(surf.strip_width(k) * chord);
        }
    }

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Distribution;
    use crate::config::MeshConfig;
    use crate::foil::{Foil, FoilDatabase};
    use crate::wing::{Placement, Wing, WingSection, WingType, create_surfaces, planform};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn foils() -> FoilDatabase {
        vec![Foil::naca4("0012").unwrap()].into_iter().collect()
    }

    fn tapered(two_sided: bool, y_dist: Distribution) -> Wing {
        let mut w = Wing::new(WingType::Main);
        w.two_sided = two_sided;
        w.sections = vec![
            WingSection::new(0.0, 0.27, 0.0)
                .with_panels(6, 5)
                .with_distributions(Distribution::Cosine, y_dist)
                .with_dihedral(5.0)
                .with_foil("NACA 0012"),
            WingSection::new(0.4, 0.2, 0.02)
                .with_panels(6, 4)
                .with_distributions(Distribution::Cosine, y_dist)
                .with_foil("NACA 0012"),
            WingSection::new(0.735, 0.13, 0.06).with_foil("NACA 0012"),
        ];
        w
    }

    fn layout(w: &Wing) -> StationLayout {
        let s = create_surfaces(w, &Placement::default(), &foils(), &MeshConfig::default()).unwrap();
        compute_stations(&s, w.two_sided)
    }

    #[test_case(true, Distribution::Uniform)]
    #[test_case(true, Distribution::Sine)]
    #[test_case(false, Distribution::InvExp)]
    fn stations_are_ordered_and_consistent(two_sided: bool, y_dist: Distribution) {
        let l = layout(&tapered(two_sided, y_dist));
        let expected = if two_sided { 18 } else { 9 };
        assert_eq!(l.len(), expected);
        assert!(l.is_consistent());
        for w in l.positions.windows(2) {
            assert!(w[1] >= w[0]);
        }
        assert!(l.positions[0] < 0.0);
    }

    #[test]
    fn positions_are_symmetric() {
        let l = layout(&tapered(true, Distribution::Sine));
        let n = l.len();
        for i in 0..n / 2 {
            assert_relative_eq!(l.positions[i], -l.positions[n - 1 - i], epsilon = 1.0e-12);
        }
    }

    #[test]
    fn strip_areas_sum_to_planform_area() {
        let w = tapered(true, Distribution::Cosine);
        let l = layout(&w);
        let g = planform(&w.sections, true).unwrap();
        assert_relative_eq!(l.total_area(), g.planform_area, max_relative = 1.0e-6);
    }

    #[test]
    fn empty_surfaces_give_empty_layout() {
        let l = compute_stations(&[], true);
        assert!(l.is_empty());
        assert!(l.is_consistent());
    }
}
