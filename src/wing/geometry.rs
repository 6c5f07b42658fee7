//! Derived planform quantities of a wing: spans, areas, mean aerodynamic chord and flap count.

use super::WingSection;
use crate::Result;
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::foil::FoilSource;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The scalar geometry of a wing computed from its section list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanformGeometry {
    /// Span distance between each section and the previous one, the first entry is zero
    pub section_lengths: Vec<f64>,

    /// Cumulative span position of each section projected on the xy plane
    pub y_proj: Vec<f64>,

    pub planform_span: f64,
    pub projected_span: f64,
    pub planform_area: f64,
    pub projected_area: f64,

    /// Mean aerodynamic chord
    pub mac: f64,

    /// Number of trailing edge flaps over the whole wing
    pub flap_count: usize,
}

/// The integral of the squared chord over a linearly tapered span interval, used for the mean
/// aerodynamic chord.  Returns zero for intervals shorter than 1e-5.
///
/// # Arguments
///
/// * `y1`, `y2`: the span positions of the interval ends
/// * `c1`, `c2`: the chords at the interval ends
///
/// returns: f64
pub fn integral_c2(y1: f64, y2: f64, c1: f64, c2: f64) -> f64 {
    if (y2 - y1).abs() < 1.0e-5 {
        return 0.0;
    }
    let g = (c2 - c1) / (y2 - y1);
    let a = c1 - g * y1;

    a * a * (y2 - y1) + g * a * (y2 * y2 - y1 * y1) + g * g / 3.0 * (y2.powi(3) - y1.powi(3))
}

/// Computes spans, areas and the mean aerodynamic chord.  The flap count is left at zero since it
/// requires access to the foils, see `compute_geometry`.
pub fn planform(sections: &[WingSection], two_sided: bool) -> Result<PlanformGeometry> {
    if sections.len() < 2 {
        return Err(Box::new(MeshError::NotEnoughSections(sections.len())));
    }

    let mut section_lengths = vec![0.0; sections.len()];
    let mut y_proj = vec![sections[0].y; sections.len()];
    for i in 1..sections.len() {
        section_lengths[i] = sections[i].y - sections[i - 1].y;
        y_proj[i] = y_proj[i - 1] + section_lengths[i] * sections[i - 1].dihedral.to_radians().cos();
    }

    let mut area = 0.0;
    let mut xy_area = 0.0;
    let mut projected_span = 0.0;
    let mut c2 = 0.0;
    for (i, (a, b)) in sections.iter().tuple_windows().enumerate() {
        let length = section_lengths[i + 1];
        let cos_d = a.dihedral.to_radians().cos();
        let strip = length * (a.chord + b.chord) / 2.0;
        area += strip;
        xy_area += strip * cos_d;
        projected_span += length * cos_d;
        c2 += integral_c2(a.y, b.y, a.chord, b.chord);
    }

    let mut planform_span = sections[sections.len() - 1].y;
    let factor = if two_sided { 2.0 } else { 1.0 };
    planform_span *= factor;
    projected_span *= factor;
    let planform_area = area * factor;
    let projected_area = xy_area * factor;
    let mac = if planform_area.abs() > 0.0 {
        c2 * factor / planform_area
    } else {
        0.0
    };

    Ok(PlanformGeometry {
        section_lengths,
        y_proj,
        planform_span,
        projected_span,
        planform_area,
        projected_area,
        mac,
        flap_count: 0,
    })
}

/// Counts the trailing edge flaps: one per side for each section pair whose two foils carry a
/// flap and whose separation exceeds the minimum surface length.
pub fn flap_count(
    sections: &[WingSection],
    two_sided: bool,
    foils: &dyn FoilSource,
    config: &MeshConfig,
) -> usize {
    let has_flap = |name: &str| foils.foil(name).is_some_and(|f| f.has_te_flap());

    sections
        .iter()
        .tuple_windows()
        .filter(|(a, b)| (b.y - a.y).abs() > config.min_surface_length)
        .map(|(a, b)| {
            let left = usize::from(has_flap(&a.left_foil) && has_flap(&b.left_foil));
            let right = usize::from(two_sided && has_flap(&a.right_foil) && has_flap(&b.right_foil));
            left + right
        })
        .sum()
}

/// Computes the full planform geometry of a wing, including its flap count.
pub fn compute_geometry(
    sections: &[WingSection],
    two_sided: bool,
    foils: &dyn FoilSource,
    config: &MeshConfig,
) -> Result<PlanformGeometry> {
    let mut geometry = planform(sections, two_sided)?;
    geometry.flap_count = flap_count(sections, two_sided, foils, config);
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foil::{Foil, FoilDatabase};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn rect(dihedral: f64) -> Vec<WingSection> {
        vec![
            WingSection::new(0.0, 0.3, 0.0).with_dihedral(dihedral),
            WingSection::new(0.5, 0.3, 0.0),
        ]
    }

    #[test]
    fn rectangular_wing() {
        let g = planform(&rect(0.0), true).unwrap();
        assert_relative_eq!(g.planform_area, 0.3, epsilon = 1.0e-12);
        assert_relative_eq!(g.projected_span, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(g.planform_span, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(g.mac, 0.3, epsilon = 1.0e-12);
    }

    #[test]
    fn dihedral_reduces_projected_span_only() {
        let g = planform(&rect(10.0), true).unwrap();
        assert_relative_eq!(g.projected_span, 10.0_f64.to_radians().cos(), epsilon = 1.0e-12);
        assert_relative_eq!(g.planform_span, 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(g.planform_area, 0.3, epsilon = 1.0e-12);
    }

    #[test]
    fn tapered_mac_is_between_tip_and_root() {
        let s = vec![WingSection::new(0.0, 0.27, 0.0), WingSection::new(0.735, 0.13, 0.0)];
        let g = planform(&s, true).unwrap();
        assert!(g.mac > 0.13 && g.mac < 0.27);
        // closed form for a trapezoid: 2/3 cr (1 + l + l^2) / (1 + l)
        let l = 0.13 / 0.27;
        assert_relative_eq!(g.mac, 2.0 / 3.0 * 0.27 * (1.0 + l + l * l) / (1.0 + l), epsilon = 1.0e-12);
    }

    #[test_case(0.0, 1.0, 0.2, 0.2, 0.04)]
    #[test_case(1.0, 1.0, 0.2, 0.3, 0.0)]
    #[test_case(0.0, 2.0, 0.0, 2.0, 8.0 / 3.0)]
    fn integral_c2_values(y1: f64, y2: f64, c1: f64, c2: f64, expected: f64) {
        assert_relative_eq!(integral_c2(y1, y2, c1, c2), expected, epsilon = 1.0e-12);
    }

    #[test]
    fn single_section_is_an_error() {
        let e = planform(&rect(0.0)[..1], true).unwrap_err();
        assert_eq!(e.downcast_ref::<MeshError>(), Some(&MeshError::NotEnoughSections(1)));
    }

    #[test]
    fn flaps_are_counted_per_side() {
        let db: FoilDatabase = vec![
            Foil::naca4("0012").unwrap(),
            Foil::new("flapped", 0.0, 0.0, 0.12).with_te_flap(0.7),
        ]
        .into_iter()
        .collect();
        let s = vec![
            WingSection::new(0.0, 0.3, 0.0).with_foil("NACA 0012"),
            WingSection::new(0.2, 0.3, 0.0).with_foil("flapped"),
            WingSection::new(0.2, 0.3, 0.0).with_foil("flapped"),
            WingSection::new(0.6, 0.3, 0.0).with_foil("flapped"),
        ];
        let c = MeshConfig::default();
        assert_eq!(flap_count(&s, true, &db, &c), 2);
        assert_eq!(flap_count(&s, false, &db, &c), 1);
    }
}
