//! Parametric wings.  A `Wing` is defined by an ordered list of sections from the root to the tip,
//! from which the planform geometry, the surface array and the spanwise stations are derived.
//! The derived data is never edited by hand: any change to the sections invalidates it and the
//! wing must be rebuilt through `compute_geometry`, `create_surfaces` and `compute_stations`.

mod build;
mod geometry;
mod inertia;
mod scaling;
mod section;
mod stations;
mod surface;

use crate::Result;
use crate::common::Distribution;
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::foil::FoilSource;
use serde::{Deserialize, Serialize};

pub use build::{Placement, create_surfaces, create_x_points};
pub use geometry::{PlanformGeometry, compute_geometry, flap_count, integral_c2, planform};
pub use inertia::{Inertia, structural_inertia};
pub use section::WingSection;
pub use stations::{StationLayout, compute_stations};
pub use surface::{PanelCorners, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WingType {
    Main,
    Elevator,
    Fin,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wing {
    pub name: String,
    pub wing_type: WingType,

    /// Whether the wing has a left and a right side, or only a left side lying in the symmetry
    /// plane as a fin does
    pub two_sided: bool,

    /// Whether the root side of the center surfaces is closed by a tip patch
    pub close_inner_side: bool,

    pub sections: Vec<WingSection>,

    /// The structural mass spread over the volume of the surfaces, in kg
    #[serde(default)]
    pub structural_mass: f64,

    #[serde(skip)]
    geometry: PlanformGeometry,

    #[serde(skip)]
    surfaces: Vec<Surface>,

    #[serde(skip)]
    stations: StationLayout,

    #[serde(skip)]
    inertia: Inertia,
}

impl Wing {
    /// Creates the default two-section wing for the given type.
    pub fn new(wing_type: WingType) -> Self {
        let section = |y: f64, chord: f64, offset: f64, (nx, ny): (usize, usize), x: Distribution, yd: Distribution| {
            WingSection::new(y, chord, offset)
                .with_panels(nx, ny)
                .with_distributions(x, yd)
        };

        let (name, two_sided, close_inner_side, sections) = match wing_type {
            WingType::Main | WingType::Other => (
                "Wing",
                true,
                false,
                vec![
                    section(0.0, 0.300, 0.0, (13, 19), Distribution::Tanh, Distribution::InvExp),
                    section(1.5, 0.190, 0.085, (13, 19), Distribution::Tanh, Distribution::InvExp),
                ],
            ),
            WingType::Elevator => (
                "Elevator",
                true,
                false,
                vec![
                    section(0.0, 0.200, 0.0, (5, 5), Distribution::Tanh, Distribution::InvExp),
                    section(0.32, 0.110, 0.05, (5, 5), Distribution::Tanh, Distribution::InvExp),
                ],
            ),
            WingType::Fin => (
                "Fin",
                false,
                true,
                vec![
                    section(0.0, 0.200, 0.0, (5, 5), Distribution::Tanh, Distribution::Tanh),
                    section(0.29, 0.120, 0.08, (5, 5), Distribution::Tanh, Distribution::Tanh),
                ],
            ),
        };

        let mut wing = Self {
            name: name.to_string(),
            wing_type,
            two_sided,
            close_inner_side,
            sections,
            structural_mass: 0.0,
            geometry: PlanformGeometry::default(),
            surfaces: Vec::new(),
            stations: StationLayout::default(),
            inertia: Inertia::default(),
        };
        wing.refresh_planform();
        wing
    }

    /// Creates a wing from an explicit list of sections.
    pub fn from_sections(name: &str, wing_type: WingType, two_sided: bool, sections: Vec<WingSection>) -> Self {
        let mut wing = Self {
            name: name.to_string(),
            wing_type,
            two_sided,
            close_inner_side: false,
            sections,
            structural_mass: 0.0,
            geometry: PlanformGeometry::default(),
            surfaces: Vec::new(),
            stations: StationLayout::default(),
            inertia: Inertia::default(),
        };
        wing.refresh_planform();
        wing
    }

    pub fn is_fin(&self) -> bool {
        self.wing_type == WingType::Fin
    }

    pub fn n_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn geometry(&self) -> &PlanformGeometry {
        &self.geometry
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn stations(&self) -> &StationLayout {
        &self.stations
    }

    /// The mass properties of the last build.  Only the mass is set before the wing is built.
    pub fn inertia(&self) -> &Inertia {
        &self.inertia
    }

    /// Drops the surfaces and stations, and recomputes the planform scalars which do not depend
    /// on the foils.  Called after every section edit.
    fn invalidate(&mut self) {
        self.surfaces.clear();
        self.stations = StationLayout::default();
        self.compute_inertia();
        self.refresh_planform();
    }

    fn refresh_planform(&mut self) {
        let flap_count = self.geometry.flap_count;
        self.geometry = planform(&self.sections, self.two_sided).unwrap_or_default();
        self.geometry.flap_count = flap_count;
    }

    // ==========================================================================================
    // Section edits
    // ==========================================================================================

    /// Appends a section at the tip of the wing.
    pub fn append_section(&mut self, section: WingSection) {
        self.sections.push(section);
        self.invalidate();
    }

    /// Inserts a section before the section at `index`.  Indices past the end append the section.
    pub fn insert_section(&mut self, index: usize, section: WingSection) {
        if index >= self.sections.len() {
            self.sections.push(section);
        } else {
            self.sections.insert(index, section);
        }
        self.invalidate();
    }

    /// Removes and returns the section at `index`, or `None` if there is no such section.
    pub fn remove_section(&mut self, index: usize) -> Option<WingSection> {
        if index >= self.sections.len() {
            return None;
        }
        let removed = self.sections.remove(index);
        self.invalidate();
        Some(removed)
    }

    /// Sets every section to the rounded mean of the chordwise panel counts when the counts are
    /// not all equal.
    ///
    /// returns: the new panel count, or 0 if the counts were already uniform
    pub fn uniformize_x_panels(&mut self) -> usize {
        let Some(first) = self.sections.first().map(|s| s.nx) else {
            return 0;
        };
        if self.sections.iter().all(|s| s.nx == first) {
            return 0;
        }
        let mean = self.sections.iter().map(|s| s.nx as f64).sum::<f64>() / self.sections.len() as f64;
        let nx = (mean.round() as usize).max(1);
        for s in self.sections.iter_mut() {
            s.nx = nx;
        }
        self.invalidate();
        nx
    }

    // ==========================================================================================
    // Planform scalars
    // ==========================================================================================

    pub fn planform_span(&self) -> f64 {
        self.geometry.planform_span
    }

    pub fn projected_span(&self) -> f64 {
        self.geometry.projected_span
    }

    pub fn planform_area(&self) -> f64 {
        self.geometry.planform_area
    }

    pub fn projected_area(&self) -> f64 {
        self.geometry.projected_area
    }

    pub fn mac(&self) -> f64 {
        self.geometry.mac
    }

    pub fn root_chord(&self) -> f64 {
        self.sections.first().map_or(0.0, |s| s.chord)
    }

    pub fn tip_chord(&self) -> f64 {
        self.sections.last().map_or(0.0, |s| s.chord)
    }

    pub fn root_offset(&self) -> f64 {
        self.sections.first().map_or(0.0, |s| s.offset)
    }

    pub fn tip_offset(&self) -> f64 {
        self.sections.last().map_or(0.0, |s| s.offset)
    }

    pub fn tip_twist(&self) -> f64 {
        self.sections.last().map_or(0.0, |s| s.twist)
    }

    pub fn aspect_ratio(&self) -> f64 {
        if self.geometry.planform_area > 0.0 {
            self.geometry.planform_span.powi(2) / self.geometry.planform_area
        } else {
            0.0
        }
    }

    pub fn taper_ratio(&self) -> f64 {
        if self.root_chord() > 0.001 {
            self.tip_chord() / self.root_chord()
        } else {
            0.0
        }
    }

    /// The sweep of the line joining the root and tip quarter chord points, in degrees
    pub fn average_sweep(&self) -> f64 {
        let x_root = self.root_offset() + self.root_chord() / 4.0;
        let x_tip = self.tip_offset() + self.tip_chord() / 4.0;
        (x_tip - x_root).atan2(self.geometry.planform_span / 2.0).to_degrees()
    }

    // ==========================================================================================
    // Interpolation along the span
    // ==========================================================================================

    /// Finds the section pair containing the absolute span position `y` and the relative position
    /// of `y` within the pair.
    fn locate(&self, y: f64) -> Option<(usize, f64)> {
        self.sections.windows(2).enumerate().find_map(|(i, w)| {
            let length = w[1].y - w[0].y;
            if length > 0.0 && w[0].y <= y && y <= w[1].y {
                Some((i, (y - w[0].y) / length))
            } else {
                None
            }
        })
    }

    fn locate_yob(&self, yob: f64) -> Option<(usize, f64)> {
        self.locate((yob * self.geometry.planform_span / 2.0).abs())
    }

    /// The chord at the relative span position `yob` in [-1, 1], or -1 outside of the wing.
    pub fn chord_at(&self, yob: f64) -> f64 {
        self.locate_yob(yob).map_or(-1.0, |(i, t)| {
            self.sections[i].chord + t * (self.sections[i + 1].chord - self.sections[i].chord)
        })
    }

    /// The leading edge offset at the relative span position `yob`, or -1 outside of the wing.
    pub fn offset_at(&self, yob: f64) -> f64 {
        self.locate_yob(yob).map_or(-1.0, |(i, t)| {
            self.sections[i].offset + t * (self.sections[i + 1].offset - self.sections[i].offset)
        })
    }

    /// The twist at the relative span position `yob`, or 0 outside of the wing.
    pub fn twist_at(&self, yob: f64) -> f64 {
        self.locate_yob(yob).map_or(0.0, |(i, t)| {
            self.sections[i].twist + t * (self.sections[i + 1].twist - self.sections[i].twist)
        })
    }

    /// The dihedral at the relative span position `yob`, negated on the left side.
    pub fn dihedral_at(&self, yob: f64) -> f64 {
        self.locate_yob(yob).map_or(0.0, |(i, _)| {
            if yob >= 0.0 {
                self.sections[i].dihedral
            } else {
                -self.sections[i].dihedral
            }
        })
    }

    /// The x position of the quarter chord point at the relative span position `yob`.
    pub fn c4_at(&self, yob: f64) -> f64 {
        self.locate_yob(yob).map_or(0.0, |(i, t)| {
            let (a, b) = (&self.sections[i], &self.sections[i + 1]);
            let chord = a.chord + t * (b.chord - a.chord);
            let offset = a.offset + t * (b.offset - a.offset);
            offset + chord / 4.0
        })
    }

    /// The height reached at the absolute span position `y` by the dihedral of the sections.
    pub fn z_position(&self, y: f64) -> f64 {
        let y = y.abs();
        if y <= 0.0 {
            return 0.0;
        }
        self.locate(y).map_or(0.0, |(i, t)| {
            let rise = |s: &WingSection, length: f64| length * s.dihedral.to_radians().sin();
            let below: f64 = self
                .sections
                .windows(2)
                .take(i)
                .map(|w| rise(&w[0], w[1].y - w[0].y))
                .sum();
            below + t * rise(&self.sections[i], self.sections[i + 1].y - self.sections[i].y)
        })
    }

    /// The position of the absolute span position `span_pos` relative to the section pair which
    /// contains it, measured from the inner section on the right side and from the outer section
    /// on the left side.  Returns 1 outside of the wing.
    pub fn y_section_rel(&self, span_pos: f64) -> f64 {
        let y = span_pos.abs();
        self.sections
            .windows(2)
            .find(|w| w[0].y <= y && y < w[1].y)
            .map_or(1.0, |w| {
                if span_pos > 0.0 {
                    (y - w[0].y) / (w[1].y - w[0].y)
                } else {
                    (y - w[1].y) / (w[0].y - w[1].y)
                }
            })
    }

    /// The x position of the leading edge at the absolute span position `span_pos`.
    pub fn x_le(&self, span_pos: f64) -> f64 {
        self.offset_at(self.yob(span_pos))
    }

    /// The x position of the trailing edge at the absolute span position `span_pos`.
    pub fn x_te(&self, span_pos: f64) -> f64 {
        let yob = self.yob(span_pos);
        self.offset_at(yob) + self.chord_at(yob)
    }

    fn yob(&self, span_pos: f64) -> f64 {
        if self.geometry.projected_span > 0.0 {
            span_pos / self.geometry.projected_span * 2.0
        } else {
            0.0
        }
    }

    // ==========================================================================================
    // Build pipeline
    // ==========================================================================================

    /// Checks that every foil named by the sections is available.
    ///
    /// returns: `MeshError::MissingFoil` naming the first missing foil
    pub fn check_foils(&self, foils: &dyn FoilSource) -> Result<()> {
        for s in &self.sections {
            for name in [&s.left_foil, &s.right_foil] {
                if foils.foil(name).is_none() {
                    return Err(Box::new(MeshError::MissingFoil(name.clone())));
                }
            }
        }
        Ok(())
    }

    /// Checks that every section bounding a surface on its inner side asks for at least one
    /// chordwise and one spanwise panel.  The counts of the tip section are not used.
    ///
    /// returns: `MeshError::NoPanels` naming the first offending section
    pub fn check_panel_counts(&self) -> Result<()> {
        let inner = self.sections.len().saturating_sub(1);
        match self.sections[..inner].iter().position(|s| s.nx == 0 || s.ny == 0) {
            Some(section) => Err(Box::new(MeshError::NoPanels { section })),
            None => Ok(()),
        }
    }

    pub fn compute_geometry(&mut self, foils: &dyn FoilSource, config: &MeshConfig) -> Result<()> {
        self.geometry = compute_geometry(&self.sections, self.two_sided, foils, config)?;
        Ok(())
    }

    /// Builds the surfaces of the wing at the given placement.  The surfaces are only replaced
    /// if the build succeeds.
    pub fn create_surfaces(
        &mut self,
        placement: &Placement,
        foils: &dyn FoilSource,
        config: &MeshConfig,
    ) -> Result<()> {
        self.surfaces = create_surfaces(self, placement, foils, config)?;
        self.stations = StationLayout::default();
        self.compute_inertia();
        Ok(())
    }

    /// Spreads the structural mass over the current surfaces.  Called again after the mass is
    /// changed on a built wing.
    pub fn compute_inertia(&mut self) {
        self.inertia = structural_inertia(&self.surfaces, self.structural_mass);
    }

    pub fn compute_stations(&mut self) {
        self.stations = compute_stations(&self.surfaces, self.two_sided);
    }

    /// Runs the whole geometry pipeline on a copy of the wing and returns the rebuilt copy,
    /// leaving this wing untouched.
    pub fn rebuilt(&self, placement: &Placement, foils: &dyn FoilSource, config: &MeshConfig) -> Result<Wing> {
        let mut wing = self.clone();
        wing.check_foils(foils)?;
        wing.compute_geometry(foils, config)?;
        wing.create_surfaces(placement, foils, config)?;
        wing.compute_stations();
        Ok(wing)
    }

    // ==========================================================================================
    // Panel counts
    // ==========================================================================================

    fn valid_pairs<'a>(&'a self, config: &'a MeshConfig) -> impl Iterator<Item = &'a WingSection> + 'a {
        self.sections
            .windows(2)
            .filter(move |w| (w[1].y - w[0].y).abs() >= config.min_surface_length)
            .map(|w| &w[0])
    }

    /// The number of outer tips and of closed inner sides, each of which carries a tip patch on
    /// thick meshes.
    fn closed_sides(&self) -> (usize, usize) {
        let sides = if self.two_sided { 2 } else { 1 };
        (sides, if self.close_inner_side { sides } else { 0 })
    }

    /// The number of quad panels of the wing mesh, tip patches included for thick surfaces.
    pub fn quad_total(&self, thin: bool, config: &MeshConfig) -> usize {
        let pairs: Vec<&WingSection> = self.valid_pairs(config).collect();
        let per_side: usize = pairs.iter().map(|s| s.nx * s.ny).sum();
        let mut total = if self.two_sided { 2 * per_side } else { per_side };
        if !thin {
            total *= 2;
            let (tips, inner) = self.closed_sides();
            let tip_nx = pairs.last().map_or(0, |s| s.nx);
            let root_nx = pairs.first().map_or(0, |s| s.nx);
            total += config.tip_strips() * (tips * tip_nx + inner * root_nx);
        }
        total
    }

    /// The number of triangles of a thick triangulated mesh.  The two triangles of each tip strip
    /// which touch the trailing and the leading edge points are degenerate and are not counted.
    pub fn triangle_count(&self, config: &MeshConfig) -> usize {
        let quads = self.quad_total(false, config);
        let (tips, inner) = self.closed_sides();
        (2 * quads).saturating_sub(2 * (tips + inner) * config.tip_strips())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foil::{Foil, FoilDatabase};
    use approx::assert_relative_eq;
    use test_case::test_case;

    fn rect() -> Wing {
        Wing::from_sections(
            "rect",
            WingType::Main,
            true,
            vec![WingSection::new(0.0, 0.3, 0.0), WingSection::new(0.5, 0.3, 0.0)],
        )
    }

    fn tapered() -> Wing {
        Wing::from_sections(
            "tapered",
            WingType::Main,
            true,
            vec![
                WingSection::new(0.0, 0.27, 0.0),
                WingSection::new(0.735, 0.13, 0.1).with_twist(-3.0),
            ],
        )
    }

    #[test_case(WingType::Main, true, 0.300, 0.190)]
    #[test_case(WingType::Elevator, true, 0.200, 0.110)]
    #[test_case(WingType::Fin, false, 0.200, 0.120)]
    fn default_wings(wing_type: WingType, two_sided: bool, root: f64, tip: f64) {
        let w = Wing::new(wing_type);
        assert_eq!(w.two_sided, two_sided);
        assert_eq!(w.close_inner_side, wing_type == WingType::Fin);
        assert_eq!(w.n_sections(), 2);
        assert_relative_eq!(w.root_chord(), root);
        assert_relative_eq!(w.tip_chord(), tip);
        assert!(w.planform_area() > 0.0);
    }

    #[test]
    fn rectangular_geometry() {
        let w = rect();
        assert_relative_eq!(w.planform_area(), 0.3, epsilon = 1.0e-12);
        assert_relative_eq!(w.projected_span(), 1.0, epsilon = 1.0e-12);
        assert_relative_eq!(w.mac(), 0.3, epsilon = 1.0e-12);
        assert_relative_eq!(w.aspect_ratio(), 1.0 / 0.3, epsilon = 1.0e-12);
    }

    #[test]
    fn tapered_ratios() {
        let w = tapered();
        assert_relative_eq!(w.taper_ratio(), 0.13 / 0.27, epsilon = 1.0e-12);
        assert!(w.mac() > 0.13 && w.mac() < 0.27);
        let dx: f64 = 0.1 + 0.13 / 4.0 - 0.27 / 4.0;
        assert_relative_eq!(w.average_sweep(), dx.atan2(0.735).to_degrees(), epsilon = 1.0e-12);
    }

    #[test_case(0.0, 0.27)]
    #[test_case(1.0, 0.13)]
    #[test_case(-0.5, 0.2)]
    #[test_case(1.2, -1.0)]
    fn chord_interpolation(yob: f64, expected: f64) {
        assert_relative_eq!(tapered().chord_at(yob), expected, epsilon = 1.0e-12);
    }

    #[test]
    fn twist_and_offset_interpolation() {
        let w = tapered();
        assert_relative_eq!(w.twist_at(0.5), -1.5, epsilon = 1.0e-12);
        assert_relative_eq!(w.twist_at(-2.0), 0.0);
        assert_relative_eq!(w.offset_at(-1.0), 0.1, epsilon = 1.0e-12);
        assert_relative_eq!(w.offset_at(3.0), -1.0);
        assert_relative_eq!(w.c4_at(0.0), 0.27 / 4.0, epsilon = 1.0e-12);
        assert_relative_eq!(w.x_te(0.0), 0.27, epsilon = 1.0e-12);
        assert_relative_eq!(w.x_le(0.735), 0.1, epsilon = 1.0e-12);
    }

    #[test]
    fn dihedral_sign_and_height() {
        let mut w = rect();
        w.sections[0].dihedral = 30.0;
        w.invalidate();
        assert_relative_eq!(w.dihedral_at(0.5), 30.0);
        assert_relative_eq!(w.dihedral_at(-0.5), -30.0);
        assert_relative_eq!(w.z_position(0.5), 0.25, epsilon = 1.0e-12);
        assert_relative_eq!(w.z_position(-0.25), 0.125, epsilon = 1.0e-12);
    }

    #[test_case(0.25, 0.5)]
    #[test_case(-0.125, 0.75)]
    #[test_case(0.9, 1.0)]
    fn section_relative_position(span_pos: f64, expected: f64) {
        assert_relative_eq!(rect().y_section_rel(span_pos), expected, epsilon = 1.0e-12);
    }

    #[test]
    fn section_edits_refresh_geometry() {
        let mut w = rect();
        w.append_section(WingSection::new(1.0, 0.1, 0.0));
        assert_eq!(w.n_sections(), 3);
        assert_relative_eq!(w.planform_span(), 2.0, epsilon = 1.0e-12);
        w.insert_section(1, WingSection::new(0.25, 0.3, 0.0));
        assert_relative_eq!(w.sections[1].y, 0.25);
        let removed = w.remove_section(3).unwrap();
        assert_relative_eq!(removed.y, 1.0);
        assert_relative_eq!(w.planform_span(), 1.0, epsilon = 1.0e-12);
        assert!(w.remove_section(7).is_none());
    }

    #[test]
    fn uniformize_panels() {
        let mut w = rect();
        w.sections[0].nx = 4;
        w.sections[1].nx = 7;
        assert_eq!(w.uniformize_x_panels(), 6);
        assert!(w.sections.iter().all(|s| s.nx == 6));
        assert_eq!(w.uniformize_x_panels(), 0);
    }

    #[test]
    fn check_foils_names_missing_foil() {
        let db: FoilDatabase = vec![Foil::naca4("0012").unwrap()].into_iter().collect();
        let mut w = rect();
        for s in w.sections.iter_mut() {
            *s = s.clone().with_foil("NACA 0012");
        }
        assert!(w.check_foils(&db).is_ok());
        w.sections[1].left_foil = "NACA 4412".to_string();
        let e = w.check_foils(&db).unwrap_err();
        assert_eq!(e.to_string(), "Missing foil: NACA 4412");
    }

    #[test_case(0, 3)]
    #[test_case(4, 0)]
    fn empty_panel_counts_are_rejected(nx: usize, ny: usize) {
        let db: FoilDatabase = vec![Foil::naca4("0012").unwrap()].into_iter().collect();
        let mut w = rect();
        for s in w.sections.iter_mut() {
            *s = s.clone().with_foil("NACA 0012").with_panels(nx, ny);
        }
        let e = w.rebuilt(&Placement::default(), &db, &MeshConfig::default()).unwrap_err();
        assert_eq!(e.downcast_ref::<MeshError>(), Some(&MeshError::NoPanels { section: 0 }));

        // the tip section bounds no surface on its inner side
        w.sections[0] = w.sections[0].clone().with_panels(4, 3);
        assert!(w.check_panel_counts().is_ok());
        assert!(w.rebuilt(&Placement::default(), &db, &MeshConfig::default()).is_ok());
    }

    #[test]
    fn panel_counts() {
        let mut w = rect();
        w.sections[0] = w.sections[0].clone().with_panels(4, 3);
        let c = MeshConfig::default();
        assert_eq!(w.quad_total(true, &c), 24);
        assert_eq!(w.quad_total(false, &c), 48 + 8);
        assert_eq!(w.triangle_count(&c), 2 * 56 - 4);
    }

    #[test]
    fn rebuild_leaves_the_wing_untouched() {
        let db: FoilDatabase = vec![Foil::naca4("0012").unwrap()].into_iter().collect();
        let mut w = rect();
        for s in w.sections.iter_mut() {
            *s = s.clone().with_foil("NACA 0012");
        }
        let built = w.rebuilt(&Placement::default(), &db, &MeshConfig::default()).unwrap();
        assert!(w.surfaces().is_empty());
        assert_eq!(built.surfaces().len(), 2);
        assert_eq!(built.stations().len(), 2 * w.sections[0].ny);
    }
}
