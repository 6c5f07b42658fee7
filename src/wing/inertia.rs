//! Structural mass properties of a wing.  The mass is spread over the volume enclosed by the
//! surfaces: each surface is cut into spanwise slices whose volume comes from the section areas of
//! its foils, and each slice is shared between chordwise elements in proportion to the area of
//! their cross-section.

use super::Surface;
use crate::geom3::{Point3, Vector3};
use crate::mesh::SurfacePosition;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const NX_ELEMENTS: usize = 20;
const NY_SLICES: usize = 40;

/// The mass, centre of gravity and inertia tensor of a wing.  The tensor is taken about the centre
/// of gravity, in the frame of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Inertia {
    pub mass: f64,

    /// The volume enclosed by the surfaces
    pub volume: f64,
    pub cog: Point3,
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    pub ixz: f64,
}

struct Element {
    volume: f64,
    centre: Point3,
}

/// Spreads `mass` uniformly over the volume of the surfaces.  Surfaces with no volume, such as
/// those of a wing with zero thickness foils, give an inertia with the mass only.
pub fn structural_inertia(surfaces: &[Surface], mass: f64) -> Inertia {
    let elements: Vec<Element> = surfaces.par_iter().flat_map_iter(surface_elements).collect();
    let volume: f64 = elements.iter().map(|e| e.volume).sum();
    if volume <= 0.0 {
        return Inertia {
            mass,
            ..Inertia::default()
        };
    }

    let moment = elements
        .iter()
        .fold(Vector3::zeros(), |acc, e| acc + e.centre.coords * e.volume);
    let cog = Point3::from(moment / volume);
    let rho = mass / volume;

    let mut inertia = Inertia {
        mass,
        volume,
        cog,
        ..Inertia::default()
    };
    for e in &elements {
        let d = e.centre - cog;
        let m = e.volume * rho;
        inertia.ixx += m * (d.y * d.y + d.z * d.z);
        inertia.iyy += m * (d.x * d.x + d.z * d.z);
        inertia.izz += m * (d.x * d.x + d.y * d.y);
        inertia.ixz += m * d.x * d.z;
    }
    inertia
}

fn chordwise(l: usize) -> f64 {
    0.5 * (1.0 - (l as f64 * PI / NX_ELEMENTS as f64).cos())
}

fn surface_elements(surface: &Surface) -> Vec<Element> {
    let (area_a, area_b) = (surface.foil_a.area(), surface.foil_b.area());
    let width = surface.span_length() / NY_SLICES as f64;

    let mut elements = Vec::with_capacity(NX_ELEMENTS * NY_SLICES);
    for k in 0..NY_SLICES {
        let tau = (k as f64 + 0.5) / NY_SLICES as f64;
        let section = (area_a + (area_b - area_a) * tau) * surface.chord(tau).powi(2);

        let slice: Vec<(f64, Point3)> = (0..NX_ELEMENTS)
            .map(|l| {
                let (x0, x1) = (chordwise(l), chordwise(l + 1));
                let top0 = surface.surface_point(x0, x0, tau, SurfacePosition::Top);
                let top1 = surface.surface_point(x1, x1, tau, SurfacePosition::Top);
                let bot0 = surface.surface_point(x0, x0, tau, SurfacePosition::Bottom);
                let bot1 = surface.surface_point(x1, x1, tau, SurfacePosition::Bottom);
                let area = (top1 - bot0).cross(&(bot1 - top0)).norm() / 2.0;
                let centre = Point3::from((top0.coords + top1.coords + bot0.coords + bot1.coords) / 4.0);
                (area, centre)
            })
            .collect();

        let total: f64 = slice.iter().map(|(a, _)| a).sum();
        if total <= 0.0 {
            continue;
        }
        elements.extend(slice.into_iter().map(|(area, centre)| Element {
            volume: section * width * area / total,
            centre,
        }));
    }
    elements
}
