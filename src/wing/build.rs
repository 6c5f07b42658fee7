//! Construction of the surface array of a wing from its sections.

use super::{Surface, Wing};
use crate::Result;
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::foil::{Foil, FoilSource};
use crate::geom3::{Point3, Vector3, normalized_or_zero, rotate_vector};
use serde::{Deserialize, Serialize};

/// Center gaps wider than this break the join between the two center surfaces
const CENTER_GAP: f64 = 0.0001;

/// The position and orientation of a wing part in the plane frame.  The tilts are applied about
/// the origin, before the translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vector3,

    /// Rotation about the x axis, in degrees
    pub x_tilt: f64,

    /// Rotation about the y axis in degrees, applied about the z axis for one-sided wings
    pub y_tilt: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            x_tilt: 0.0,
            y_tilt: 0.0,
        }
    }
}

impl Placement {
    pub fn at(position: Vector3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_tilts(mut self, x_tilt: f64, y_tilt: f64) -> Self {
        self.x_tilt = x_tilt;
        self.y_tilt = y_tilt;
        self
    }
}

fn lookup(foils: &dyn FoilSource, name: &str) -> Result<Foil> {
    foils
        .foil(name)
        .cloned()
        .ok_or_else(|| MeshError::MissingFoil(name.to_string()).into())
}

fn mirror_y(v: &Vector3) -> Vector3 {
    Vector3::new(v.x, -v.y, v.z)
}

/// Builds the surfaces of a wing, ordered from the left tip to the right tip, and fully prepares
/// them for meshing: corner points, junction normals, twist, flaps, chordwise points, side nodes
/// and placement in the plane frame.
///
/// Section pairs closer than `config.min_surface_length` do not produce a surface.  A one-sided
/// wing only has left surfaces, which lie in the symmetry plane.
///
/// # Arguments
///
/// * `wing`: the wing whose sections are used
/// * `placement`: the position and tilts of the wing in the plane frame
/// * `foils`: the source of the foils named by the sections
/// * `config`: the build configuration
///
/// returns: Result<Vec<Surface, Global>, Box<dyn Error, Global>>
pub fn create_surfaces(
    wing: &Wing,
    placement: &Placement,
    foils: &dyn FoilSource,
    config: &MeshConfig,
) -> Result<Vec<Surface>> {
    let sections = &wing.sections;
    if sections.len() < 2 {
        return Err(Box::new(MeshError::NotEnoughSections(sections.len())));
    }
    wing.check_panel_counts()?;

    let pairs: Vec<usize> = (0..sections.len() - 1)
        .filter(|&j| (sections[j + 1].y - sections[j].y).abs() >= config.min_surface_length)
        .collect();
    let n = pairs.len();
    if n == 0 {
        return Err(Box::new(MeshError::NoSurfaces));
    }

    // surface normals from the dihedral, and junction normals averaged between neighbours
    let mut normals = vec![Vector3::zeros(); n + 1];
    for (i, &j) in pairs.iter().enumerate() {
        normals[i] = rotate_vector(&Vector3::z(), &Vector3::x(), sections[j].dihedral);
    }
    let mut side_normals = vec![Vector3::z(); n + 1];
    for i in 0..n {
        side_normals[i + 1] = normalized_or_zero(&(normals[i] + normals[i + 1]));
    }

    // left side, built from the root outwards
    let mut left: Vec<Surface> = Vec::with_capacity(n);
    for (i, &j) in pairs.iter().enumerate() {
        let (inner, outer) = (&sections[j], &sections[j + 1]);
        let la = Point3::new(outer.offset, -outer.y, 0.0);
        let lb = Point3::new(inner.offset, -inner.y, 0.0);
        let ta = la + Vector3::x() * outer.chord;
        let tb = lb + Vector3::x() * inner.chord;

        let mut s = Surface::new(
            lookup(foils, &outer.left_foil)?,
            lookup(foils, &inner.left_foil)?,
            la,
            ta,
            lb,
            tb,
        );
        let pivot = s.lb;
        s.rotate_x(&pivot, -inner.dihedral);
        s.normal_a = mirror_y(&side_normals[i + 1]);
        s.normal_b = mirror_y(&side_normals[i]);
        s.twist_a = outer.twist;
        s.twist_b = inner.twist;
        s.set_twist();

        if let Some(prev) = left.last() {
            let t = prev.la - s.lb;
            s.translate(&Vector3::new(0.0, t.y, t.z));
        }

        s.length = outer.y - inner.y;
        s.nx = inner.nx;
        s.ny = inner.ny;
        s.x_dist = inner.x_dist;
        s.y_dist = inner.y_dist.mirrored();
        s.set_flap();
        s.is_left = true;
        s.inner_section = j;
        s.outer_section = j + 1;
        left.push(s);
    }
    left.reverse();

    let mut surfaces = left;
    if wing.two_sided {
        for (i, &j) in pairs.iter().enumerate() {
            let (inner, outer) = (&sections[j], &sections[j + 1]);
            let la = Point3::new(inner.offset, inner.y, 0.0);
            let lb = Point3::new(outer.offset, outer.y, 0.0);
            let ta = la + Vector3::x() * inner.chord;
            let tb = lb + Vector3::x() * outer.chord;

            let mut s = Surface::new(
                lookup(foils, &inner.right_foil)?,
                lookup(foils, &outer.right_foil)?,
                la,
                ta,
                lb,
                tb,
            );
            let pivot = s.la;
            s.rotate_x(&pivot, inner.dihedral);
            s.normal_a = side_normals[i];
            s.normal_b = side_normals[i + 1];
            s.twist_a = inner.twist;
            s.twist_b = outer.twist;
            s.set_twist();

            if i > 0 {
                let prev = &surfaces[n + i - 1];
                let t = prev.lb - s.la;
                s.translate(&Vector3::new(0.0, t.y, t.z));
            }

            s.length = outer.y - inner.y;
            s.nx = inner.nx;
            s.ny = inner.ny;
            s.x_dist = inner.x_dist;
            s.y_dist = inner.y_dist;
            s.set_flap();
            s.is_left = false;
            s.inner_section = j;
            s.outer_section = j + 1;
            surfaces.push(s);
        }
    }

    let origin = Point3::origin();
    for s in surfaces.iter_mut() {
        s.rotate_x(&origin, placement.x_tilt);
        if wing.two_sided {
            s.rotate_y(&origin, placement.y_tilt);
        } else {
            s.rotate_z(&origin, placement.y_tilt);
            s.in_sym_plane = true;
        }
        s.translate(&placement.position);
    }

    set_flags(&mut surfaces, wing, n);
    create_x_points(&mut surfaces);
    for s in surfaces.iter_mut() {
        s.make_side_nodes();
        s.init_te_bisectors();
    }

    Ok(surfaces)
}

/// Sets the tip, closure, center and join flags.  `n` is the number of surfaces per side.
fn set_flags(surfaces: &mut [Surface], wing: &Wing, n: usize) {
    let ns = surfaces.len();
    surfaces[n - 1].is_center = true;
    if wing.two_sided {
        surfaces[n].is_center = true;
    }

    surfaces[0].is_tip_left = true;
    surfaces[0].is_closed_left = true;
    surfaces[ns - 1].is_tip_right = true;

    if wing.two_sided {
        if wing.close_inner_side {
            surfaces[ns / 2 - 1].is_closed_right = true;
            surfaces[ns / 2].is_closed_left = true;
        }
        surfaces[ns - 1].is_closed_right = true;
    } else if wing.close_inner_side {
        surfaces[ns - 1].is_closed_right = true;
    }

    if ns > 1 {
        surfaces[ns / 2 - 1].join_right = true;
    }
    if wing.two_sided && wing.sections[0].y > CENTER_GAP && ns >= 2 {
        surfaces[ns / 2 - 1].join_right = false;
    }
    surfaces[ns - 1].join_right = false;
}

/// Creates the chordwise points of all surfaces, forcing the shared side of two adjacent surfaces
/// to use the same points when a flap is present on either of them.
pub fn create_x_points(surfaces: &mut [Surface]) {
    let Some(first) = surfaces.first_mut() else {
        return;
    };
    first.create_x_points(0);
    let nx_flaps = first.nx_flap;

    for i in 1..surfaces.len() {
        let (done, rest) = surfaces.split_at_mut(i);
        let a = &mut done[i - 1];
        let b = &mut rest[0];
        let same_nx = a.nx == b.nx;

        match (a.te_flap, b.te_flap) {
            (false, false) => b.create_x_points(0),
            (true, false) => {
                b.create_x_points(0);
                if same_nx {
                    b.x_points_a = a.x_points_b.clone();
                }
            }
            (false, true) => {
                b.create_x_points(nx_flaps);
                if same_nx {
                    a.x_points_b = b.x_points_a.clone();
                }
            }
            (true, true) => {
                b.create_x_points(nx_flaps);
                if same_nx {
                    b.x_points_a = a.x_points_b.clone();
                }
            }
        }
    }
}
