//! Triangulation of wing surfaces.
//!
//! Each quad of the node grid is split into a "down" and an "up" triangle whose windings make
//! every normal point out of the wing.  The diagonal is mirrored between the left and the right
//! surfaces so that the two sides of a wing are symmetric.

use super::grid::{NodeGrid, TipNodes};
use super::{MeshRange, Panel3, SurfacePanels, SurfacePosition, TriMesh, stitch_tri_surfaces};
use crate::Result;
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::wing::Surface;
use std::ops::Range;

/// The corner nodes of one grid quad
#[derive(Clone, Copy)]
struct Quad {
    la: usize,
    lb: usize,
    ta: usize,
    tb: usize,
}

impl Quad {
    /// The down and up triangles of the quad
    fn split(&self, left: bool, pos: SurfacePosition) -> ([usize; 3], [usize; 3]) {
        let Quad { la, lb, ta, tb } = *self;
        match (left, pos) {
            (true, SurfacePosition::Bottom) => ([lb, tb, ta], [la, lb, ta]),
            (true, SurfacePosition::Top) => ([tb, ta, la], [tb, la, lb]),
            (true, _) => ([lb, ta, tb], [la, ta, lb]),
            (false, SurfacePosition::Bottom) => ([la, tb, ta], [la, lb, tb]),
            (false, SurfacePosition::Top) => ([tb, ta, lb], [ta, la, lb]),
            (false, _) => ([la, ta, tb], [tb, lb, la]),
        }
    }
}

/// Shared attributes of the panels created for a surface
struct Tagger<'a> {
    surface: &'a Surface,
    surface_index: usize,
}

impl Tagger<'_> {
    fn tag(&self, p: &mut Panel3, pos: SurfacePosition, flap: bool) {
        p.position = pos;
        p.surface = self.surface_index;
        p.surface_normal = self.surface.normal;
        p.left_wing = self.surface.is_left;
        p.in_sym_plane = self.surface.in_sym_plane;
        p.flap = self.surface.te_flap && flap;
    }
}

/// Triangulates one surface at the end of the arena: nodes, left tip patch, strips and right tip
/// patch, then connects the panels of the surface which share an edge.
///
/// # Arguments
///
/// * `surface`: the surface, with its side nodes already built
/// * `surface_index`: the index of the surface in its wing
/// * `mesh`: the arena receiving the nodes and panels
/// * `config`: the mesh configuration
///
/// returns: Result<SurfacePanels, Box<dyn Error, Global>>
pub fn triangulate_surface(
    surface: &Surface,
    surface_index: usize,
    mesh: &mut TriMesh,
    config: &MeshConfig,
) -> Result<SurfacePanels> {
    let grid = NodeGrid::build(surface, surface_index, &mut mesh.nodes, config);
    let tagger = Tagger { surface, surface_index };
    let first = mesh.panel_count();

    let left_tip = match &grid.left_tip {
        Some(tip) => tip_patch(&grid, tip, true, &tagger, mesh)?,
        None => first..first,
    };

    let mut strips = Vec::with_capacity(surface.ny);
    for k in 0..surface.ny {
        strips.push(strip(&grid, k, &tagger, mesh)?);
    }

    let after = mesh.panel_count();
    let right_tip = match &grid.right_tip {
        Some(tip) => tip_patch(&grid, tip, false, &tagger, mesh)?,
        None => after..after,
    };

    let panels = first..mesh.panel_count();
    mesh.connect_edges(panels.clone());

    Ok(SurfacePanels {
        surface: surface_index,
        panels,
        strips,
        left_tip,
        right_tip,
        columns: grid.columns,
    })
}

/// Builds the triangles of strip `k` and returns their range.
fn strip(grid: &NodeGrid, k: usize, tagger: &Tagger, mesh: &mut TriMesh) -> Result<Range<usize>> {
    let surface = tagger.surface;
    let nx = grid.nx;
    let n_lines = if grid.thick { 2 * nx } else { nx };
    let last_strip = k + 1 == surface.ny;
    let start = mesh.panel_count();

    let mut previous: Option<usize> = None;
    let mut bottom_trailing = None;
    let mut top_trailing = None;

    for l in 0..n_lines {
        let mut q = Quad {
            ta: grid.columns[k] + l,
            la: grid.columns[k] + l + 1,
            tb: grid.columns[k + 1] + l,
            lb: grid.columns[k + 1] + l + 1,
        };
        if let Some(tip) = grid.left_tip.filter(|_| k == 0) {
            if l == 0 {
                q.ta = tip.rear;
            }
            if l == n_lines - 1 {
                q.la = tip.rear;
            }
        }
        if let Some(tip) = grid.right_tip.filter(|_| last_strip) {
            if l == 0 {
                q.tb = tip.rear;
            }
            if l == n_lines - 1 {
                q.lb = tip.rear;
            }
        }

        let pos = if !grid.thick {
            SurfacePosition::Mid
        } else if l < nx {
            SurfacePosition::Bottom
        } else {
            SurfacePosition::Top
        };
        let flap = l < surface.nx_flap || l + surface.nx_flap > 2 * nx - 1;
        let (down, up) = q.split(surface.is_left, pos);

        if let Some(i) = mesh.add_triangle(down)? {
            let p = &mut mesh.panels[i];
            tagger.tag(p, pos, flap);
            p.trailing = l == 0;
            p.leading = grid.thick && l == nx;
            if p.trailing {
                let v = p.nodes.map(|n| mesh.nodes[n].position);
                p.te_bisectors = Some([surface.te_bisector(&v[1]), surface.te_bisector(&v[2])]);
                bottom_trailing = Some(i);
            }
            link(mesh, &mut previous, i);
        }

        if let Some(i) = mesh.add_triangle(up)? {
            let p = &mut mesh.panels[i];
            tagger.tag(p, pos, flap);
            p.leading = l + 1 == nx;
            p.trailing = grid.thick && l + 1 == 2 * nx;
            if p.trailing {
                top_trailing = Some(i);
            }
            link(mesh, &mut previous, i);
        }
    }

    if let (Some(b), Some(t)) = (bottom_trailing, top_trailing) {
        if grid.thick {
            mesh.panels[b].opposite = Some(t);
            mesh.panels[t].opposite = Some(b);
        }
    }

    Ok(start..mesh.panel_count())
}

/// Links a new panel to the previous panel of the same chordwise line.
fn link(mesh: &mut TriMesh, previous: &mut Option<usize>, i: usize) {
    if let Some(prev) = *previous {
        mesh.panels[prev].up = Some(i);
        mesh.panels[i].down = Some(prev);
    }
    *previous = Some(i);
}

/// Builds the triangles of a tip patch, ring strip by ring strip, and returns their range.  The
/// triangles touching the rear node or the leading edge node of each ring strip are null and
/// are skipped.
fn tip_patch(
    grid: &NodeGrid,
    tip: &TipNodes,
    left: bool,
    tagger: &Tagger,
    mesh: &mut TriMesh,
) -> Result<Range<usize>> {
    let start = mesh.panel_count();
    let nx = grid.nx;

    for is in 0..tip.strips {
        let mut previous = None;
        for l in 0..nx {
            let ta = grid.ring(tip, is, l);
            let la = grid.ring(tip, is, l + 1);
            let tb = grid.ring(tip, is + 1, l);
            let lb = grid.ring(tip, is + 1, l + 1);
            let tris = if left {
                [[ta, tb, lb], [ta, lb, la]]
            } else {
                [[lb, tb, ta], [la, lb, ta]]
            };

            for t in tris {
                if let Some(i) = mesh.add_triangle(t)? {
                    tagger.tag(&mut mesh.panels[i], SurfacePosition::Side, l < tagger.surface.nx_flap);
                    link(mesh, &mut previous, i);
                }
            }
        }
    }

    Ok(start..mesh.panel_count())
}

/// Triangulates every surface of a wing at the end of the arena, stitches adjacent surfaces
/// together and computes the node normals.  The arena is left with a partially built wing if an
/// error is returned, so callers should build into a scratch arena.
///
/// # Arguments
///
/// * `surfaces`: the surfaces of the wing, from the left tip to the right tip
/// * `mesh`: the arena receiving the nodes and panels
/// * `config`: the mesh configuration
///
/// returns: Result<MeshRange, Box<dyn Error, Global>>
pub fn triangulate_surfaces(surfaces: &[Surface], mesh: &mut TriMesh, config: &MeshConfig) -> Result<MeshRange> {
    if surfaces.is_empty() {
        return Err(Box::new(MeshError::NoSurfaces));
    }

    let first_panel = mesh.panel_count();
    let first_node = mesh.node_count();
    let mut range = MeshRange::default();
    for (i, s) in surfaces.iter().enumerate() {
        range.surfaces.push(triangulate_surface(s, i, mesh, config)?);
    }
    range.panels = first_panel..mesh.panel_count();
    range.nodes = first_node..mesh.node_count();
    set_wake_columns(mesh, &range);

    stitch_tri_surfaces(mesh, &mut range, surfaces, config)?;
    mesh.compute_node_normals(range.nodes.clone(), range.panels.clone());

    log::debug!(
        "triangulated {} surfaces into {} panels and {} nodes",
        surfaces.len(),
        range.panel_count(),
        range.node_count()
    );
    Ok(range)
}

/// Numbers the wake columns of a wing, one per strip, after the columns already used in the
/// arena.  Every trailing panel of a strip sheds into the column of the strip.
fn set_wake_columns(mesh: &mut TriMesh, range: &MeshRange) {
    let first = mesh.panels[..range.panels.start]
        .iter()
        .filter_map(|p| p.wake)
        .max()
        .map_or(0, |w| w + 1);
    for (column, strip) in range.strips().enumerate() {
        for p in mesh.panels[strip.clone()].iter_mut().filter(|p| p.trailing) {
            p.wake = Some(first + column);
        }
    }
}
