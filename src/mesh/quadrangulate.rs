//! Quadrilateral meshes of wing surfaces, built on the same node layout as the triangulation.

use super::grid::{NodeGrid, TipNodes};
use super::{MeshRange, QuadMesh, SurfacePanels, SurfacePosition, stitch_quad_surfaces};
use crate::Result;
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::wing::Surface;
use std::ops::Range;

/// Builds the quads of one surface at the end of the arena: left tip patch, strips, right tip
/// patch.  Thick strips hold the bottom panels from the trailing edge to the leading edge
/// followed by the top panels from the leading edge back to the trailing edge.
pub fn quadrangulate_surface(
    surface: &Surface,
    surface_index: usize,
    mesh: &mut QuadMesh,
    config: &MeshConfig,
) -> Result<SurfacePanels> {
    let grid = NodeGrid::build(surface, surface_index, &mut mesh.nodes, config);
    let first = mesh.panel_count();

    let left_tip = match &grid.left_tip {
        Some(tip) => tip_patch(surface, surface_index, &grid, tip, true, mesh)?,
        None => first..first,
    };

    let mut strips = Vec::with_capacity(surface.ny);
    for k in 0..surface.ny {
        strips.push(strip(surface, surface_index, &grid, k, mesh)?);
    }

    let after = mesh.panel_count();
    let right_tip = match &grid.right_tip {
        Some(tip) => tip_patch(surface, surface_index, &grid, tip, false, mesh)?,
        None => after..after,
    };

    let panels = first..mesh.panel_count();
    mesh.connect_side_edges(panels.clone());

    Ok(SurfacePanels {
        surface: surface_index,
        panels,
        strips,
        left_tip,
        right_tip,
        columns: grid.columns,
    })
}

fn strip(
    surface: &Surface,
    surface_index: usize,
    grid: &NodeGrid,
    k: usize,
    mesh: &mut QuadMesh,
) -> Result<Range<usize>> {
    let nx = grid.nx;
    let start = mesh.panel_count();

    let lines: Vec<(SurfacePosition, usize)> = if grid.thick {
        (0..nx)
            .map(|l| (SurfacePosition::Bottom, l))
            .chain((0..nx).rev().map(|l| (SurfacePosition::Top, l)))
            .collect()
    } else {
        (0..nx).map(|l| (SurfacePosition::Mid, l)).collect()
    };

    let mut previous: Option<usize> = None;
    for (pos, l) in lines {
        let la = grid.node(k, l + 1, pos);
        let lb = grid.node(k + 1, l + 1, pos);
        let mut ta = grid.node(k, l, pos);
        let mut tb = grid.node(k + 1, l, pos);
        if l == 0 {
            if let Some(tip) = grid.left_tip.filter(|_| k == 0) {
                ta = tip.rear;
            }
            if let Some(tip) = grid.right_tip.filter(|_| k + 1 == surface.ny) {
                tb = tip.rear;
            }
        }

        let frame = if pos.is_bottom() { [lb, la, tb, ta] } else { [la, lb, ta, tb] };
        let i = mesh.add_quad(frame)?;

        let te = (l == 0 && !pos.is_top()).then(|| {
            let (a, b) = (mesh.nodes[ta].position, mesh.nodes[tb].position);
            [surface.te_bisector(&a), surface.te_bisector(&b)]
        });

        let p = &mut mesh.panels[i];
        p.position = pos;
        p.surface = surface_index;
        p.surface_normal = surface.normal;
        p.left_wing = surface.is_left;
        p.in_sym_plane |= surface.in_sym_plane;
        p.trailing = l == 0;
        p.leading = l + 1 == nx;
        p.flap = surface.te_flap && l < surface.nx_flap;
        p.te_bisectors = te;

        link(mesh, &mut previous, i);
    }

    Ok(start..mesh.panel_count())
}

fn link(mesh: &mut QuadMesh, previous: &mut Option<usize>, i: usize) {
    if let Some(prev) = *previous {
        mesh.panels[prev].up = Some(i);
        mesh.panels[i].down = Some(prev);
    }
    *previous = Some(i);
}

fn tip_patch(
    surface: &Surface,
    surface_index: usize,
    grid: &NodeGrid,
    tip: &TipNodes,
    left: bool,
    mesh: &mut QuadMesh,
) -> Result<Range<usize>> {
    let start = mesh.panel_count();
    for is in 0..tip.strips {
        let mut previous = None;
        for l in 0..grid.nx {
            let (a, b) = if left { (is, is + 1) } else { (is + 1, is) };
            let frame = [
                grid.ring(tip, a, l + 1),
                grid.ring(tip, b, l + 1),
                grid.ring(tip, a, l),
                grid.ring(tip, b, l),
            ];
            let i = mesh.add_quad(frame)?;
            let p = &mut mesh.panels[i];
            p.position = SurfacePosition::Side;
            p.surface = surface_index;
            p.surface_normal = surface.normal;
            p.left_wing = surface.is_left;
            p.flap = surface.te_flap && l < surface.nx_flap;
            link(mesh, &mut previous, i);
        }
    }
    Ok(start..mesh.panel_count())
}

/// Builds the quads of every surface of a wing at the end of the arena, stitches adjacent
/// surfaces together and computes the node normals.
pub fn quadrangulate_surfaces(surfaces: &[Surface], mesh: &mut QuadMesh, config: &MeshConfig) -> Result<MeshRange> {
    if surfaces.is_empty() {
        return Err(Box::new(MeshError::NoSurfaces));
    }

    let first_panel = mesh.panel_count();
    let first_node = mesh.node_count();
    let mut range = MeshRange::default();
    for (i, s) in surfaces.iter().enumerate() {
        range.surfaces.push(quadrangulate_surface(s, i, mesh, config)?);
    }
    range.panels = first_panel..mesh.panel_count();
    range.nodes = first_node..mesh.node_count();
    set_wake_columns(mesh, &range);

    stitch_quad_surfaces(mesh, &mut range, surfaces, config)?;
    mesh.compute_node_normals(range.nodes.clone(), range.panels.clone());

    log::debug!(
        "built {} quads and {} nodes on {} surfaces",
        range.panel_count(),
        range.node_count(),
        surfaces.len()
    );
    Ok(range)
}

/// Numbers the wake columns of a wing, one per strip, after the columns already used in the
/// arena.  Every trailing panel of a strip sheds into the column of the strip.
fn set_wake_columns(mesh: &mut QuadMesh, range: &MeshRange) {
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
