//! Connections between the panels of adjacent surfaces.
//!
//! Adjacent surfaces are built independently, so the nodes of their shared side are duplicated.
//! Stitching matches the panels on either side of the junction by vertex coincidence, re-points
//! the nodes of the right hand panel onto the nodes of the left hand panel and records the
//! neighbour relation on both panels.

use super::{MeshRange, QuadMesh, TriMesh};
use crate::Result;
use crate::config::MeshConfig;
use crate::errors::MeshError;
use crate::geom3::is_same;
use crate::wing::Surface;
use std::ops::Range;

/// Returns `true` if the right side of `left` and the left side of `right` are meant to share
/// their nodes.
fn joined(left: &Surface, right: &Surface) -> bool {
    if left.is_closed_right || right.is_closed_left {
        return false;
    }
    if left.is_center && right.is_center && left.is_left && !right.is_left {
        return left.join_right;
    }
    true
}

fn check_range(range: &Range<usize>, len: usize) -> Result<()> {
    if range.end > len {
        return Err(Box::new(MeshError::PanelIndexOutOfBounds { index: range.end - 1, len }));
    }
    Ok(())
}

/// The last strip of surface `is` and the first strip of surface `is + 1`
fn junction_strips(range: &MeshRange, surfaces: &[Surface], is: usize) -> Result<(Range<usize>, Range<usize>)> {
    let count = range.surfaces.len().min(surfaces.len());
    if is + 1 >= count {
        return Err(Box::new(MeshError::SurfaceIndexOutOfBounds(is + 1)));
    }
    Ok((range.surfaces[is].last_strip(), range.surfaces[is + 1].first_strip()))
}

/// Matches the triangles of two strips.  Returns the number of edges connected.
fn connect_tri_strips(
    mesh: &mut TriMesh,
    left: Range<usize>,
    right: Range<usize>,
    tolerance: f64,
    connect_flaps: bool,
) -> Result<usize> {
    check_range(&left, mesh.panel_count())?;
    check_range(&right, mesh.panel_count())?;

    let mut connections = 0;
    for nr in right {
        for nl in left.clone() {
            let (pl, pr) = (&mesh.panels[nl], &mesh.panels[nr]);
            if pl.position != pr.position || (!connect_flaps && (pl.flap || pr.flap)) {
                continue;
            }

            // each vertex of the right panel matches at most one vertex of the left panel
            let mut matches: Vec<(usize, usize)> = Vec::with_capacity(2);
            let mut used = [false; 3];
            for vr in 0..3 {
                let r = mesh.nodes[pr.nodes[vr]].position;
                let found = (0..3).find(|&vl| !used[vl] && is_same(&mesh.nodes[pl.nodes[vl]].position, &r, tolerance));
                if let Some(vl) = found {
                    used[vl] = true;
                    matches.push((vl, vr));
                    if matches.len() == 2 {
                        break;
                    }
                }
            }

            // a single coincident vertex is a corner contact, not a shared edge
            if let [(vl0, vr0), (vl1, vr1)] = matches[..] {
                let left_nodes = pl.nodes;
                mesh.panels[nr].nodes[vr0] = left_nodes[vl0];
                mesh.panels[nr].nodes[vr1] = left_nodes[vl1];
                mesh.panels[nl].neighbours[3 - vl0 - vl1] = Some(nr);
                mesh.panels[nr].neighbours[3 - vr0 - vr1] = Some(nl);
                connections += 1;
                break;
            }
        }
    }
    Ok(connections)
}

/// Connects the last strip of surface `is` to the first strip of surface `is + 1`.  Panels are
/// only matched with panels of the same surface position, and flap panels are skipped unless
/// `connect_flaps` is set.  Nothing is connected if either side of the junction is closed.
///
/// # Arguments
///
/// * `mesh`: the arena holding the panels of both surfaces
/// * `range`: the panels of the wing
/// * `surfaces`: the surfaces of the wing
/// * `is`: the index of the left hand surface
/// * `tolerance`: the vertex coincidence tolerance
/// * `connect_flaps`: whether flap panels take part in the matching
///
/// returns: Result<usize, Box<dyn Error, Global>>, the number of edges connected
pub fn connect_surface_to_next(
    mesh: &mut TriMesh,
    range: &MeshRange,
    surfaces: &[Surface],
    is: usize,
    tolerance: f64,
    connect_flaps: bool,
) -> Result<usize> {
    let (left, right) = junction_strips(range, surfaces, is)?;
    if surfaces[is].is_closed_right || surfaces[is + 1].is_closed_left {
        return Ok(0);
    }
    connect_tri_strips(mesh, left, right, tolerance, connect_flaps)
}

/// Connects the left and the right center surfaces across the symmetry plane.  Every panel of
/// the junction strips takes part, flaps included.
pub fn connect_inner_surfaces(
    mesh: &mut TriMesh,
    range: &MeshRange,
    surfaces: &[Surface],
    tolerance: f64,
) -> Result<usize> {
    let is = surfaces
        .iter()
        .position(|s| s.is_center && s.is_left)
        .ok_or(MeshError::SurfaceIndexOutOfBounds(surfaces.len()))?;
    let (left, right) = junction_strips(range, surfaces, is)?;
    connect_tri_strips(mesh, left, right, tolerance, true)
}

/// Connects the last quad strip of surface `is` to the first quad strip of surface `is + 1` by
/// matching their side edges, leading corner to leading corner and trailing corner to trailing
/// corner.
pub fn connect_quad_surfaces(
    mesh: &mut QuadMesh,
    range: &MeshRange,
    surfaces: &[Surface],
    is: usize,
    tolerance: f64,
    connect_flaps: bool,
) -> Result<usize> {
    let (left, right) = junction_strips(range, surfaces, is)?;
    if surfaces[is].is_closed_right || surfaces[is + 1].is_closed_left {
        return Ok(0);
    }
    check_range(&left, mesh.panel_count())?;
    check_range(&right, mesh.panel_count())?;

    let same = |mesh: &QuadMesh, a: usize, b: usize| is_same(&mesh.nodes[a].position, &mesh.nodes[b].position, tolerance);

    let mut connections = 0;
    'right: for nr in right {
        for nl in left.clone() {
            let (pl, pr) = (&mesh.panels[nl], &mesh.panels[nr]);
            if pl.position != pr.position || (!connect_flaps && (pl.flap || pr.flap)) {
                continue;
            }

            let left_edges = [(pl.edge_a(), false), (pl.edge_b(), true)];
            let right_edges = [(pr.edge_a(), false), (pr.edge_b(), true)];
            for (er, r_is_b) in right_edges {
                for (el, l_is_b) in left_edges {
                    if !(same(mesh, el.0, er.0) && same(mesh, el.1, er.1)) {
                        continue;
                    }
                    for n in mesh.panels[nr].nodes.iter_mut() {
                        if *n == er.0 {
                            *n = el.0;
                        } else if *n == er.1 {
                            *n = el.1;
                        }
                    }
                    mesh.set_side(nl, l_is_b, nr);
                    mesh.set_side(nr, r_is_b, nl);
                    connections += 1;
                    continue 'right;
                }
            }
        }
    }
    Ok(connections)
}

/// Records the first node of every column at which surfaces meet or end, after stitching.
fn fill_junction_nodes(range: &mut MeshRange, surfaces: &[Surface]) {
    let mut nodes = Vec::with_capacity(range.surfaces.len() + 1);
    for (is, (sp, s)) in range.surfaces.iter().zip(surfaces).enumerate() {
        let (Some(&first), Some(&last)) = (sp.columns.first(), sp.columns.last()) else {
            continue;
        };
        if is == 0 || !joined(&surfaces[is - 1], s) {
            nodes.push(first);
        }
        nodes.push(last);
    }
    range.junction_nodes = nodes;
}

fn warn_unmatched(connections: usize, range: &MeshRange, is: usize) {
    if connections == 0 && !range.surfaces[is + 1].first_strip().is_empty() {
        log::warn!("no panel of surface {} was connected to surface {}", is + 1, is);
    }
}

/// Stitches every pair of adjacent triangulated surfaces of a wing, then records the junction
/// nodes of the range.
pub fn stitch_tri_surfaces(
    mesh: &mut TriMesh,
    range: &mut MeshRange,
    surfaces: &[Surface],
    config: &MeshConfig,
) -> Result<()> {
    for is in 0..surfaces.len().saturating_sub(1) {
        let (sl, sr) = (&surfaces[is], &surfaces[is + 1]);
        if !joined(sl, sr) {
            continue;
        }
        let connections = if sl.is_center && sr.is_center && sl.is_left && !sr.is_left {
            connect_inner_surfaces(mesh, range, surfaces, config.center_stitch_tolerance)?
        } else {
            connect_surface_to_next(mesh, range, surfaces, is, config.stitch_tolerance, config.connect_flaps)?
        };
        warn_unmatched(connections, range, is);
    }
    fill_junction_nodes(range, surfaces);
    Ok(())
}

/// Stitches every pair of adjacent quad surfaces of a wing, then records the junction nodes of
/// the range.
pub fn stitch_quad_surfaces(
    mesh: &mut QuadMesh,
    range: &mut MeshRange,
    surfaces: &[Surface],
    config: &MeshConfig,
) -> Result<()> {
    for is in 0..surfaces.len().saturating_sub(1) {
        let (sl, sr) = (&surfaces[is], &surfaces[is + 1]);
        if !joined(sl, sr) {
            continue;
        }
        let center = sl.is_center && sr.is_center && sl.is_left && !sr.is_left;
        let (tolerance, flaps) = if center {
            (config.center_stitch_tolerance, true)
        } else {
            (config.stitch_tolerance, config.connect_flaps)
        };
        let connections = connect_quad_surfaces(mesh, range, surfaces, is, tolerance, flaps)?;
        warn_unmatched(connections, range, is);
    }
    fill_junction_nodes(range, surfaces);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foil::{Foil, FoilDatabase};
    use crate::geom3::Point3;
    use crate::mesh::{Node, SurfacePosition, quadrangulate_surface, triangulate_surface, triangulate_surfaces};
    use crate::wing::{Placement, Wing, WingSection, WingType};

    fn foils() -> FoilDatabase {
        vec![
            Foil::naca4("0012").unwrap(),
            Foil::new("flapped", 0.0, 0.0, 0.12).with_te_flap(0.7),
        ]
        .into_iter()
        .collect()
    }

    /// A one sided wing with a kink: the outer surface (ny = 3) comes first, then the inner one
    fn kinked(foil: &str) -> Vec<Surface> {
        let w = Wing::from_sections(
            "kinked",
            WingType::Main,
            false,
            vec![
                WingSection::new(0.0, 0.3, 0.0).with_panels(4, 2).with_foil(foil),
                WingSection::new(0.4, 0.25, 0.02).with_panels(4, 3).with_dihedral(5.0).with_foil(foil),
                WingSection::new(0.9, 0.15, 0.08).with_foil(foil),
            ],
        );
        w.rebuilt(&Placement::default(), &foils(), &MeshConfig::thin())
            .unwrap()
            .surfaces()
            .to_vec()
    }

    fn unstitched_tris(surfaces: &[Surface], config: &MeshConfig) -> (TriMesh, MeshRange) {
        let mut mesh = TriMesh::new();
        let mut range = MeshRange::default();
        for (i, s) in surfaces.iter().enumerate() {
            range.surfaces.push(triangulate_surface(s, i, &mut mesh, config).unwrap());
        }
        range.panels = 0..mesh.panel_count();
        range.nodes = 0..mesh.node_count();
        (mesh, range)
    }

    #[test]
    fn kinked_surfaces_are_connected() {
        let config = MeshConfig::thin();
        let surfaces = kinked("NACA 0012");
        let (mut mesh, range) = unstitched_tris(&surfaces, &config);
        let n = connect_surface_to_next(&mut mesh, &range, &surfaces, 0, config.stitch_tolerance, true).unwrap();

        // one triangle of each strip quad touches the junction
        assert_eq!(n, 4);
        assert!(mesh.asymmetric_neighbours().is_empty());

        // the right hand panels now use the nodes of the left hand column
        let column = range.surfaces[0].columns[3];
        for p in &mesh.panels[range.surfaces[1].first_strip()] {
            for &node in &p.nodes {
                assert!(node < range.surfaces[1].columns[0] || node >= range.surfaces[1].columns[1]);
            }
        }
        let shared = mesh.panels[range.surfaces[1].first_strip()]
            .iter()
            .flat_map(|p| p.nodes)
            .filter(|&node| (column..column + 5).contains(&node))
            .count();
        assert!(shared > 0);
    }

    #[test]
    fn flaps_are_left_apart_on_request() {
        let config = MeshConfig::thin();
        let surfaces = kinked("flapped");
        assert!(surfaces.iter().all(|s| s.te_flap && s.nx_flap > 0));
        let (mut mesh, range) = unstitched_tris(&surfaces, &config);
        let n = connect_surface_to_next(&mut mesh, &range, &surfaces, 0, config.stitch_tolerance, false).unwrap();
        assert_eq!(n, 4 - surfaces[0].nx_flap);
        for p in &mesh.panels[range.surfaces[0].last_strip()] {
            if p.flap {
                assert!(p.neighbours.iter().flatten().all(|&q| range.surfaces[0].panels.contains(&q)));
            }
        }
    }

    #[test]
    fn bad_indices_are_errors() {
        let config = MeshConfig::thin();
        let surfaces = kinked("NACA 0012");
        let (mut mesh, mut range) = unstitched_tris(&surfaces, &config);
        let e = connect_surface_to_next(&mut mesh, &range, &surfaces, 1, 1e-4, true).unwrap_err();
        assert_eq!(e.downcast_ref::<MeshError>(), Some(&MeshError::SurfaceIndexOutOfBounds(2)));

        range.surfaces[1].strips[0] = 1000..1010;
        let e = connect_surface_to_next(&mut mesh, &range, &surfaces, 0, 1e-4, true).unwrap_err();
        assert!(matches!(
            e.downcast_ref::<MeshError>(),
            Some(MeshError::PanelIndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn quad_strips_are_connected() {
        let config = MeshConfig::thin();
        let surfaces = kinked("NACA 0012");
        let mut mesh = QuadMesh::new();
        let mut range = MeshRange::default();
        for (i, s) in surfaces.iter().enumerate() {
            range.surfaces.push(quadrangulate_surface(s, i, &mut mesh, &config).unwrap());
        }
        range.panels = 0..mesh.panel_count();
        let n = connect_quad_surfaces(&mut mesh, &range, &surfaces, 0, config.stitch_tolerance, true).unwrap();
        assert_eq!(n, 4);
        for p in &mesh.panels[range.surfaces[0].last_strip()] {
            assert!(p.right.is_some());
        }
        for p in &mesh.panels[range.surfaces[1].first_strip()] {
            assert!(p.left.is_some());
        }
        assert!(mesh.asymmetric_neighbours().is_empty());
    }

    #[test]
    fn junction_nodes_after_stitching() {
        let config = MeshConfig::thin();
        let surfaces = kinked("NACA 0012");
        let (mut mesh, mut range) = unstitched_tris(&surfaces, &config);
        stitch_tri_surfaces(&mut mesh, &mut range, &surfaces, &config).unwrap();
        let expected = vec![
            range.surfaces[0].columns[0],
            range.surfaces[0].columns[3],
            range.surfaces[1].columns[2],
        ];
        assert_eq!(range.junction_nodes, expected);
    }

    #[test]
    fn center_surfaces_are_joined() {
        let w = Wing::from_sections(
            "rect",
            WingType::Main,
            true,
            vec![
                WingSection::new(0.0, 0.2, 0.0).with_panels(3, 2).with_foil("flapped"),
                WingSection::new(0.5, 0.2, 0.0).with_foil("flapped"),
            ],
        );
        let config = MeshConfig {
            connect_flaps: false,
            ..MeshConfig::thin()
        };
        let w = w.rebuilt(&Placement::default(), &foils(), &config).unwrap();
        let surfaces = w.surfaces();
        assert!(joined(&surfaces[0], &surfaces[1]));
        let (mut mesh, range) = unstitched_tris(surfaces, &config);

        // flaps are always joined across the symmetry plane
        let n = connect_inner_surfaces(&mut mesh, &range, surfaces, config.center_stitch_tolerance).unwrap();
        assert_eq!(n, 3);
    }

    #[test]
    fn thick_dihedral_wing_is_closed_across_its_junctions() {
        let config = MeshConfig::default();
        let w = Wing::from_sections(
            "dihedral",
            WingType::Main,
            true,
            vec![
                WingSection::new(0.0, 0.3, 0.0).with_panels(4, 2).with_foil("NACA 0012"),
                WingSection::new(0.4, 0.25, 0.02).with_panels(4, 3).with_dihedral(5.0).with_foil("NACA 0012"),
                WingSection::new(0.9, 0.15, 0.08).with_foil("NACA 0012"),
            ],
        );
        let w = w.rebuilt(&Placement::default(), &foils(), &config).unwrap();
        let surfaces = w.surfaces();
        assert_eq!(surfaces.len(), 4);
        let mut mesh = TriMesh::new();
        let range = triangulate_surfaces(surfaces, &mut mesh, &config).unwrap();

        // the trailing edge lines are the only open edges left
        assert!(mesh.asymmetric_neighbours().is_empty());
        assert_eq!(mesh.free_edge_count(range.panels.clone()), 2 * range.strip_count());

        // one triangle of each bottom and top quad of the junction strips crosses each junction
        for is in 0..surfaces.len() - 1 {
            let next = range.surfaces[is + 1].panels.clone();
            let crossing = mesh.panels[range.surfaces[is].last_strip()]
                .iter()
                .filter(|p| p.neighbours.iter().flatten().any(|q| next.contains(q)))
                .count();
            assert_eq!(crossing, 2 * 4, "junction {}", is);
        }

        // the duplicated root column of the right surface is no longer used
        let center = surfaces.iter().position(|s| s.is_center && s.is_left).unwrap();
        let right = &range.surfaces[center + 1];
        let orphans = right.columns[0]..right.columns[1];
        assert!(mesh.panels[range.panels.clone()].iter().all(|p| p.nodes.iter().all(|n| !orphans.contains(n))));

        let root = *range.surfaces[center].columns.last().unwrap();
        assert!(range.junction_nodes.contains(&root));
        for l in 0..9 {
            let (a, b) = (&mesh.nodes[root + l].position, &mesh.nodes[right.columns[0] + l].position);
            assert!(a.y.abs() < config.center_stitch_tolerance);
            assert!(is_same(a, b, config.center_stitch_tolerance));
        }
    }

    fn two_triangles(right: [(f64, f64); 3]) -> TriMesh {
        let mut mesh = TriMesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)].into_iter().chain(right) {
            mesh.nodes.push(Node::new(Point3::new(x, y, 0.0), SurfacePosition::Mid, 0));
        }
        mesh.add_triangle([0, 1, 2]).unwrap();
        mesh.add_triangle([3, 4, 5]).unwrap();
        mesh
    }

    #[test]
    fn corner_contact_is_not_an_edge() {
        let mut mesh = two_triangles([(1.0, 0.0), (2.0, 0.0), (2.0, 1.0)]);
        let n = connect_tri_strips(&mut mesh, 0..1, 1..2, 1.0e-4, true).unwrap();
        assert_eq!(n, 0);
        assert_eq!(mesh.panels[1].nodes, [3, 4, 5]);
        assert_eq!(mesh.panels[1].neighbour_count(), 0);
    }

    #[test]
    fn shared_edge_takes_the_left_nodes() {
        let mut mesh = two_triangles([(1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let n = connect_tri_strips(&mut mesh, 0..1, 1..2, 1.0e-4, true).unwrap();
        assert_eq!(n, 1);
        assert_eq!(mesh.panels[1].nodes, [1, 4, 2]);
        assert_eq!(mesh.panels[0].neighbours[0], Some(1));
        assert_eq!(mesh.panels[1].neighbours[1], Some(0));
    }
}
