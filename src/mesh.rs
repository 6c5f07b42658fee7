//! Panel meshes of wing surfaces.  The nodes and panels of every wing of a plane live in shared
//! arenas (`TriMesh`, `QuadMesh`); each wing only records the `MeshRange` of the arena it built.

mod grid;
mod node;
mod panel3;
mod panel4;
mod quad_mesh;
mod quadrangulate;
mod stitch;
mod tri_mesh;
mod triangulate;

use crate::geom3::{Vector3, normalized_or_zero};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub use node::Node;
pub use panel3::Panel3;
pub use panel4::Panel4;
pub use quad_mesh::QuadMesh;
pub use quadrangulate::{quadrangulate_surface, quadrangulate_surfaces};
pub use stitch::{
    connect_inner_surfaces, connect_quad_surfaces, connect_surface_to_next, stitch_quad_surfaces,
    stitch_tri_surfaces,
};
pub use tri_mesh::TriMesh;
pub use triangulate::{triangulate_surface, triangulate_surfaces};

/// Tags the part of the wing surface a node or a panel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfacePosition {
    Bottom,
    Mid,
    Top,

    /// The tip patch closing a side of a thick surface
    Side,

    /// Nodes which are not on a surface, such as the single trailing edge node of a tip patch
    #[default]
    None,
}

impl SurfacePosition {
    pub fn is_bottom(&self) -> bool {
        *self == SurfacePosition::Bottom
    }

    pub fn is_mid(&self) -> bool {
        *self == SurfacePosition::Mid
    }

    pub fn is_top(&self) -> bool {
        *self == SurfacePosition::Top
    }

    pub fn is_side(&self) -> bool {
        *self == SurfacePosition::Side
    }
}

/// The panels built for one surface.  `strips` holds one range per spanwise strip of the surface,
/// ordered like the stations of the wing, and excludes the tip patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfacePanels {
    pub surface: usize,
    pub panels: Range<usize>,
    pub strips: Vec<Range<usize>>,
    pub left_tip: Range<usize>,
    pub right_tip: Range<usize>,

    /// The first node of each spanwise column of nodes of the surface
    pub columns: Vec<usize>,
}

impl SurfacePanels {
    /// The panels of the first spanwise strip
    pub fn first_strip(&self) -> Range<usize> {
        self.strips.first().cloned().unwrap_or_default()
    }

    /// The panels of the last spanwise strip
    pub fn last_strip(&self) -> Range<usize> {
        self.strips.last().cloned().unwrap_or_default()
    }
}

/// The part of a shared mesh arena which belongs to one wing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshRange {
    pub panels: Range<usize>,
    pub nodes: Range<usize>,
    pub surfaces: Vec<SurfacePanels>,

    /// The first node of every column at which two surfaces meet or at which a surface ends,
    /// after stitching, ordered from the left tip to the right tip
    pub junction_nodes: Vec<usize>,
}

impl MeshRange {
    pub fn first_panel(&self) -> usize {
        self.panels.start
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn first_node(&self) -> usize {
        self.nodes.start
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The total number of spanwise strips, which is also the number of stations of the wing
    pub fn strip_count(&self) -> usize {
        self.surfaces.iter().map(|s| s.strips.len()).sum()
    }

    /// The panel ranges of every strip of the wing, in station order.
    pub fn strips(&self) -> impl Iterator<Item = &Range<usize>> + '_ {
        self.surfaces.iter().flat_map(|s| s.strips.iter())
    }

    /// Returns `true` if the panel index belongs to this range
    pub fn contains_panel(&self, index: usize) -> bool {
        self.panels.contains(&index)
    }
}

/// Sets the normal of every node in `range` to the normalized sum of the area weighted panel
/// normals referencing it.  `panels` yields the node indices of each panel together with its
/// normal multiplied by its area.  Nodes no panel references get a zero normal.
pub(crate) fn set_node_normals<'a, I>(nodes: &mut [Node], range: Range<usize>, panels: I)
where
    I: Iterator<Item = (&'a [usize], Vector3)>,
{
    let mut sums = vec![Vector3::zeros(); range.len()];
    for (refs, weighted) in panels {
        for &n in refs {
            if range.contains(&n) {
                sums[n - range.start] += weighted;
            }
        }
    }
    for (node, sum) in nodes[range].iter_mut().zip(sums) {
        node.normal = normalized_or_zero(&sum);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom3::Point3;
    use approx::assert_relative_eq;

    fn range() -> MeshRange {
        MeshRange {
            panels: 10..40,
            nodes: 5..25,
            surfaces: vec![
                SurfacePanels {
                    surface: 0,
                    panels: 10..22,
                    strips: vec![10..14, 14..18, 18..22],
                    ..Default::default()
                },
                SurfacePanels {
                    surface: 1,
                    panels: 22..40,
                    strips: vec![22..30, 30..40],
                    ..Default::default()
                },
            ],
            junction_nodes: vec![],
        }
    }

    #[test]
    fn counts_and_offsets() {
        let r = range();
        assert_eq!(r.first_panel(), 10);
        assert_eq!(r.panel_count(), 30);
        assert_eq!(r.first_node(), 5);
        assert_eq!(r.node_count(), 20);
        assert_eq!(r.strip_count(), 5);
        assert!(r.contains_panel(39));
        assert!(!r.contains_panel(40));
    }

    #[test]
    fn strips_are_in_station_order() {
        let r = range();
        let starts: Vec<usize> = r.strips().map(|s| s.start).collect();
        assert_eq!(starts, vec![10, 14, 18, 22, 30]);
        assert_eq!(r.surfaces[0].first_strip(), 10..14);
        assert_eq!(r.surfaces[1].last_strip(), 30..40);
    }

    #[test]
    fn empty_surface_strips() {
        let s = SurfacePanels::default();
        assert!(s.first_strip().is_empty());
        assert!(s.last_strip().is_empty());
    }

    #[test]
    fn node_normals_are_area_weighted() {
        let mut nodes = vec![Node::new(Point3::origin(), SurfacePosition::Top, 0); 4];
        let a = [0, 1, 2];
        let b = [1, 2];
        let panels = vec![(&a[..], Vector3::z() * 3.0), (&b[..], Vector3::x())];
        set_node_normals(&mut nodes, 0..3, panels.into_iter());

        assert_relative_eq!(nodes[0].normal, Vector3::z(), epsilon = 1.0e-12);
        let tilted = Vector3::new(1.0, 0.0, 3.0).normalize();
        assert_relative_eq!(nodes[1].normal, tilted, epsilon = 1.0e-12);
        assert_relative_eq!(nodes[2].normal, tilted, epsilon = 1.0e-12);

        // outside of the range
        assert_relative_eq!(nodes[3].normal, Vector3::zeros());
    }
}
