use super::{Node, Panel3, set_node_normals};
use crate::Result;
use crate::errors::MeshError;
use crate::geom3::Point3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// The arena of nodes and triangular panels shared by every wing of a plane.  The index of a
/// panel is always its position in `panels`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriMesh {
    pub nodes: Vec<Node>,
    pub panels: Vec<Panel3>,
}

impl TriMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn panel_count(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.panels.clear();
    }

    pub fn panel(&self, index: usize) -> Result<&Panel3> {
        let len = self.panels.len();
        self.panels
            .get(index)
            .ok_or_else(|| MeshError::PanelIndexOutOfBounds { index, len }.into())
    }

    pub fn panel_mut(&mut self, index: usize) -> Result<&mut Panel3> {
        let len = self.panels.len();
        self.panels
            .get_mut(index)
            .ok_or_else(|| MeshError::PanelIndexOutOfBounds { index, len }.into())
    }

    /// The positions of the three vertices of a panel
    pub fn vertices(&self, panel: &Panel3) -> [Point3; 3] {
        panel.nodes.map(|n| self.nodes[n].position)
    }

    /// Creates the triangle joining three existing nodes and appends it to the arena.  Returns
    /// the index of the new panel, or `None` if the triangle is null and was skipped.
    pub fn add_triangle(&mut self, nodes: [usize; 3]) -> Result<Option<usize>> {
        let len = self.nodes.len();
        if let Some(&bad) = nodes.iter().find(|&&n| n >= len) {
            return Err(Box::new(MeshError::PanelIndexOutOfBounds { index: bad, len }));
        }

        let vertices = nodes.map(|n| self.nodes[n].position);
        Ok(Panel3::new(vertices, nodes).map(|mut p| {
            p.index = self.panels.len();
            self.panels.push(p);
            self.panels.len() - 1
        }))
    }

    /// Sets the neighbours of the panels in `range` which share an edge, by node index.  An edge
    /// shared by more than two panels is left unconnected.
    pub fn connect_edges(&mut self, range: Range<usize>) {
        let mut edges: HashMap<(usize, usize), Vec<(usize, usize)>> = HashMap::new();
        for i in range.clone() {
            for e in 0..3 {
                let (a, b) = self.panels[i].edge(e);
                if a != b {
                    edges.entry((a.min(b), a.max(b))).or_default().push((i, e));
                }
            }
        }

        for users in edges.values() {
            if let [(p0, e0), (p1, e1)] = users[..] {
                self.panels[p0].neighbours[e0] = Some(p1);
                self.panels[p1].neighbours[e1] = Some(p0);
            }
        }
    }

    /// Computes the normals of the nodes in `nodes` as the normalized, area weighted sum of the
    /// normals of the panels in `panels` which reference them.
    pub fn compute_node_normals(&mut self, nodes: Range<usize>, panels: Range<usize>) {
        let weighted = self.panels[panels].iter().map(|p| (&p.nodes[..], p.normal * p.area));
        set_node_normals(&mut self.nodes, nodes, weighted);
    }

    /// The indices of the panels with a neighbour link which is not returned by the neighbour,
    /// or which points outside of the arena.
    pub fn asymmetric_neighbours(&self) -> Vec<usize> {
        self.panels
            .iter()
            .filter(|p| {
                p.neighbours
                    .iter()
                    .flatten()
                    .any(|&q| self.panels.get(q).is_none_or(|other| !other.is_neighbour(p.index)))
            })
            .map(|p| p.index)
            .collect()
    }

    /// The number of panel edges in `range` which have no neighbour
    pub fn free_edge_count(&self, range: Range<usize>) -> usize {
        self.panels[range]
            .iter()
            .map(|p| p.neighbours.iter().filter(|n| n.is_none()).count())
            .sum()
    }

    pub fn total_area(&self, range: Range<usize>) -> f64 {
        self.panels[range].iter().map(|p| p.area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom3::Vector3;
    use crate::mesh::SurfacePosition;
    use approx::assert_relative_eq;

    /// Two triangles forming the unit square, plus a dangling node
    fn square() -> TriMesh {
        let mut m = TriMesh::new();
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (5.0, 5.0)] {
            m.nodes.push(Node::new(Point3::new(x, y, 0.0), SurfacePosition::Mid, 0));
        }
        m.add_triangle([0, 1, 2]).unwrap();
        m.add_triangle([0, 2, 3]).unwrap();
        m
    }

    #[test]
    fn indices_follow_arena_positions() {
        let m = square();
        assert_eq!(m.panel_count(), 2);
        assert_eq!(m.panels[1].index, 1);
        assert_relative_eq!(m.total_area(0..2), 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn null_triangle_is_skipped() {
        let mut m = square();
        let r = m.add_triangle([0, 1, 1]).unwrap();
        assert!(r.is_none());
        assert_eq!(m.panel_count(), 2);
    }

    #[test]
    fn out_of_bounds_node_is_an_error() {
        let mut m = square();
        let e = m.add_triangle([0, 1, 9]).unwrap_err();
        assert_eq!(
            e.downcast_ref::<MeshError>(),
            Some(&MeshError::PanelIndexOutOfBounds { index: 9, len: 5 })
        );
        assert!(m.panel(7).is_err());
    }

    #[test]
    fn shared_edge_is_connected() {
        let mut m = square();
        m.connect_edges(0..2);
        // edge 1 of panel 0 is (2, 0), edge 2 of panel 1 is (0, 2)
        assert_eq!(m.panels[0].neighbours, [None, Some(1), None]);
        assert_eq!(m.panels[1].neighbours, [None, None, Some(0)]);
        assert!(m.asymmetric_neighbours().is_empty());
        assert_eq!(m.free_edge_count(0..2), 4);
    }

    #[test]
    fn asymmetric_links_are_reported() {
        let mut m = square();
        m.panels[0].neighbours[0] = Some(1);
        assert_eq!(m.asymmetric_neighbours(), vec![0]);
    }

    #[test]
    fn node_normals() {
        let mut m = square();
        m.compute_node_normals(0..5, 0..2);
        assert_relative_eq!(m.nodes[0].normal, Vector3::z(), epsilon = 1.0e-12);
        assert_relative_eq!(m.nodes[3].normal, Vector3::z(), epsilon = 1.0e-12);
        assert_relative_eq!(m.nodes[4].normal, Vector3::zeros());
    }
}
