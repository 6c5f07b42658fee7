use super::{Node, Panel4, set_node_normals};
use crate::Result;
use crate::errors::MeshError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;

/// The arena of nodes and quadrilateral panels shared by every wing of a plane.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadMesh {
    pub nodes: Vec<Node>,
    pub panels: Vec<Panel4>,
}

impl QuadMesh {
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

    pub fn panel(&self, index: usize) -> Result<&Panel4> {
        let len = self.panels.len();
        self.panels
            .get(index)
            .ok_or_else(|| MeshError::PanelIndexOutOfBounds { index, len }.into())
    }

    pub fn panel_mut(&mut self, index: usize) -> Result<&mut Panel4> {
        let len = self.panels.len();
        self.panels
            .get_mut(index)
            .ok_or_else(|| MeshError::PanelIndexOutOfBounds { index, len }.into())
    }

    /// Creates the quad joining four existing nodes, given in the order la, lb, ta, tb, and
    /// appends it to the arena.
    pub fn add_quad(&mut self, nodes: [usize; 4]) -> Result<usize> {
        let len = self.nodes.len();
        if let Some(&bad) = nodes.iter().find(|&&n| n >= len) {
            return Err(Box::new(MeshError::PanelIndexOutOfBounds { index: bad, len }));
        }

        let mut p = Panel4::new(nodes.map(|n| self.nodes[n].position), nodes);
        p.index = self.panels.len();
        self.panels.push(p);
        Ok(self.panels.len() - 1)
    }

    /// Sets the left and right neighbours of the panels in `range` which share a side edge, by
    /// node index.
    pub fn connect_side_edges(&mut self, range: Range<usize>) {
        let mut edges: HashMap<(usize, usize), Vec<(usize, bool)>> = HashMap::new();
        for i in range.clone() {
            let p = &self.panels[i];
            for (edge, is_right) in [(p.edge_a(), false), (p.edge_b(), true)] {
                let (a, b) = edge;
                if a != b {
                    edges.entry((a.min(b), a.max(b))).or_default().push((i, is_right));
                }
            }
        }

        for users in edges.values() {
            if let [(p0, r0), (p1, r1)] = users[..] {
                self.set_side(p0, r0, p1);
                self.set_side(p1, r1, p0);
            }
        }
    }

    pub(crate) fn set_side(&mut self, panel: usize, right: bool, other: usize) {
        if right {
            self.panels[panel].right = Some(other);
        } else {
            self.panels[panel].left = Some(other);
        }
    }

    /// Computes the normals of the nodes in `nodes` from the panels in `panels`, weighted by
    /// panel area.
    pub fn compute_node_normals(&mut self, nodes: Range<usize>, panels: Range<usize>) {
        let weighted = self.panels[panels].iter().map(|p| (&p.nodes[..], p.normal * p.area));
        set_node_normals(&mut self.nodes, nodes, weighted);
    }

    /// The indices of the panels with a side or chordwise link which is not returned by the
    /// neighbour.
    pub fn asymmetric_neighbours(&self) -> Vec<usize> {
        let links_back = |q: usize, p: usize, side: bool| {
            self.panels.get(q).is_some_and(|o| {
                if side {
                    o.left == Some(p) || o.right == Some(p)
                } else {
                    o.up == Some(p) || o.down == Some(p)
                }
            })
        };

        self.panels
            .iter()
            .filter(|p| {
                let sides = [p.left, p.right].into_iter().flatten().any(|q| !links_back(q, p.index, true));
                let chord = [p.up, p.down].into_iter().flatten().any(|q| !links_back(q, p.index, false));
                sides || chord
            })
            .map(|p| p.index)
            .collect()
    }

    pub fn total_area(&self, range: Range<usize>) -> f64 {
        self.panels[range].iter().map(|p| p.area).sum()
    }
}
