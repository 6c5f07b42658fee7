//! The nodes of one surface: spanwise columns of chordwise nodes, plus the rings of the tip
//! patches closing the sides of thick surfaces.  Both the triangular and the quadrilateral
//! meshes are built on this layout.
//!
//! A thick column holds 2nx+1 nodes, the bottom line from the trailing edge to the leading edge
//! followed by the top line from the node after the leading edge back to the trailing edge.  A
//! thin column holds the nx+1 nodes of the mid line.

use super::{Node, SurfacePosition};
use crate::config::MeshConfig;
use crate::geom3::{Point3, Vector3, lerp, normalized_or_zero};
use crate::wing::Surface;
use std::f64::consts::PI;

/// The nodes of a tip patch.  Rings run from the bottom line (0) to the top line (`strips`).
#[derive(Debug, Clone, Copy)]
pub struct TipNodes {
    /// The first node of the tip rings
    pub first: usize,

    /// The single trailing edge node shared by every ring
    pub rear: usize,

    /// The first node of the column closed by the patch
    pub column: usize,
    pub strips: usize,
}

#[derive(Debug, Clone)]
pub struct NodeGrid {
    pub nx: usize,
    pub thick: bool,

    /// The first node of each of the ny+1 columns
    pub columns: Vec<usize>,
    pub left_tip: Option<TipNodes>,
    pub right_tip: Option<TipNodes>,
}

impl NodeGrid {
    /// Creates the nodes of a surface at the end of `nodes`.  Left tip nodes come first, then
    /// the columns, then the right tip nodes.  The rear node of the left patch is its first tip
    /// node, the rear node of the right patch is the top trailing node of the last column.
    pub fn build(surface: &Surface, surface_index: usize, nodes: &mut Vec<Node>, config: &MeshConfig) -> Self {
        let nx = surface.nx;
        let thick = config.thick_surfaces;
        let strips = config.tip_strips();
        let left_patch = thick && surface.is_closed_left;
        let right_patch = thick && surface.is_closed_right;

        let left_first = nodes.len();
        if left_patch {
            push_tip_nodes(surface, surface_index, nodes, true, strips);
            nodes[left_first].surface_position = SurfacePosition::None;
        }

        let mut columns = Vec::with_capacity(surface.ny + 1);
        for k in 0..=surface.ny {
            let tau = if k == 0 { surface.y_dist(0).0 } else { surface.y_dist(k - 1).1 };
            columns.push(nodes.len());
            push_column(surface, surface_index, nodes, tau, thick);
        }
        let last_column = columns[surface.ny];

        let left_tip = left_patch.then(|| TipNodes {
            first: left_first,
            rear: left_first,
            column: columns[0],
            strips,
        });

        let right_tip = if right_patch {
            let rear = last_column + 2 * nx;
            nodes[rear].surface_position = SurfacePosition::None;
            let first = nodes.len();
            push_tip_nodes(surface, surface_index, nodes, false, strips);
            Some(TipNodes {
                first,
                rear,
                column: last_column,
                strips,
            })
        } else {
            None
        };

        Self {
            nx,
            thick,
            columns,
            left_tip,
            right_tip,
        }
    }

    /// The number of nodes in a column
    pub fn column_len(&self) -> usize {
        if self.thick { 2 * self.nx + 1 } else { self.nx + 1 }
    }

    /// The node at chordwise index `l` (from the trailing edge) of column `k`, on the given line.
    pub fn node(&self, k: usize, l: usize, pos: SurfacePosition) -> usize {
        match pos {
            SurfacePosition::Top if self.thick => self.columns[k] + 2 * self.nx - l,
            _ => self.columns[k] + l,
        }
    }

    /// The node of ring `is` of a tip patch at chordwise index `l`.  The trailing edge of every
    /// ring is the rear node, the leading edge is the leading node of the closed column, and the
    /// first and last rings reuse the bottom and top lines of that column.
    pub fn ring(&self, tip: &TipNodes, is: usize, l: usize) -> usize {
        if l == 0 {
            tip.rear
        } else if l == self.nx {
            tip.column + self.nx
        } else if is == 0 {
            tip.column + l
        } else if is == tip.strips {
            tip.column + 2 * self.nx - l
        } else {
            tip.first + is * (self.nx + 1) + l
        }
    }
}

fn push_column(surface: &Surface, surface_index: usize, nodes: &mut Vec<Node>, tau: f64, thick: bool) {
    let nx = surface.nx;
    if thick {
        for l in 0..=nx {
            let p = surface.node_at(l, tau, SurfacePosition::Bottom);
            nodes.push(Node::new(p, SurfacePosition::Bottom, surface_index));
        }
        for l in (0..nx).rev() {
            let p = surface.node_at(l, tau, SurfacePosition::Top);
            nodes.push(Node::new(p, SurfacePosition::Top, surface_index));
        }
    } else {
        for l in 0..=nx {
            let p = surface.node_at(l, tau, SurfacePosition::Mid);
            nodes.push(Node::new(p, SurfacePosition::Mid, surface_index));
        }
    }
}

/// Pushes the `(strips+1)·(nx+1)` nodes of a tip patch, ring by ring.  Each ring is a half
/// ellipse swept from the bottom line to the top line, bulging outward from the tip.
fn push_tip_nodes(surface: &Surface, surface_index: usize, nodes: &mut Vec<Node>, left: bool, strips: usize) {
    let tau = if left { 0.0 } else { 1.0 };
    let x = Vector3::x();
    let side = if left {
        x.cross(&surface.normal)
    } else {
        surface.normal.cross(&x)
    };
    let side = normalized_or_zero(&side);

    for is in 0..=strips {
        let theta = (strips - is) as f64 / strips as f64 * PI;
        let tag = if is == 0 {
            SurfacePosition::Bottom
        } else if is == strips {
            SurfacePosition::Top
        } else {
            SurfacePosition::Side
        };

        for l in 0..=surface.nx {
            let bot = surface.node_at(l, tau, SurfacePosition::Bottom);
            let top = surface.node_at(l, tau, SurfacePosition::Top);
            let c: Point3 = lerp(&bot, &top, 0.5);
            let r = (top - bot) / 2.0;
            let rad = r.norm();
            let p = c + normalized_or_zero(&r) * theta.cos() * rad + side * theta.sin() * rad;
            nodes.push(Node::new(p, tag, surface_index));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foil::{Foil, FoilDatabase};
    use crate::geom3::is_same;
    use crate::wing::{Placement, Wing, WingSection, WingType, create_surfaces};

    fn surfaces(config: &MeshConfig) -> Vec<Surface> {
        let db: FoilDatabase = vec![Foil::naca4("0012").unwrap()].into_iter().collect();
        let w = Wing::from_sections(
            "grid",
            WingType::Main,
            true,
            vec![
                WingSection::new(0.0, 0.3, 0.0).with_panels(4, 3).with_foil("NACA 0012"),
                WingSection::new(1.0, 0.2, 0.05).with_foil("NACA 0012"),
            ],
        );
        create_surfaces(&w, &Placement::default(), &db, config).unwrap()
    }

    #[test]
    fn thick_node_counts() {
        let c = MeshConfig {
            tip_strip_count: 2,
            ..MeshConfig::default()
        };
        let s = surfaces(&c);
        let mut nodes = Vec::new();
        let g = NodeGrid::build(&s[0], 0, &mut nodes, &c);
        assert!(g.left_tip.is_some());
        assert!(g.right_tip.is_none());
        assert_eq!(nodes.len(), 5 * 3 + 4 * 9);
        assert_eq!(g.columns[0], 15);
        assert_eq!(g.column_len(), 9);
    }

    #[test]
    fn thin_grid_has_no_tips() {
        let c = MeshConfig::thin();
        let s = surfaces(&c);
        let mut nodes = Vec::new();
        let g = NodeGrid::build(&s[1], 1, &mut nodes, &c);
        assert!(g.left_tip.is_none() && g.right_tip.is_none());
        assert_eq!(nodes.len(), 4 * 5);
        assert_eq!(g.node(2, 3, SurfacePosition::Mid), 13);
    }

    #[test]
    fn rings_close_on_the_column() {
        let c = MeshConfig {
            tip_strip_count: 3,
            ..MeshConfig::default()
        };
        let s = surfaces(&c);
        let mut nodes = Vec::new();
        let g = NodeGrid::build(&s[1], 1, &mut nodes, &c);
        let tip = g.right_tip.unwrap();
        let k = g.columns.len() - 1;
        for l in 1..g.nx {
            assert_eq!(g.ring(&tip, 0, l), g.node(k, l, SurfacePosition::Bottom));
            assert_eq!(g.ring(&tip, 3, l), g.node(k, l, SurfacePosition::Top));
        }
        assert_eq!(g.ring(&tip, 1, 0), tip.rear);
        assert_eq!(g.ring(&tip, 2, g.nx), g.node(k, g.nx, SurfacePosition::Bottom));
        assert_eq!(nodes[tip.rear].surface_position, SurfacePosition::None);
    }

    #[test]
    fn middle_rings_bulge_outward() {
        let c = MeshConfig {
            tip_strip_count: 2,
            ..MeshConfig::default()
        };
        let s = surfaces(&c);
        let mut nodes = Vec::new();
        let g = NodeGrid::build(&s[0], 0, &mut nodes, &c);
        let tip = g.left_tip.unwrap();
        let l = 2;
        let mid = nodes[g.ring(&tip, 1, l)].position;
        let bot = nodes[g.node(0, l, SurfacePosition::Bottom)].position;
        assert!(mid.y < bot.y);

        // the tip rings end exactly on the bottom and top lines of the closed column
        let first_ring = nodes[tip.first + l].position;
        assert!(is_same(&first_ring, &bot, 1.0e-12));
    }
}
