use glam::Vec2;
use petgraph::{algo::connected_components, graph::UnGraph};

use crate::error::PulseError;

/// A junction on the board. Its position never changes after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub position: Vec2,
    /// Indices of directly connected nodes, in either direction.
    pub neighbors: Vec<usize>,
}

/// A trace between two junctions.
///
/// Pulses travel from `from` to `to`, advancing `speed` progress-units per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub speed: f32,
}

impl Edge {
    pub fn new(from: usize, to: usize, speed: f32) -> Self {
        Self { from, to, speed }
    }
}

/// Immutable node and edge set of a circuit board.
///
/// Edge indices are creation order. The topology also keeps, per node, the
/// indices of the edges leaving it so a trigger only touches its own edges.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<usize>>,
}

impl Topology {
    /// A topology without nodes, used for degenerate surfaces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assembles a topology from node positions and edges, validating every
    /// edge endpoint and speed.
    ///
    /// Edges may point in any direction here. Boards from `GraphBuilder`
    /// always point from lower to higher index, which keeps cascades finite;
    /// hand-made cycles can pulse forever.
    pub fn from_parts(positions: Vec<Vec2>, edges: Vec<Edge>) -> Result<Self, PulseError> {
        let len = positions.len();
        for (i, edge) in edges.iter().enumerate() {
            if edge.from >= len || edge.to >= len {
                return Err(PulseError::EdgeOutOfRange {
                    from: edge.from,
                    to: edge.to,
                    len,
                });
            }
            if edge.from == edge.to {
                return Err(PulseError::SelfLoop(edge.from));
            }
            if !(edge.speed.is_finite() && edge.speed > 0.0) {
                return Err(PulseError::InvalidSpeed {
                    edge: i,
                    speed: edge.speed,
                });
            }
        }
        Ok(Self::assemble(positions, edges))
    }

    /// Derives neighbor and outgoing lists. Endpoints must already be valid.
    pub(crate) fn assemble(positions: Vec<Vec2>, edges: Vec<Edge>) -> Self {
        let mut nodes: Vec<Node> = positions
            .into_iter()
            .map(|position| Node {
                position,
                neighbors: vec![],
            })
            .collect();
        let mut outgoing = vec![vec![]; nodes.len()];

        for (i, edge) in edges.iter().enumerate() {
            nodes[edge.from].neighbors.push(edge.to);
            nodes[edge.to].neighbors.push(edge.from);
            outgoing[edge.from].push(i);
        }

        Self {
            nodes,
            edges,
            outgoing,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of the edges whose source is `node`, in creation order.
    pub fn outgoing(&self, node: usize) -> &[usize] {
        self.outgoing.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Undirected petgraph view; node weights are positions, edge weights speeds.
    pub fn to_graph(&self) -> UnGraph<Vec2, f32> {
        let mut graph = UnGraph::with_capacity(self.nodes.len(), self.edges.len());
        let indices: Vec<_> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.position))
            .collect();

        for edge in self.edges.iter() {
            graph.add_edge(indices[edge.from], indices[edge.to], edge.speed);
        }
        graph
    }

    /// Number of separate islands on the board. Isolated nodes count as one each.
    pub fn component_count(&self) -> usize {
        connected_components(&self.to_graph())
    }
}
