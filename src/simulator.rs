use tracing::trace;

use crate::{
    error::PulseError,
    frame::{EdgeView, NodeView, RenderState},
    properties::{EdgeState, NodeState},
    topology::Topology,
};

/// Runtime pulse state laid over an immutable `Topology`.
///
/// The simulator is single threaded and advances only when `tick` is called;
/// hosts that share it between threads must serialize access themselves.
#[derive(Clone, Debug)]
pub struct PulseSimulator {
    topology: Topology,
    nodes: Vec<NodeState>,
    edges: Vec<EdgeState>,
    decay_rate: f32,
    ticks: u64,
}

impl PulseSimulator {
    pub fn builder() -> PulseSimulatorBuilder {
        PulseSimulatorBuilder::default()
    }

    /// Simulator with default settings and every node and edge idle.
    pub fn new(topology: Topology) -> Self {
        Self::builder().build(topology)
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn node_states(&self) -> &[NodeState] {
        &self.nodes
    }

    pub fn edge_states(&self) -> &[EdgeState] {
        &self.edges
    }

    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Fires node `index` at full intensity and launches a pulse on every
    /// edge leaving it.
    ///
    /// An already active node is re-armed: its intensity goes back to `1` and
    /// its outgoing pulses restart from the source.
    pub fn trigger(&mut self, index: usize) -> Result<(), PulseError> {
        if index >= self.nodes.len() {
            return Err(PulseError::NodeOutOfRange {
                index,
                len: self.nodes.len(),
            });
        }
        self.fire(index);
        Ok(())
    }

    /// Advances the simulation one step.
    ///
    /// Nodes fade first, then pulses move in edge creation order. A pulse that
    /// arrives fires its destination right away unless that node is already
    /// lit, so a single trigger can cascade across the board over many ticks.
    /// Returns how many nodes were fired by arrivals.
    pub fn tick(&mut self) -> usize {
        self.ticks += 1;

        for node in self.nodes.iter_mut() {
            node.decay(self.decay_rate);
        }

        let mut fired = 0;
        for i in 0..self.edges.len() {
            let edge = self.topology.edges()[i];
            if self.edges[i].advance(edge.speed) && !self.nodes[edge.to].active {
                trace!(edge = i, from = edge.from, to = edge.to, "pulse arrived");
                self.fire(edge.to);
                fired += 1;
            }
        }
        fired
    }

    /// Copies the current positions and pulse state for a renderer.
    pub fn snapshot(&self) -> RenderState {
        let topo_nodes = self.topology.nodes();

        let nodes = topo_nodes
            .iter()
            .zip(self.nodes.iter())
            .map(|(node, state)| NodeView {
                position: node.position,
                active: state.active,
                intensity: state.intensity,
            })
            .collect();

        let edges = self
            .topology
            .edges()
            .iter()
            .zip(self.edges.iter())
            .map(|(edge, state)| EdgeView {
                from: topo_nodes[edge.from].position,
                to: topo_nodes[edge.to].position,
                active: state.active,
                progress: state.progress,
            })
            .collect();

        RenderState { nodes, edges }
    }

    /// Indices of all nodes that are currently dark.
    pub fn inactive_nodes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.active)
            .map(|(i, _)| i)
            .collect()
    }

    /// True when no node is lit and no pulse is travelling.
    pub fn is_quiescent(&self) -> bool {
        self.nodes.iter().all(|n| !n.active) && self.edges.iter().all(|e| !e.active)
    }

    fn fire(&mut self, index: usize) {
        self.nodes[index].fire();
        for &edge in self.topology.outgoing(index) {
            self.edges[edge].launch();
        }
    }
}

/// Builder for `PulseSimulator`
#[derive(Clone, Debug)]
pub struct PulseSimulatorBuilder {
    decay_rate: f32,
}

impl PulseSimulatorBuilder {
    /// Get a Instance of `PulseSimulatorBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// How much intensity a lit node loses per tick.
    /// Non-positive values are replaced by the default, since a node must go dark eventually.
    pub fn decay_rate(mut self, decay_rate: f32) -> Self {
        if decay_rate > 0.0 && decay_rate.is_finite() {
            self.decay_rate = decay_rate;
        }
        self
    }

    /// Constructs a instance of `PulseSimulator` with all state idle
    pub fn build(self, topology: Topology) -> PulseSimulator {
        PulseSimulator {
            nodes: vec![NodeState::new(); topology.node_count()],
            edges: vec![EdgeState::new(); topology.edge_count()],
            topology,
            decay_rate: self.decay_rate,
            ticks: 0,
        }
    }
}

impl Default for PulseSimulatorBuilder {
    fn default() -> Self {
        Self { decay_rate: 0.02 }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::topology::Edge;

    /// Node 0 fans out to 1 and 2, node 1 feeds 3.
    fn fan() -> PulseSimulator {
        let positions = (0..4).map(|i| Vec2::new(i as f32, 0.0)).collect();
        let edges = vec![
            Edge::new(0, 1, 0.5),
            Edge::new(0, 2, 0.5),
            Edge::new(1, 3, 0.25),
        ];
        PulseSimulator::new(Topology::from_parts(positions, edges).unwrap())
    }

    #[test]
    fn trigger_lights_node_and_outgoing_edges() {
        let mut sim = fan();
        sim.trigger(0).unwrap();

        assert_eq!(sim.node_states()[0], NodeState { active: true, intensity: 1.0 });
        for state in &sim.edge_states()[..2] {
            assert_eq!(*state, EdgeState { active: true, progress: 0.0 });
        }
        assert!(!sim.edge_states()[2].active);
    }

    #[test]
    fn trigger_rejects_unknown_node() {
        let mut sim = fan();
        assert_eq!(
            sim.trigger(4),
            Err(PulseError::NodeOutOfRange { index: 4, len: 4 })
        );
        assert!(sim.is_quiescent());
    }

    #[test]
    fn pulses_fire_destinations_on_arrival() {
        let mut sim = fan();
        sim.trigger(0).unwrap();

        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.edge_states()[0].progress, 0.5);
        assert_eq!(sim.tick(), 2);

        for i in 0..2 {
            assert_eq!(sim.edge_states()[i], EdgeState::new());
        }
        for i in 1..3 {
            assert_eq!(sim.node_states()[i], NodeState { active: true, intensity: 1.0 });
        }
        assert!((sim.node_states()[0].intensity - 0.96).abs() < 1e-6);
        // Node 1 fired, so its own edge is on the way.
        assert!(sim.edge_states()[2].active);
    }

    #[test]
    fn arrival_skips_lit_destination() {
        let mut sim = fan();
        sim.trigger(0).unwrap();
        sim.trigger(1).unwrap();
        sim.tick();

        // Node 1 faded a bit but is still lit when the pulse lands.
        assert_eq!(sim.tick(), 1);
        assert!(sim.node_states()[1].intensity < 1.0);
        assert_eq!(sim.node_states()[2].intensity, 1.0);
    }

    #[test]
    fn retrigger_rearms_active_node() {
        let mut sim = fan();
        sim.trigger(0).unwrap();
        sim.tick();
        sim.trigger(0).unwrap();

        assert_eq!(sim.node_states()[0].intensity, 1.0);
        assert_eq!(sim.edge_states()[0].progress, 0.0);
        assert!(sim.edge_states()[0].active);
    }

    #[test]
    fn weak_node_goes_dark_without_going_negative() {
        let mut sim = fan();
        sim.nodes[0] = NodeState {
            active: true,
            intensity: 0.03,
        };

        sim.tick();
        assert!(sim.node_states()[0].active);
        sim.tick();
        assert_eq!(sim.node_states()[0], NodeState::new());
    }

    #[test]
    fn empty_board_is_a_no_op() {
        let mut sim = PulseSimulator::new(Topology::empty());
        assert_eq!(sim.tick(), 0);
        assert!(sim.trigger(0).is_err());
        assert_eq!(sim.snapshot(), RenderState::default());
        assert!(sim.is_quiescent());
    }

    #[test]
    fn snapshot_resolves_edge_endpoints() {
        let mut sim = fan();
        sim.trigger(0).unwrap();
        sim.tick();

        let frame = sim.snapshot();
        assert_eq!(frame.nodes.len(), 4);
        assert_eq!(frame.active_nodes(), 1);
        assert_eq!(frame.active_edges(), 2);
        assert_eq!(frame.edges[2].from, Vec2::new(1.0, 0.0));
        assert_eq!(frame.edges[2].to, Vec2::new(3.0, 0.0));
        assert_eq!(frame.edges[0].pulse_head(), Some(Vec2::new(0.5, 0.0)));
    }

    #[test]
    fn builder_ignores_non_positive_decay() {
        let sim = PulseSimulator::builder()
            .decay_rate(-1.0)
            .build(Topology::empty());
        assert_eq!(sim.decay_rate(), 0.02);

        let sim = PulseSimulator::builder()
            .decay_rate(0.1)
            .build(Topology::empty());
        assert_eq!(sim.decay_rate(), 0.1);
    }
}
