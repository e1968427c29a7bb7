use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use tracing::{debug, warn};

use crate::topology::{Edge, Topology};

/// Smallest accepted grid cell. Smaller cells flood the screen with nodes and
/// make the pair scan explode.
pub const MIN_CELL_SIZE: f32 = 16.0;

/// Procedurally lays out a circuit board for a surface.
///
/// The surface is cut into a grid of roughly `cell_size` cells, one jittered
/// node per cell. Every pair of nodes closer than `proximity` is joined with
/// probability `connect_probability`. The pair scan is `O(n²)`, which is fine
/// for the tens to hundreds of nodes a screen holds.
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    cell_size: f32,
    jitter: f32,
    proximity: f32,
    connect_probability: f64,
    speed_range: RangeInclusive<f32>,
}

impl GraphBuilder {
    /// Get a Instance of `GraphBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Target edge length of a grid cell.
    /// Raised to `MIN_CELL_SIZE` when smaller; NaN keeps the current value.
    pub fn cell_size(mut self, cell_size: f32) -> Self {
        if cell_size.is_nan() {
            return self;
        }
        if cell_size < MIN_CELL_SIZE {
            warn!(cell_size, min = MIN_CELL_SIZE, "cell size too small, clamped");
        }
        self.cell_size = cell_size.max(MIN_CELL_SIZE);
        self
    }

    /// Maximum offset of a node from its cell center, per axis.
    /// `0` puts every node exactly on its cell center.
    pub fn jitter(mut self, jitter: f32) -> Self {
        self.jitter = if jitter.is_finite() { jitter.abs() } else { 0.0 };
        self
    }

    /// Nodes farther apart than this are never connected.
    pub fn proximity(mut self, proximity: f32) -> Self {
        self.proximity = proximity;
        self
    }

    /// Chance that a close enough pair gets an edge.
    /// Clamped to `0.0..=1.0`.
    pub fn connect_probability(mut self, probability: f64) -> Self {
        self.connect_probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        self
    }

    /// Range the per-edge pulse speed is drawn from, in progress-units per tick.
    /// Both bounds must be positive and finite, otherwise the range is left as is.
    pub fn speed_range(mut self, min: f32, max: f32) -> Self {
        let valid = |s: f32| s.is_finite() && s > 0.0;
        if !(valid(min) && valid(max)) {
            warn!(min, max, "speed bounds must be positive and finite, ignored");
            return self;
        }
        self.speed_range = if min <= max { min..=max } else { max..=min };
        self
    }

    /// Builds the board for a `width` x `height` surface.
    ///
    /// Surfaces smaller than one cell (or non-finite sizes) yield an empty topology.
    pub fn build<R: Rng + ?Sized>(&self, width: f32, height: f32, rng: &mut R) -> Topology {
        let (columns, rows) = self.grid(width, height);
        if columns == 0 || rows == 0 {
            debug!(width, height, "surface smaller than one cell, empty board");
            return Topology::empty();
        }

        let positions = self.place_nodes(width, height, columns, rows, rng);
        let edges = self.connect_nodes(&positions, rng);
        let topology = Topology::assemble(positions, edges);

        debug!(
            columns,
            rows,
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            components = topology.component_count(),
            "built circuit board"
        );
        topology
    }

    /// Number of grid columns and rows for a surface.
    pub fn grid(&self, width: f32, height: f32) -> (usize, usize) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return (0, 0);
        }
        (
            (width / self.cell_size).floor() as usize,
            (height / self.cell_size).floor() as usize,
        )
    }

    /// One node per cell in row-major order. Cells stretch to fill the surface.
    fn place_nodes<R: Rng + ?Sized>(
        &self,
        width: f32,
        height: f32,
        columns: usize,
        rows: usize,
        rng: &mut R,
    ) -> Vec<Vec2> {
        let cell = Vec2::new(width / columns as f32, height / rows as f32);
        let mut positions = Vec::with_capacity(columns * rows);

        for row in 0..rows {
            for column in 0..columns {
                let center = Vec2::new(column as f32 + 0.5, row as f32 + 0.5) * cell;
                positions.push(center + self.sample_jitter(rng));
            }
        }
        positions
    }

    fn sample_jitter<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        if self.jitter == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            rng.gen_range(-self.jitter..=self.jitter),
            rng.gen_range(-self.jitter..=self.jitter),
        )
    }

    /// Edges always point from the lower to the higher index.
    fn connect_nodes<R: Rng + ?Sized>(&self, positions: &[Vec2], rng: &mut R) -> Vec<Edge> {
        let mut edges = vec![];

        for (i, p1) in positions.iter().enumerate() {
            for (j, p2) in positions.iter().enumerate().skip(i + 1) {
                if p1.distance(*p2) < self.proximity && rng.gen_bool(self.connect_probability) {
                    let speed = rng.gen_range(self.speed_range.clone());
                    edges.push(Edge::new(i, j, speed));
                }
            }
        }
        edges
    }
}

impl Default for GraphBuilder {
    /// Get a Instance of `GraphBuilder` with default values
    fn default() -> Self {
        Self {
            cell_size: 120.0,
            jitter: 20.0,
            proximity: 150.0,
            connect_probability: 0.3,
            speed_range: 0.005..=0.015,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn grid_floors_to_whole_cells() {
        let builder = GraphBuilder::new();
        assert_eq!(builder.grid(1920.0, 1080.0), (16, 9));
        assert_eq!(builder.grid(239.9, 120.0), (1, 1));
        assert_eq!(builder.grid(100.0, 1000.0), (0, 8));
    }

    #[test]
    fn degenerate_surfaces_are_empty() {
        let builder = GraphBuilder::new();
        let mut rng = StdRng::seed_from_u64(1);

        for (w, h) in [(0.0, 0.0), (-50.0, 300.0), (500.0, 119.0), (f32::NAN, 400.0)] {
            let topology = builder.build(w, h, &mut rng);
            assert!(topology.is_empty());
            assert_eq!(topology.edge_count(), 0);
        }
    }

    #[test]
    fn two_cells_connect_into_one_edge() {
        let mut rng = StdRng::seed_from_u64(7);
        let topology = GraphBuilder::new()
            .jitter(0.0)
            .connect_probability(1.0)
            .build(240.0, 120.0, &mut rng);

        assert_eq!(topology.node_count(), 2);
        assert_eq!(topology.nodes()[0].position, Vec2::new(60.0, 60.0));
        assert_eq!(topology.nodes()[1].position, Vec2::new(180.0, 60.0));
        assert_eq!(topology.edge_count(), 1);

        let edge = topology.edges()[0];
        assert_eq!((edge.from, edge.to), (0, 1));
        assert!((0.005..=0.015).contains(&edge.speed));
    }

    #[test]
    fn zero_probability_never_connects() {
        let mut rng = StdRng::seed_from_u64(3);
        let topology = GraphBuilder::new()
            .connect_probability(0.0)
            .build(1200.0, 800.0, &mut rng);

        assert_eq!(topology.node_count(), 60);
        assert_eq!(topology.edge_count(), 0);
    }

    #[test]
    fn jitter_stays_inside_bounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let topology = GraphBuilder::new().build(600.0, 360.0, &mut rng);

        for (i, node) in topology.nodes().iter().enumerate() {
            let center = Vec2::new((i % 5) as f32 * 120.0 + 60.0, (i / 5) as f32 * 120.0 + 60.0);
            let offset = (node.position - center).abs();
            assert!(offset.x <= 20.0 && offset.y <= 20.0, "node {i} at {offset}");
        }
    }

    #[test]
    fn setters_normalize_input() {
        let builder = GraphBuilder::new()
            .connect_probability(3.0)
            .speed_range(0.2, 0.1)
            .jitter(-4.0);

        assert_eq!(builder.connect_probability, 1.0);
        assert_eq!(builder.speed_range, 0.1..=0.2);
        assert_eq!(builder.jitter, 4.0);

        let builder = GraphBuilder::new()
            .speed_range(-0.02, 0.0)
            .speed_range(f32::NAN, 0.1)
            .speed_range(0.01, f32::INFINITY)
            .jitter(f32::NAN)
            .cell_size(f32::NAN);

        assert_eq!(builder.speed_range, 0.005..=0.015);
        assert_eq!(builder.jitter, 0.0);
        assert_eq!(builder.cell_size, 120.0);
    }

    #[test]
    fn bad_speed_setters_still_pulse_forward() {
        let mut rng = StdRng::seed_from_u64(5);
        let topology = GraphBuilder::new()
            .connect_probability(1.0)
            .speed_range(-0.02, 0.0)
            .jitter(f32::NAN)
            .build(240.0, 120.0, &mut rng);

        assert_eq!(topology.edge_count(), 1);
        assert!(topology.edges()[0].speed > 0.0);
    }

    #[test]
    fn tiny_cells_are_clamped() {
        let builder = GraphBuilder::new().cell_size(1.0);
        assert_eq!(builder.grid(1280.0, 720.0), (80, 45));

        let builder = GraphBuilder::new().cell_size(-5.0);
        assert_eq!(builder.cell_size, MIN_CELL_SIZE);
    }
}
