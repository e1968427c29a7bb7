use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::{
    builder::GraphBuilder,
    error::PulseError,
    frame::RenderState,
    scheduler::TriggerSchedule,
    simulator::{PulseSimulator, PulseSimulatorBuilder},
};

/// Owns everything a host loop needs to animate a board: the simulator, the
/// trigger cadences and the random source.
///
/// Time is virtual. The host reports how much passed with `advance` and the
/// driver runs fixed-size ticks to match.
#[derive(Debug)]
pub struct CircuitDriver {
    graph: GraphBuilder,
    pulse: PulseSimulatorBuilder,
    schedule: TriggerSchedule,
    simulator: PulseSimulator,
    rng: StdRng,
    tick_interval: Duration,
    max_catch_up: u32,
    pending: Duration,
    size: (f32, f32),
}

impl CircuitDriver {
    pub fn builder() -> DriverBuilder {
        DriverBuilder::default()
    }

    pub fn simulator(&self) -> &PulseSimulator {
        &self.simulator
    }

    pub fn snapshot(&self) -> RenderState {
        self.simulator.snapshot()
    }

    /// Surface size the current board was built for.
    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Lets `elapsed` of virtual time pass: fires scheduled triggers, then
    /// runs as many ticks as fit. At most `max_catch_up` ticks run per call;
    /// time beyond that is dropped. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> Result<u32, PulseError> {
        self.schedule
            .advance(elapsed, &mut self.simulator, &mut self.rng)?;

        self.pending += elapsed;
        let mut ticks = 0;
        while self.pending >= self.tick_interval {
            if ticks == self.max_catch_up {
                debug!(dropped = ?self.pending, "simulation fell behind");
                self.pending = Duration::ZERO;
                break;
            }
            self.pending -= self.tick_interval;
            self.simulator.tick();
            ticks += 1;
        }
        Ok(ticks)
    }

    /// Rebuilds the board for a new surface size, discarding all pulses.
    /// Returns `false` if the size did not change.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        if self.size == (width, height) {
            return false;
        }

        let topology = self.graph.build(width, height, &mut self.rng);
        info!(
            width,
            height,
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "rebuilt circuit board"
        );

        self.simulator = self.pulse.clone().build(topology);
        self.schedule.reset();
        self.pending = Duration::ZERO;
        self.size = (width, height);
        true
    }
}

/// Builder for `CircuitDriver`
#[derive(Clone, Debug)]
pub struct DriverBuilder {
    graph: GraphBuilder,
    pulse: PulseSimulatorBuilder,
    schedule: TriggerSchedule,
    seed: Option<u64>,
    tick_rate: u32,
    max_catch_up: u32,
}

impl DriverBuilder {
    /// Get a Instance of `DriverBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// How boards are laid out, on start and on every resize.
    pub fn graph(mut self, graph: GraphBuilder) -> Self {
        self.graph = graph;
        self
    }

    /// Settings for the pulse simulator.
    pub fn pulse(mut self, pulse: PulseSimulatorBuilder) -> Self {
        self.pulse = pulse;
        self
    }

    /// Trigger cadences.
    pub fn schedule(mut self, schedule: TriggerSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Seed for layout and trigger picks. Without one the driver seeds from entropy.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Ticks per second of virtual time. `0` is ignored.
    pub fn tick_rate(mut self, tick_rate: u32) -> Self {
        if tick_rate > 0 {
            self.tick_rate = tick_rate;
        }
        self
    }

    /// Upper bound on ticks run by a single `advance`.
    pub fn max_catch_up(mut self, max_catch_up: u32) -> Self {
        self.max_catch_up = max_catch_up;
        self
    }

    /// Builds the first board for a `width` x `height` surface.
    pub fn build(self, width: f32, height: f32) -> CircuitDriver {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let topology = self.graph.build(width, height, &mut rng);
        info!(
            width,
            height,
            nodes = topology.node_count(),
            edges = topology.edge_count(),
            "built circuit board"
        );

        CircuitDriver {
            simulator: self.pulse.clone().build(topology),
            graph: self.graph,
            pulse: self.pulse,
            schedule: self.schedule,
            rng,
            tick_interval: Duration::from_secs(1) / self.tick_rate,
            max_catch_up: self.max_catch_up,
            pending: Duration::ZERO,
            size: (width, height),
        }
    }
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self {
            graph: GraphBuilder::default(),
            pulse: PulseSimulatorBuilder::default(),
            schedule: TriggerSchedule::default(),
            seed: None,
            tick_rate: 60,
            max_catch_up: 8,
        }
    }
}
