use std::{ops::RangeInclusive, time::Duration};

use rand::{seq::SliceRandom, Rng};
use tracing::trace;

use crate::{error::PulseError, simulator::PulseSimulator};

/// Host-side trigger cadences on a virtual clock.
///
/// Two independent timers run side by side: one fires a single random dark
/// node every `single_interval`, the other fires a batch of distinct dark
/// nodes every `batch_interval`. A timer that falls behind fires once and
/// drops the missed periods instead of bursting.
#[derive(Clone, Debug)]
pub struct TriggerSchedule {
    single_interval: Duration,
    batch_interval: Duration,
    batch_size: RangeInclusive<usize>,
    single_elapsed: Duration,
    batch_elapsed: Duration,
}

impl TriggerSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Period of the single-node trigger. `Duration::ZERO` disables it.
    pub fn single_interval(mut self, interval: Duration) -> Self {
        self.single_interval = interval;
        self
    }

    /// Period of the batch trigger. `Duration::ZERO` disables it.
    pub fn batch_interval(mut self, interval: Duration) -> Self {
        self.batch_interval = interval;
        self
    }

    /// How many nodes a batch fires, drawn uniformly from `min..=max`.
    pub fn batch_size(mut self, min: usize, max: usize) -> Self {
        self.batch_size = if min <= max { min..=max } else { max..=min };
        self
    }

    /// Restarts both timers from zero.
    pub fn reset(&mut self) {
        self.single_elapsed = Duration::ZERO;
        self.batch_elapsed = Duration::ZERO;
    }

    /// Moves the clock forward by `elapsed` and fires whatever came due.
    /// Returns the number of nodes triggered.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        elapsed: Duration,
        simulator: &mut PulseSimulator,
        rng: &mut R,
    ) -> Result<usize, PulseError> {
        let mut fired = 0;

        if due(&mut self.single_elapsed, elapsed, self.single_interval) {
            fired += fire_random(simulator, 1, rng)?;
        }

        if due(&mut self.batch_elapsed, elapsed, self.batch_interval) {
            let count = rng.gen_range(self.batch_size.clone());
            fired += fire_random(simulator, count, rng)?;
        }

        Ok(fired)
    }
}

impl Default for TriggerSchedule {
    fn default() -> Self {
        Self {
            single_interval: Duration::from_millis(500),
            batch_interval: Duration::from_millis(1500),
            batch_size: 2..=4,
            single_elapsed: Duration::ZERO,
            batch_elapsed: Duration::ZERO,
        }
    }
}

fn due(acc: &mut Duration, elapsed: Duration, interval: Duration) -> bool {
    if interval.is_zero() {
        return false;
    }

    *acc += elapsed;
    if *acc < interval {
        return false;
    }
    *acc = Duration::from_nanos((acc.as_nanos() % interval.as_nanos()) as u64);
    true
}

/// Fires up to `count` distinct dark nodes. Lit nodes are never picked.
fn fire_random<R: Rng + ?Sized>(
    simulator: &mut PulseSimulator,
    count: usize,
    rng: &mut R,
) -> Result<usize, PulseError> {
    let inactive = simulator.inactive_nodes();
    let picked: Vec<usize> = inactive.choose_multiple(rng, count).copied().collect();

    for &node in picked.iter() {
        trace!(node, "scheduled trigger");
        simulator.trigger(node)?;
    }
    Ok(picked.len())
}
