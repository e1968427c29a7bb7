//! Animated circuit board: a procedurally laid out network where light
//! pulses run along traces and cascade from junction to junction.
//!
//! # Example
//! ```no_run
//! use circuitry::{driver::CircuitDriver, renderer::Renderer};
//!
//! let driver = CircuitDriver::builder().seed(7).build(1280.0, 720.0);
//! Renderer::new(driver).create_window().unwrap();
//! ```
//!
//! Headless use goes through the simulator directly:
//! ```
//! use circuitry::{builder::GraphBuilder, simulator::PulseSimulator};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let topology = GraphBuilder::new().build(1280.0, 720.0, &mut rng);
//! let mut simulator = PulseSimulator::new(topology);
//! simulator.trigger(0).unwrap();
//! simulator.tick();
//! assert!(simulator.snapshot().nodes[0].active);
//! ```

pub mod builder;
pub mod driver;
pub mod error;
pub mod frame;
pub mod properties;
pub mod renderer;
pub mod scheduler;
pub mod simulator;
pub mod topology;
