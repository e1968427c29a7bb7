use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use circuitry::{
    builder::{GraphBuilder, MIN_CELL_SIZE}, driver::CircuitDriver, renderer::Renderer,
    simulator::PulseSimulatorBuilder,
};

#[derive(Parser, Debug)]
#[command(name = "circuitry")]
#[command(about = "Animated circuit board with cascading light pulses")]
struct Cli {
    /// Initial surface width
    #[arg(long, default_value = "1280")]
    width: f32,

    /// Initial surface height
    #[arg(long, default_value = "720")]
    height: f32,

    /// Seed for layout and triggers (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid cell size (at least 16)
    #[arg(long, default_value = "120", value_parser = parse_cell_size)]
    cell_size: f32,

    /// Intensity lost per tick by a lit node
    #[arg(long, default_value = "0.02")]
    decay: f32,

    /// Simulate without opening a window
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value = "600")]
    ticks: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut builder = CircuitDriver::builder()
        .graph(GraphBuilder::new().cell_size(cli.cell_size))
        .pulse(PulseSimulatorBuilder::new().decay_rate(cli.decay));
    if let Some(seed) = cli.seed {
        builder = builder.seed(seed);
    }
    let driver = builder.build(cli.width, cli.height);

    if cli.headless {
        return run_headless(driver, cli.ticks);
    }

    Renderer::new(driver).create_window()?;
    Ok(())
}

fn run_headless(mut driver: CircuitDriver, ticks: u32) -> Result<()> {
    let step: Duration = driver.tick_interval();

    for _ in 0..ticks {
        driver.advance(step)?;

        let tick = driver.simulator().ticks();
        if tick % 60 == 0 {
            let frame = driver.snapshot();
            info!(
                tick,
                active_nodes = frame.active_nodes(),
                active_edges = frame.active_edges(),
                "frame"
            );
        }
    }
    Ok(())
}

fn parse_cell_size(s: &str) -> Result<f32, String> {
    let cell_size: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if !(cell_size.is_finite() && cell_size >= MIN_CELL_SIZE) {
        return Err(format!("cell size must be at least {MIN_CELL_SIZE}"));
    }
    Ok(cell_size)
}
