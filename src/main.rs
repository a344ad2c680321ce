/*
 * Boid Flocking Simulation
 *
 * Entry point. Loads the configuration, then either opens the interactive
 * viewer or runs the engine headless for a fixed number of ticks, logging
 * the sampled statistics.
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use boids_lab::{Simulation, SimulationConfig};

mod viewer;

#[derive(Parser, Debug)]
#[command(name = "boids-lab", version, about = "Interactive boid flocking simulation")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of boids
    #[arg(short, long)]
    boids: Option<usize>,

    /// Seed the random spawn for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Ticks to run in headless mode
    #[arg(long, default_value_t = 600)]
    ticks: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(boids) = cli.boids {
        config.boid_count = boids;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    config.validate().context("invalid configuration")?;

    if cli.headless {
        run_headless(config, cli.ticks)
    } else {
        viewer::run(config);
        Ok(())
    }
}

fn run_headless(config: SimulationConfig, ticks: u64) -> Result<()> {
    let stats_interval = config.stats_interval;
    let mut simulation = Simulation::new(config).context("failed to create simulation")?;

    for _ in 0..ticks {
        simulation.tick();

        if simulation.tick_count() % stats_interval == 0 {
            let stats = simulation.stats();
            info!(
                tick = simulation.tick_count(),
                boids = stats.boid_count,
                avg_speed = stats.avg_speed,
                avg_neighbors = stats.avg_neighbors,
                "stats"
            );
        }
    }

    let snapshot = simulation.snapshot();
    info!(
        ticks = snapshot.tick,
        boids = snapshot.agents.len(),
        peak_density = simulation.heatmap().max_value(),
        "headless run finished"
    );
    Ok(())
}
