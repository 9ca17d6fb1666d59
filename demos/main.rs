//! wavegrid launcher

mod cli;

use anyhow::Context;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};
use wavegrid_core::{load_config, SimplexField, WaveConfig, WaveSimulation};

fn main() -> anyhow::Result<()> {
    let args = cli::parse();

    let log_directive = args.log_level.as_deref().unwrap_or("wavegrid=info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_directive.parse().unwrap_or_else(|_| LevelFilter::INFO.into())),
        )
        .init();

    tracing::info!("wavegrid v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => load_config(path).with_context(|| format!("loading {}", path.display()))?,
        None => WaveConfig::default(),
    };
    if args.seed.is_some() {
        config.noise.seed = args.seed;
    }

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    match args.headless {
        Some(frames) => run_headless(config, frames),
        None => wavegrid_visualization::run_viewer(config).context("viewer failed"),
    }
}

fn run_headless(config: WaveConfig, frames: usize) -> anyhow::Result<()> {
    config.validate()?;
    let noise = SimplexField::from_seed(config.noise.seed);
    let mut simulation = WaveSimulation::new(config.grid.rows, config.grid.cols, config.wave, noise);
    let state = simulation.run(frames);

    match simulation.stats() {
        Some(stats) => tracing::info!(
            frames,
            seed = simulation.noise().seed(),
            phase = state.phase,
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            "headless run finished"
        ),
        None => tracing::warn!("grid is empty"),
    }
    Ok(())
}
