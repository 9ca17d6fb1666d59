use std::path::PathBuf;

use clap::Parser;

/// Animated sphere grid driven by a noise-modulated sine wave.
#[derive(Parser, Debug)]
#[command(name = "wavegrid", version, about)]
pub struct Args {
    /// Configuration file (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the noise field; overrides the config file.
    #[arg(short, long)]
    pub seed: Option<u32>,

    /// Log filter directive (e.g. debug, wavegrid=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Step the wave this many frames without opening a window, then print height stats.
    #[arg(long, value_name = "FRAMES")]
    pub headless: Option<usize>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
