//! Flurry Sim - headless driver for the Flurry engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{config, simulate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flurry-sim")]
#[command(about = "Run the Flurry animation engine headlessly", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate the engine for a while and report pool statistics
    Run {
        /// Simulated seconds
        #[arg(long, default_value = "30")]
        seconds: f64,

        /// Production rate reported by the synthetic economy
        #[arg(long, default_value = "1000")]
        rate: f64,

        /// Multiply the production rate by this factor every simulated second
        #[arg(long, default_value = "1.0")]
        growth: f64,

        /// Host refresh rate in Hz
        #[arg(long, default_value = "60")]
        refresh: f64,

        /// Logical surface width
        #[arg(long, default_value = "800")]
        width: f32,

        /// Logical surface height
        #[arg(long, default_value = "600")]
        height: f32,

        /// Physical pixels per logical pixel
        #[arg(long, default_value = "1.0")]
        density: f32,

        /// Random seed for particles and rewards
        #[arg(long, default_value = "1")]
        seed: u32,

        /// Fire an income burst every N seconds
        #[arg(long)]
        burst_every: Option<f64>,

        /// Click the timed reward as soon as it shows
        #[arg(long)]
        click_rewards: bool,

        /// Engine config file (TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Write the final frame to this PNG
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the default engine config as TOML
    Config {
        /// Validate this file instead of printing the defaults
        #[arg(long)]
        check: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            seconds,
            rate,
            growth,
            refresh,
            width,
            height,
            density,
            seed,
            burst_every,
            click_rewards,
            config,
            output,
        } => simulate::run(simulate::SimulateArgs {
            seconds,
            rate,
            growth,
            refresh,
            width,
            height,
            density,
            seed,
            burst_every,
            click_rewards,
            config,
            output,
        }),
        Commands::Config { check } => config::run(check),
    }
}
