//! Stochastic Lab CLI
//!
//! Runs one simulation described by a JSON file and prints the result JSON.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use stochastic_engine::SimulationConfig;
use stochastic_host::config::{build_config, CliArgs as ConfigCliArgs};
use stochastic_host::SimulationHost;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Stochastic Lab - Monte Carlo, Markov chain and random walk simulations
#[derive(Parser, Debug)]
#[command(name = "stochastic-lab")]
#[command(version, about, long_about = None)]
struct Args {
    /// Simulation configuration (JSON), or `-` for stdin
    #[arg(value_name = "SIMULATION")]
    simulation: PathBuf,

    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", env = "STOCHASTIC_LAB_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for the random source
    #[arg(short, long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Pretty-print the result JSON
    #[arg(long)]
    pretty: bool,
}

impl From<&Args> for ConfigCliArgs {
    fn from(args: &Args) -> Self {
        ConfigCliArgs {
            config_file: args.config.clone(),
            seed: args.seed,
            log_level: args.log_level.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_simulation(path: &Path) -> anyhow::Result<SimulationConfig> {
    let json = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read simulation from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read simulation file {}", path.display()))?
    };
    Ok(SimulationConfig::from_json(&json)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = build_config(&ConfigCliArgs::from(&args))?;

    // Initialize tracing
    init_tracing(config.log_level.as_filter_str());

    tracing::info!("Stochastic Lab v{}", stochastic_host::VERSION);
    tracing::info!(
        channel_capacity = %config.channel_capacity,
        progress_checkpoints = %config.progress_checkpoints,
        seed = ?config.seed,
        log_level = %config.log_level,
        "Host configuration loaded"
    );

    let simulation = read_simulation(&args.simulation)?;
    let host = SimulationHost::new(config)?;

    let mut progress = host.subscribe();
    let reporter = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let update = *progress.borrow_and_update();
            tracing::info!(percent = update.percent.round(), "Progress");
        }
    });

    let pending = host.submit(simulation);
    let id = pending.id();
    let result = pending.wait().await;
    reporter.abort();

    let result = result.with_context(|| format!("Simulation {} did not complete", id))?;
    tracing::info!(
        id = %id,
        seed = result.seed,
        execution_time_ms = result.execution_time_ms,
        "Simulation finished"
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", output);

    Ok(())
}
