//! Fleetmon - terminal telemetry monitor for the robot fleet.
//!
//! Polls the shared key-value store for the fleet snapshot and renders a
//! continuously refreshing one-line summary. Read-only: no fleet control,
//! no persistence.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process;

use fleet_common::MonitorConfig;
use fleetmon::monitor::Monitor;
use fleetmon::store::RedisStore;
use fleetmon::{errors, output};

#[derive(Parser)]
#[command(name = "fleetmon")]
#[command(about = "Robot fleet telemetry monitor", long_about = None)]
#[command(version)]
struct Cli {
    /// Store connection URL (overrides config file and FLEETMON_REDIS_URL)
    #[arg(long)]
    url: Option<String>,

    /// Snapshot key to poll
    #[arg(long)]
    key: Option<String>,

    /// Polling interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stderr, so the rewritten status line on stdout stays intact
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::load_from(path)?,
        None => MonitorConfig::load()?,
    };
    config.apply_env();

    if let Some(url) = &cli.url {
        config.redis_url = url.clone();
    }
    if let Some(key) = &cli.key {
        config.key = key.clone();
    }
    if let Some(interval) = cli.interval {
        config.interval_secs = interval;
    }
    Ok(config)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            output::display_error(&format!("{:#}", e));
            process::exit(errors::EXIT_GENERAL_ERROR);
        }
    };

    let store = match RedisStore::connect(&config.redis_url, &config.key).await {
        Ok(store) => store,
        Err(e) => {
            output::print_connect_failed(&config.redis_url, &e.to_string());
            process::exit(errors::EXIT_STORE_UNAVAILABLE);
        }
    };
    output::print_connected(&config.redis_url);
    output::print_monitor_started();

    let mut monitor = Monitor::new(store, config);
    match monitor.run().await {
        Ok(()) => process::exit(errors::EXIT_SUCCESS),
        Err(e) => {
            output::display_error(&e.to_string());
            process::exit(errors::EXIT_STORE_UNAVAILABLE);
        }
    }
}
