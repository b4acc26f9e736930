//! ride-replay: replays a recorded sensor/GPS session log and prints the
//! resulting ride summaries as JSON.

use anyhow::Context;
use clap::Parser;
use ride_telemetry::recording::RecorderConfig;
use ride_telemetry::replay::replay_file;
use ride_telemetry::storage::config::{load_config, load_config_from, AppConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to a JSON-lines session log
    log: PathBuf,

    /// Configuration file (defaults to the platform data directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the moving speed threshold in m/s
    #[arg(long)]
    moving_threshold: Option<f64>,

    /// Print only statistics, without the sample log
    #[arg(long, default_value_t = false)]
    stats_only: bool,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config: AppConfig = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => load_config().context("loading config")?,
    };

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting ride-replay v{}", env!("CARGO_PKG_VERSION"));

    let mut recorder_config = RecorderConfig::from(&config.recording);
    if let Some(threshold) = args.moving_threshold {
        recorder_config.moving_speed_threshold_ms = threshold;
    }

    let summaries = replay_file(&args.log, recorder_config)
        .with_context(|| format!("replaying {}", args.log.display()))?;

    let output = if args.stats_only {
        let stats: Vec<_> = summaries
            .iter()
            .map(|s| {
                serde_json::json!({
                    "id": s.id,
                    "started_at": s.started_at,
                    "ended_at": s.ended_at,
                    "stats": s.stats,
                    "samples": s.data_points.len(),
                    "avg_heart_rate": s.avg_heart_rate,
                    "max_heart_rate": s.max_heart_rate,
                    "avg_power": s.avg_power,
                    "max_power": s.max_power,
                })
            })
            .collect();
        to_json(&stats, args.pretty)?
    } else {
        to_json(&summaries, args.pretty)?
    };

    println!("{}", output);
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
