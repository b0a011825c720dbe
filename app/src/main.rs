mod cache;
mod config;
mod error;
mod logging;
mod metrics;
mod rest;
mod source;

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
pub async fn main() -> ExitCode {
    logging::init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        directory = %config.aag_directory().display(),
        zone = %config.source_zone(),
        cache = config.cache_readings(),
        "Watching cloud watcher output"
    );

    let metrics = match metrics::AagMetrics::new() {
        Ok(metrics) => Arc::new(metrics),
        Err(err) => {
            error!(error = %err, "Failed registering gauges");
            return ExitCode::FAILURE;
        }
    };
    let source = Arc::new(source::SnapshotSource::from_config(&config));

    if let Err(err) = rest::dispatch_server(&config, source, metrics).await {
        error!(error = %err, "Server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
