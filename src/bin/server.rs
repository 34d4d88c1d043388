//! Pricecast Server - headless next-close prediction service
//!
//! Reads one JSON request per line on stdin and writes one JSON reply per
//! line on stdout. Logs go to stderr. A line containing `health` returns the
//! service health instead of a prediction.
//!
//! # Usage
//! ```sh
//! cat requests.ndjson | cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `OBSERVABILITY_ENABLED` - Enable metrics reporting (default: true)
//! - `OBSERVABILITY_INTERVAL` - Interval in seconds between metric outputs (default: 60)

use anyhow::Result;
use pricecast::application::PredictionService;
use pricecast::application::ml::PricePredictor;
use pricecast::application::request_loop::serve;
use pricecast::config::Config;
use pricecast::infrastructure::observability::{Metrics, MetricsReporter};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Stdout carries replies, so logs go to stderr
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    info!("Pricecast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: SequenceLength={}, Trees={}, Candles={}..={}",
        config.model.sequence_length,
        config.model.n_trees,
        config.service.min_candles,
        config.service.max_candles
    );

    let predictor = Arc::new(PricePredictor::random_forest(
        config.model.sequence_length,
        config.model.forest_settings(),
    ));
    let mut service = PredictionService::new(predictor.clone(), config.service.clone());

    // Start metrics reporter if enabled
    if config.observability.enabled {
        let metrics = Metrics::new()?;
        service = service.with_metrics(metrics.clone());

        let interval = config.observability.interval_seconds;
        let reporter = MetricsReporter::new(predictor, metrics, interval);
        tokio::spawn(async move {
            reporter.run().await;
        });

        info!("Metrics reporter started (interval: {}s)", interval);
    } else {
        info!("Metrics reporting disabled.");
    }

    info!("Server reading requests from stdin. Press Ctrl+C to shutdown.");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let replies = serve(
        service,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown,
    )
    .await?;

    info!("Answered {} requests. Exiting...", replies);
    Ok(())
}
