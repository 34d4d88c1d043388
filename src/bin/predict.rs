use anyhow::{Context, Result, bail};
use clap::Parser;
use pricecast::application::ml::PricePredictor;
use pricecast::application::{PredictionRequest, PredictionService};
use pricecast::config::Config;
use pricecast::infrastructure::persistence::{load_candles, load_sentiment};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

/// One-shot next-close prediction from a request file or a candle CSV.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON request file: {"candles": [...], "sentiment": [...], "symbol": "..."}
    #[arg(long, conflicts_with = "csv")]
    input: Option<PathBuf>,

    /// Candle CSV with header timestamp,open,high,low,close,volume
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Sentiment CSV with header timestamp,sentiment_score[,news_count,social_mentions]
    #[arg(long, requires = "csv")]
    sentiment: Option<PathBuf>,

    /// Symbol echoed in the response
    #[arg(long, default_value = "UNKNOWN")]
    symbol: String,

    /// Override SEQUENCE_LENGTH
    #[arg(long)]
    sequence_length: Option<usize>,

    /// Override RF_N_TREES
    #[arg(long)]
    n_trees: Option<usize>,
}

fn load_request(args: &Args) -> Result<PredictionRequest> {
    if let Some(path) = &args.input {
        let file =
            File::open(path).with_context(|| format!("Failed to open request: {:?}", path))?;
        return serde_json::from_reader(BufReader::new(file)).context("Failed to parse request");
    }

    let Some(csv) = &args.csv else {
        bail!("Either --input or --csv is required");
    };
    let candles = load_candles(csv)?;
    let sentiment = args.sentiment.as_ref().map(load_sentiment).transpose()?;
    Ok(PredictionRequest::new(candles, sentiment).with_symbol(args.symbol.clone()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::from_env()?;
    if let Some(length) = args.sequence_length {
        config.model.sequence_length = length;
    }
    if let Some(trees) = args.n_trees {
        config.model.n_trees = trees;
    }

    let request = load_request(&args)?;
    info!(
        "Predicting next close for {} from {} candles",
        request.symbol,
        request.candles.len()
    );

    let predictor = Arc::new(PricePredictor::random_forest(
        config.model.sequence_length,
        config.model.forest_settings(),
    ));
    let service = PredictionService::new(predictor, config.service);
    let response = service.predict(request).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
