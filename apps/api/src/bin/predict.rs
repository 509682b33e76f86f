//! Scores bookings from the running API with the cancellation classifier and
//! stores each prediction in both stores.

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use tracing::info;

use hotel_booking_api::config::DocumentConfig;
use hotel_booking_api::db::{connect_document_store, create_pool};
use hotel_booking_api::logging::init_tracing;
use hotel_booking_api::prediction::classifier::ModelClient;
use hotel_booking_api::prediction::{fetch_bookings, persist_prediction, predict_booking};

#[derive(Parser, Debug)]
#[command(name = "predict")]
#[command(about = "Predict booking cancellations")]
#[command(version)]
struct Cli {
    /// Base URL of the booking API
    #[arg(long, env = "API_BASE_URL", default_value = "http://localhost:8000")]
    api_base_url: String,

    /// Classifier endpoint
    #[arg(long, env = "MODEL_URL", default_value = "http://localhost:8501/predict")]
    model_url: String,

    #[arg(long, env = "MODEL_VERSION", default_value = "1.0")]
    model_version: String,

    /// How many bookings to score
    #[arg(long, default_value_t = 100)]
    limit: u32,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(env!("CARGO_CRATE_NAME"), &cli.log_level);

    let pool = create_pool(&cli.database_url, 2).await?;
    let documents = connect_document_store(&DocumentConfig::from_env()?).await?;
    let model = ModelClient::new(cli.model_url.clone()).context("Failed to build model client")?;

    let bookings = fetch_bookings(&Client::new(), &cli.api_base_url, cli.limit)
        .await
        .with_context(|| format!("Failed to fetch bookings from {}", cli.api_base_url))?;
    info!("Scoring {} bookings", bookings.len());

    let mut stored = 0usize;
    let mut predicted_canceled = 0usize;
    for booking in &bookings {
        let prediction = predict_booking(&model, booking, &cli.model_version).await;
        if prediction.predicted_canceled {
            predicted_canceled += 1;
        }
        let persisted = persist_prediction(&pool, &documents, &prediction).await;
        if persisted.relational && persisted.document {
            stored += 1;
        }
    }

    info!(
        "Done: {} predictions, {} predicted canceled, {} stored in both stores",
        bookings.len(),
        predicted_canceled,
        stored
    );
    Ok(())
}
