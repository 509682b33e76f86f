//! Bulk-loads the hotel bookings CSV into one of the two stores.
//!
//! Usage:
//!   load-bookings relational hotel_bookings.csv [--batch-size 1000]
//!   load-bookings document hotel_bookings.csv

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use hotel_booking_api::config::DocumentConfig;
use hotel_booking_api::db::{connect_document_store, create_pool};
use hotel_booking_api::loader::{document::load_document, relational::load_relational};
use hotel_booking_api::loader::DEFAULT_BATCH_SIZE;
use hotel_booking_api::logging::init_tracing;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    Relational,
    Document,
}

#[derive(Parser, Debug)]
#[command(name = "load-bookings")]
#[command(about = "Load hotel bookings from CSV")]
#[command(version)]
struct Cli {
    /// Target store
    #[arg(value_enum)]
    backend: Backend,

    /// CSV file with a header row
    csv: PathBuf,

    /// Rows per committed batch; also the progress reporting interval
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// PostgreSQL URL (relational backend)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(env!("CARGO_CRATE_NAME"), &cli.log_level);

    info!("Loading {} into the {:?} store", cli.csv.display(), cli.backend);

    let summary = match cli.backend {
        Backend::Relational => {
            let url = cli
                .database_url
                .context("DATABASE_URL is required for the relational backend")?;
            let pool = create_pool(&url, 2).await?;
            load_relational(&pool, &cli.csv, cli.batch_size).await?
        }
        Backend::Document => {
            let config = DocumentConfig::from_env()?;
            let db = connect_document_store(&config).await?;
            load_document(&db, &cli.csv, cli.batch_size).await?
        }
    };

    summary.log();
    Ok(())
}
