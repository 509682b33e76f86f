use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use surrealdb::engine::any::{self, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;
use tracing::info;

use crate::config::DocumentConfig;

/// Handle to the document store shared by every request.
pub type DocumentStore = Surreal<Any>;

/// Creates a PostgreSQL connection pool and applies the bundled schema.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply relational schema")?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Connects to the document store, selects namespace/database and defines indexes.
pub async fn connect_document_store(config: &DocumentConfig) -> Result<DocumentStore> {
    info!("Connecting to document store at {}...", config.url);

    let db = any::connect(config.url.as_str())
        .await
        .with_context(|| format!("Failed to connect to document store at {}", config.url))?;

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        db.signin(Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await
        .context("Document store sign-in failed")?;
    }

    db.use_ns(config.namespace.as_str())
        .use_db(config.database.as_str())
        .await
        .context("Failed to select document namespace/database")?;

    define_document_schema(&db).await?;

    info!(
        "Document store ready ({}/{})",
        config.namespace, config.database
    );
    Ok(db)
}

/// Index definitions for the document tables. Tables stay schemaless.
const DOCUMENT_SCHEMA: &str = r#"
DEFINE INDEX IF NOT EXISTS hotel_name_unique ON TABLE hotel FIELDS hotel_name UNIQUE;
DEFINE INDEX IF NOT EXISTS guest_natural_key ON TABLE guest FIELDS country, is_repeated_guest, customer_type UNIQUE;
DEFINE INDEX IF NOT EXISTS booking_lead_time ON TABLE booking FIELDS booking_details.lead_time;
DEFINE INDEX IF NOT EXISTS booking_is_canceled ON TABLE booking FIELDS status.is_canceled;
DEFINE INDEX IF NOT EXISTS booking_reservation_status ON TABLE booking FIELDS status.reservation_status;
DEFINE INDEX IF NOT EXISTS prediction_booking_id ON TABLE prediction FIELDS booking_id;
"#;

pub async fn define_document_schema(db: &DocumentStore) -> Result<()> {
    db.query(DOCUMENT_SCHEMA)
        .await
        .context("Failed to send document schema")?
        .check()
        .context("Failed to define document indexes")?;
    Ok(())
}
