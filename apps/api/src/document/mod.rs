//! Document accessor: hotels, guests and denormalized bookings as SurrealDB
//! documents.
//!
//! Record keys are UUID strings chosen at insert time and handed to callers as
//! opaque ids. Reads project the key with `meta::id(id)`, so the models never
//! carry a `RecordId`.

pub mod bookings;
pub mod guests;
pub mod handlers;
pub mod hotels;
pub mod keys;
pub mod models;
pub mod predictions;

pub use bookings::DocBookings;
pub use guests::DocGuests;
pub use hotels::DocHotels;

use serde::Deserialize;
use uuid::Uuid;

use crate::db::DocumentStore;
use crate::errors::AppError;

pub const HOTEL: &str = "hotel";
pub const GUEST: &str = "guest";
pub const BOOKING: &str = "booking";
pub const PREDICTION: &str = "prediction";

/// Single-column projection of a record key.
#[derive(Debug, Deserialize)]
pub(crate) struct KeyRow {
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

/// Number of records in `table`.
pub async fn count_records(db: &DocumentStore, table: &'static str) -> Result<i64, AppError> {
    let rows: Vec<CountRow> = db
        .query("SELECT count() AS count FROM type::table($tb) GROUP ALL")
        .bind(("tb", table))
        .await?
        .take(0)?;
    Ok(rows.first().map(|row| row.count).unwrap_or(0))
}

pub(crate) fn new_key() -> String {
    Uuid::new_v4().to_string()
}

/// Parses a caller-supplied id. Malformed ids are a `BadRequest`, never a `NotFound`.
pub fn parse_key(raw: &str, entity: &str) -> Result<String, AppError> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid {entity} ID format")))
}
