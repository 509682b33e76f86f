use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Audit row written by the `bookings_status_audit` trigger. Read-only from Rust.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingLogRow {
    pub log_id: i64,
    pub booking_id: i64,
    pub old_status: Option<String>,
    pub new_status: Option<String>,
    pub old_is_canceled: Option<bool>,
    pub new_is_canceled: Option<bool>,
    pub changed_at: DateTime<Utc>,
}
