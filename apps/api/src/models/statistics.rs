use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Output of `get_booking_statistics()`. `cancellation_rate` is a percentage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingStatistics {
    pub total_bookings: i64,
    pub cancellation_rate: f64,
    pub avg_adr: f64,
    pub most_common_country: Option<String>,
}
