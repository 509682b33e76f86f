use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cancellation prediction for one booking, written to both stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub booking_id: i64,
    pub predicted_canceled: bool,
    pub cancellation_probability: f64,
    pub not_cancelled_probability: f64,
    pub features_used: Vec<f64>,
    pub model_version: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
