use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::booking::max_len;

/// Country used when a source row has none.
pub const UNKNOWN_COUNTRY: &str = "UNK";

pub const MAX_CUSTOMER_TYPE_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GuestRow {
    pub guest_id: i64,
    pub country: String,
    pub is_repeated_guest: bool,
    pub customer_type: String,
    pub created_at: DateTime<Utc>,
}

/// Natural key of a guest bucket: many travellers share one record.
/// Also the body of `POST`/`PUT /guests`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GuestKey {
    pub country: String,
    #[serde(default)]
    pub is_repeated_guest: bool,
    pub customer_type: String,
}

impl GuestKey {
    pub fn validate(&self) -> Result<(), AppError> {
        let country_len = self.country.chars().count();
        if country_len == 0 || country_len > 3 {
            return Err(AppError::UnprocessableEntity(
                "country must be a code of 1 to 3 characters".to_string(),
            ));
        }
        if self.customer_type.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "customer_type cannot be empty".to_string(),
            ));
        }
        max_len("customer_type", &self.customer_type, MAX_CUSTOMER_TYPE_LEN)
    }
}
