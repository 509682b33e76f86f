use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

pub const MAX_HOTEL_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HotelRow {
    pub hotel_id: i64,
    pub hotel_name: String,
    pub created_at: DateTime<Utc>,
}

/// Natural key of a hotel. Also the body of `POST`/`PUT /hotels`.
/// The name is stored trimmed so padded spellings resolve to one hotel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HotelKey {
    #[serde(deserialize_with = "trimmed")]
    pub hotel_name: String,
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

impl HotelKey {
    pub fn new(hotel_name: impl Into<String>) -> Self {
        Self {
            hotel_name: hotel_name.into().trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let name = self.hotel_name.trim();
        if name.is_empty() {
            return Err(AppError::UnprocessableEntity(
                "hotel_name cannot be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_HOTEL_NAME_LEN {
            return Err(AppError::UnprocessableEntity(format!(
                "hotel_name must be at most {MAX_HOTEL_NAME_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        assert!(HotelKey::new("   ").validate().is_err());
    }

    #[test]
    fn test_name_is_trimmed() {
        assert_eq!(HotelKey::new(" City Hotel ").hotel_name, "City Hotel");
        let key: HotelKey = serde_json::from_str(r#"{"hotel_name":"  City Hotel"}"#).unwrap();
        assert_eq!(key, HotelKey::new("City Hotel"));
    }

    #[test]
    fn test_long_name_rejected() {
        assert!(HotelKey::new("x".repeat(51)).validate().is_err());
        assert!(HotelKey::new("x".repeat(50)).validate().is_ok());
    }
}
