use crate::db::DocumentStore;
use crate::document::{new_key, PREDICTION};
use crate::errors::AppError;
use crate::models::prediction::Prediction;

/// Stores a prediction as its own document and returns its key.
pub async fn insert_prediction(
    db: &DocumentStore,
    prediction: &Prediction,
) -> Result<String, AppError> {
    let key = new_key();
    db.query("CREATE type::thing($tb, $key) CONTENT $doc RETURN NONE")
        .bind(("tb", PREDICTION))
        .bind(("key", key.clone()))
        .bind(("doc", prediction.clone()))
        .await?
        .check()?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::testing::memory_store;
    use chrono::Utc;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Stored {
        booking_id: i64,
        cancellation_probability: f64,
        features_used: Vec<f64>,
    }

    #[tokio::test]
    async fn test_prediction_is_stored() {
        let db = memory_store().await;
        let prediction = Prediction {
            booking_id: 42,
            predicted_canceled: true,
            cancellation_probability: 0.8,
            not_cancelled_probability: 0.2,
            features_used: vec![1.0; 16],
            model_version: "test".to_string(),
            notes: None,
            created_at: Utc::now(),
        };
        insert_prediction(&db, &prediction).await.unwrap();

        let stored: Vec<Stored> = db
            .query("SELECT * FROM prediction WHERE booking_id = $id")
            .bind(("id", 42))
            .await
            .unwrap()
            .take(0)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].booking_id, 42);
        assert_eq!(stored[0].cancellation_probability, 0.8);
        assert_eq!(stored[0].features_used.len(), 16);
    }
}
