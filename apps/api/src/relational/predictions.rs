use sqlx::types::Json;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::prediction::Prediction;

/// Writes a prediction straight into `predictions`, bypassing the HTTP layer.
pub async fn insert_prediction(pool: &PgPool, prediction: &Prediction) -> Result<i64, AppError> {
    Ok(sqlx::query_scalar(
        r#"
        INSERT INTO predictions
            (booking_id, predicted_canceled, cancellation_probability,
             not_cancelled_probability, features_used, model_version, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING prediction_id
        "#,
    )
    .bind(prediction.booking_id)
    .bind(prediction.predicted_canceled)
    .bind(prediction.cancellation_probability)
    .bind(prediction.not_cancelled_probability)
    .bind(Json(&prediction.features_used))
    .bind(&prediction.model_version)
    .bind(&prediction.notes)
    .bind(prediction.created_at)
    .fetch_one(pool)
    .await?)
}
