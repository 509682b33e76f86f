//! Cancellation prediction glue: pull bookings from the HTTP API, score each
//! one with the external classifier, persist the result in both stores.

pub mod classifier;
pub mod features;

use chrono::Utc;
use reqwest::Client;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::db::DocumentStore;
use crate::models::booking::BookingRow;
use crate::models::prediction::Prediction;
use crate::prediction::classifier::{ModelClient, ModelError, Outcome};
use crate::prediction::features::feature_vector;
use crate::{document, relational};

/// Fetches `GET {base_url}/api/v1/bookings?limit=N`.
pub async fn fetch_bookings(
    client: &Client,
    base_url: &str,
    limit: u32,
) -> Result<Vec<BookingRow>, reqwest::Error> {
    client
        .get(format!("{}/api/v1/bookings", base_url.trim_end_matches('/')))
        .query(&[("limit", limit)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}

/// Turns a classifier answer into a stored prediction. A failed call still
/// yields a record, at even odds, with the error kept in `notes`.
pub fn build_prediction(
    booking: &BookingRow,
    features: Vec<f64>,
    outcome: Result<Outcome, ModelError>,
    model_version: &str,
) -> Prediction {
    let (outcome, notes) = match outcome {
        Ok(outcome) => (outcome, None),
        Err(e) => {
            warn!("Classifier failed for booking {}: {e}", booking.booking_id);
            (Outcome::fallback(), Some(format!("Prediction failed: {e}")))
        }
    };
    Prediction {
        booking_id: booking.booking_id,
        predicted_canceled: outcome.predicted_canceled,
        cancellation_probability: outcome.cancellation_probability,
        not_cancelled_probability: outcome.not_cancelled_probability,
        features_used: features,
        model_version: model_version.to_string(),
        notes,
        created_at: Utc::now(),
    }
}

pub async fn predict_booking(
    model: &ModelClient,
    booking: &BookingRow,
    model_version: &str,
) -> Prediction {
    let features = feature_vector(&booking.attributes);
    let outcome = model.predict(&features).await;
    build_prediction(booking, features.to_vec(), outcome, model_version)
}

/// Which stores accepted a prediction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Persisted {
    pub relational: bool,
    pub document: bool,
}

/// Writes to each store independently; a failure in one does not stop the other.
pub async fn persist_prediction(
    pool: &PgPool,
    documents: &DocumentStore,
    prediction: &Prediction,
) -> Persisted {
    let relational = match relational::predictions::insert_prediction(pool, prediction).await {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Failed to store prediction for booking {} in relational store: {e}",
                prediction.booking_id
            );
            false
        }
    };
    let document = match document::predictions::insert_prediction(documents, prediction).await {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Failed to store prediction for booking {} in document store: {e}",
                prediction.booking_id
            );
            false
        }
    };
    if relational && document {
        info!(
            "Stored prediction for booking {} (p_cancel={:.3})",
            prediction.booking_id, prediction.cancellation_probability
        );
    }
    Persisted {
        relational,
        document,
    }
}
