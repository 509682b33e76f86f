//! Client for the external cancellation classifier.
//!
//! The service takes `{"instances": [[f64; 16]]}` and answers
//! `{"predictions": [0|1], "probabilities": [[p_not, p_cancel]]}`.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::prediction::features::FEATURE_COUNT;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model returned no prediction")]
    Empty,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: Vec<&'a [f64]>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<u8>,
    probabilities: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub predicted_canceled: bool,
    pub cancellation_probability: f64,
    pub not_cancelled_probability: f64,
}

impl Outcome {
    /// Used when the classifier cannot be reached or answers nonsense.
    pub fn fallback() -> Self {
        Self {
            predicted_canceled: false,
            cancellation_probability: 0.5,
            not_cancelled_probability: 0.5,
        }
    }
}

#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    url: String,
}

impl ModelClient {
    pub fn new(url: String) -> Result<Self, ModelError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(30)).build()?,
            url,
        })
    }

    /// One classifier call per booking. No retries.
    pub async fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<Outcome, ModelError> {
        let response = self
            .client
            .post(&self.url)
            .json(&PredictRequest {
                instances: vec![features.as_slice()],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PredictResponse = response.json().await?;
        debug!("Classifier answered {:?}", body);

        let label = body.predictions.first().ok_or(ModelError::Empty)?;
        let probabilities = body.probabilities.first().ok_or(ModelError::Empty)?;
        let [not_cancelled, cancelled] = probabilities.as_slice() else {
            return Err(ModelError::Empty);
        };
        Ok(Outcome {
            predicted_canceled: *label == 1,
            cancellation_probability: *cancelled,
            not_cancelled_probability: *not_cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;

    /// Serves `reply` on an ephemeral port and returns the predict URL.
    async fn serve(reply: Value) -> String {
        let app = Router::new().route(
            "/predict",
            post(move |Json(body): Json<Value>| {
                let reply = reply.clone();
                async move {
                    assert_eq!(body["instances"][0].as_array().map(Vec::len), Some(16));
                    Json(reply)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/predict")
    }

    #[tokio::test]
    async fn test_parses_classifier_reply() {
        let url = serve(json!({"predictions": [1], "probabilities": [[0.3, 0.7]]})).await;
        let client = ModelClient::new(url).unwrap();
        let outcome = client.predict(&[0.0; FEATURE_COUNT]).await.unwrap();
        assert!(outcome.predicted_canceled);
        assert_eq!(outcome.cancellation_probability, 0.7);
        assert_eq!(outcome.not_cancelled_probability, 0.3);
    }

    #[tokio::test]
    async fn test_empty_reply_is_error() {
        let url = serve(json!({"predictions": [], "probabilities": []})).await;
        let client = ModelClient::new(url).unwrap();
        let err = client.predict(&[0.0; FEATURE_COUNT]).await.unwrap_err();
        assert!(matches!(err, ModelError::Empty));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let client = ModelClient::new("http://127.0.0.1:1/predict".to_string()).unwrap();
        let err = client.predict(&[0.0; FEATURE_COUNT]).await.unwrap_err();
        assert!(matches!(err, ModelError::Http(_)));
    }
}
