use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "relational_api": "/api/v1",
        "document_api": "/api/v1/document",
        "document_store": format!(
            "{}/{}",
            state.config.document.namespace, state.config.document.database
        ),
    }))
}

/// GET /health
/// 200 when both stores answer, 503 otherwise. Same body either way.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let relational_connected = sqlx::query("SELECT 1").execute(&state.db).await.is_ok();
    let document_connected = state.documents.health().await.is_ok();

    let healthy = relational_connected && document_connected;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if healthy { "healthy" } else { "unhealthy" },
            "relational_connected": relational_connected,
            "document_connected": document_connected,
            "timestamp": Utc::now().to_rfc3339(),
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
