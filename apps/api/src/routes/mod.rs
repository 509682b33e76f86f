pub mod health;

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::document::handlers as document;
use crate::relational::handlers as relational;
use crate::repository::{CreateResponse, Created};
use crate::state::AppState;

/// 201 for a fresh insert; 200 plus "`label` already exists" when the natural
/// key resolved to a record that was already there.
pub(crate) fn create_response<T: Serialize>(
    created: Created<T>,
    label: &str,
) -> (StatusCode, Json<CreateResponse<T>>) {
    match created {
        Created::New(record) => (
            StatusCode::CREATED,
            Json(CreateResponse {
                record,
                message: None,
            }),
        ),
        Created::Existing(record) => (
            StatusCode::OK,
            Json(CreateResponse {
                record,
                message: Some(format!("{label} already exists")),
            }),
        ),
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Relational API
        .route(
            "/api/v1/hotels",
            get(relational::list_hotels).post(relational::create_hotel),
        )
        .route(
            "/api/v1/hotels/:id",
            get(relational::get_hotel)
                .put(relational::update_hotel)
                .delete(relational::delete_hotel),
        )
        .route(
            "/api/v1/guests",
            get(relational::list_guests).post(relational::create_guest),
        )
        .route(
            "/api/v1/guests/:id",
            get(relational::get_guest)
                .put(relational::update_guest)
                .delete(relational::delete_guest),
        )
        .route(
            "/api/v1/bookings",
            get(relational::list_bookings).post(relational::create_booking),
        )
        .route("/api/v1/bookings/logs", get(relational::get_booking_logs))
        .route(
            "/api/v1/bookings/:id",
            get(relational::get_booking)
                .put(relational::update_booking)
                .delete(relational::delete_booking),
        )
        .route("/api/v1/statistics", get(relational::get_statistics))
        // Document API
        .route(
            "/api/v1/document/hotels",
            get(document::list_hotels).post(document::create_hotel),
        )
        .route(
            "/api/v1/document/hotels/:id",
            get(document::get_hotel)
                .put(document::update_hotel)
                .delete(document::delete_hotel),
        )
        .route(
            "/api/v1/document/guests",
            get(document::list_guests).post(document::create_guest),
        )
        .route(
            "/api/v1/document/guests/:id",
            get(document::get_guest)
                .put(document::update_guest)
                .delete(document::delete_guest),
        )
        .route(
            "/api/v1/document/bookings",
            get(document::list_bookings).post(document::create_booking),
        )
        .route(
            "/api/v1/document/bookings/:id",
            get(document::get_booking)
                .put(document::update_booking)
                .delete(document::delete_booking),
        )
        .with_state(state)
}
