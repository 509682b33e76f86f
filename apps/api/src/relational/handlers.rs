//! Axum route handlers for the relational API (`/api/v1`).

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::booking::{BookingCreate, BookingRow, BookingUpdate};
use crate::models::guest::{GuestKey, GuestRow};
use crate::models::hotel::{HotelKey, HotelRow};
use crate::models::log::BookingLogRow;
use crate::models::statistics::BookingStatistics;
use crate::relational::{reports, PgBookings, PgGuests, PgHotels};
use crate::repository::{CreateResponse, Page, Repository, DEFAULT_PAGE_LIMIT};
use crate::routes::create_response;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    #[serde(default)]
    pub skip: u32,
    pub limit: Option<u32>,
    pub is_canceled: Option<bool>,
}

// ────────────────────────────────────────────────────────────────────────────
// Hotels
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/hotels
pub async fn create_hotel(
    State(state): State<AppState>,
    AppJson(req): AppJson<HotelKey>,
) -> Result<(StatusCode, Json<CreateResponse<HotelRow>>), AppError> {
    let created = PgHotels::new(state.db).create(req).await?;
    Ok(create_response(created, "Hotel"))
}

/// GET /api/v1/hotels/:id
pub async fn get_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<HotelRow>, AppError> {
    Ok(Json(PgHotels::new(state.db).find(&id).await?))
}

/// GET /api/v1/hotels
pub async fn list_hotels(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> Result<Json<Vec<HotelRow>>, AppError> {
    Ok(Json(PgHotels::new(state.db).list(page).await?))
}

/// PUT /api/v1/hotels/:id
pub async fn update_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<HotelKey>,
) -> Result<Json<HotelRow>, AppError> {
    Ok(Json(PgHotels::new(state.db).update(&id, req).await?))
}

/// DELETE /api/v1/hotels/:id
pub async fn delete_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    PgHotels::new(state.db).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Guests
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/guests
pub async fn create_guest(
    State(state): State<AppState>,
    AppJson(req): AppJson<GuestKey>,
) -> Result<(StatusCode, Json<CreateResponse<GuestRow>>), AppError> {
    let created = PgGuests::new(state.db).create(req).await?;
    Ok(create_response(created, "Guest"))
}

/// GET /api/v1/guests/:id
pub async fn get_guest(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<GuestRow>, AppError> {
    Ok(Json(PgGuests::new(state.db).find(&id).await?))
}

/// GET /api/v1/guests
pub async fn list_guests(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> Result<Json<Vec<GuestRow>>, AppError> {
    Ok(Json(PgGuests::new(state.db).list(page).await?))
}

/// PUT /api/v1/guests/:id
pub async fn update_guest(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<GuestKey>,
) -> Result<Json<GuestRow>, AppError> {
    Ok(Json(PgGuests::new(state.db).update(&id, req).await?))
}

/// DELETE /api/v1/guests/:id
pub async fn delete_guest(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    PgGuests::new(state.db).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Bookings
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<BookingCreate<i64>>,
) -> Result<(StatusCode, Json<CreateResponse<BookingRow>>), AppError> {
    let created = PgBookings::new(state.db).create(req).await?;
    Ok(create_response(created, "Booking"))
}

/// GET /api/v1/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<BookingRow>, AppError> {
    Ok(Json(PgBookings::new(state.db).find(&id).await?))
}

/// GET /api/v1/bookings?skip=&limit=&is_canceled=
pub async fn list_bookings(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<BookingListQuery>,
) -> Result<Json<Vec<BookingRow>>, AppError> {
    let page = Page::new(params.skip, params.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
    let rows = PgBookings::new(state.db)
        .list_filtered(page, params.is_canceled)
        .await?;
    Ok(Json(rows))
}

/// PUT /api/v1/bookings/:id
///
/// Only `reservation_status`, `is_canceled`, `booking_changes` and `adr` are
/// applied; a body with none of them is rejected.
pub async fn update_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
    AppJson(req): AppJson<BookingUpdate>,
) -> Result<Json<BookingRow>, AppError> {
    Ok(Json(PgBookings::new(state.db).update(&id, req).await?))
}

/// DELETE /api/v1/bookings/:id
pub async fn delete_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    PgBookings::new(state.db).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Reports
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/statistics
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<BookingStatistics>, AppError> {
    Ok(Json(reports::booking_statistics(&state.db).await?))
}

/// GET /api/v1/bookings/logs
pub async fn get_booking_logs(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> Result<Json<Vec<BookingLogRow>>, AppError> {
    Ok(Json(reports::booking_logs(&state.db, page).await?))
}
