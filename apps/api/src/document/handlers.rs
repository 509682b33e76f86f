//! Axum route handlers for the document API (`/api/v1/document`).

use axum::{extract::State, http::StatusCode, Json};

use crate::document::models::{BookingRecord, GuestRecord, HotelRecord};
use crate::document::{DocBookings, DocGuests, DocHotels};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::booking::{BookingCreate, BookingUpdate};
use crate::models::guest::GuestKey;
use crate::models::hotel::HotelKey;
use crate::relational::handlers::BookingListQuery;
use crate::repository::{CreateResponse, Page, Repository, DEFAULT_PAGE_LIMIT};
use crate::routes::create_response;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Hotels
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_hotel(
    State(state): State<AppState>,
    AppJson(req): AppJson<HotelKey>,
) -> Result<(StatusCode, Json<CreateResponse<HotelRecord>>), AppError> {
    let created = DocHotels::new(state.documents).create(req).await?;
    Ok(create_response(created, "Hotel"))
}

pub async fn get_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<HotelRecord>, AppError> {
    Ok(Json(DocHotels::new(state.documents).find(&id).await?))
}

pub async fn list_hotels(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> Result<Json<Vec<HotelRecord>>, AppError> {
    Ok(Json(DocHotels::new(state.documents).list(page).await?))
}

pub async fn update_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<HotelKey>,
) -> Result<Json<HotelRecord>, AppError> {
    Ok(Json(DocHotels::new(state.documents).update(&id, req).await?))
}

pub async fn delete_hotel(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    DocHotels::new(state.documents).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Guests
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_guest(
    State(state): State<AppState>,
    AppJson(req): AppJson<GuestKey>,
) -> Result<(StatusCode, Json<CreateResponse<GuestRecord>>), AppError> {
    let created = DocGuests::new(state.documents).create(req).await?;
    Ok(create_response(created, "Guest"))
}

pub async fn get_guest(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<GuestRecord>, AppError> {
    Ok(Json(DocGuests::new(state.documents).find(&id).await?))
}

pub async fn list_guests(
    State(state): State<AppState>,
    AppQuery(page): AppQuery<Page>,
) -> Result<Json<Vec<GuestRecord>>, AppError> {
    Ok(Json(DocGuests::new(state.documents).list(page).await?))
}

pub async fn update_guest(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<GuestKey>,
) -> Result<Json<GuestRecord>, AppError> {
    Ok(Json(DocGuests::new(state.documents).update(&id, req).await?))
}

pub async fn delete_guest(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    DocGuests::new(state.documents).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Bookings
// ────────────────────────────────────────────────────────────────────────────

pub async fn create_booking(
    State(state): State<AppState>,
    AppJson(req): AppJson<BookingCreate<String>>,
) -> Result<(StatusCode, Json<CreateResponse<BookingRecord>>), AppError> {
    let created = DocBookings::new(state.documents).create(req).await?;
    Ok(create_response(created, "Booking"))
}

pub async fn get_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<BookingRecord>, AppError> {
    Ok(Json(DocBookings::new(state.documents).find(&id).await?))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<BookingListQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let page = Page::new(params.skip, params.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
    let records = DocBookings::new(state.documents)
        .list_filtered(page, params.is_canceled)
        .await?;
    Ok(Json(records))
}

pub async fn update_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(req): AppJson<BookingUpdate>,
) -> Result<Json<BookingRecord>, AppError> {
    Ok(Json(DocBookings::new(state.documents).update(&id, req).await?))
}

pub async fn delete_booking(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<StatusCode, AppError> {
    DocBookings::new(state.documents).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
