use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;

pub const MIN_ARRIVAL_YEAR: i32 = 2000;
pub const MAX_ARRIVAL_YEAR: i32 = 2100;

/// Widths of the VARCHAR booking columns.
pub const MAX_STATUS_LEN: usize = 20;
pub const MAX_SEGMENT_LEN: usize = 30;

/// Scalar booking attributes shared by both stores and the CSV loader.
/// The relational store keeps them as flat columns; the document store
/// regroups them into nested sub-objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BookingAttributes {
    pub lead_time: i32,
    pub arrival_date_year: i32,
    pub arrival_date_month: String,
    pub arrival_date_week_number: i32,
    pub arrival_date_day_of_month: i32,
    #[serde(default)]
    pub stays_in_weekend_nights: i32,
    #[serde(default)]
    pub stays_in_week_nights: i32,
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
    #[serde(default)]
    pub babies: i32,
    pub meal: String,
    pub market_segment: String,
    pub distribution_channel: String,
    #[serde(default)]
    pub previous_cancellations: i32,
    #[serde(default)]
    pub previous_bookings_not_canceled: i32,
    pub reserved_room_type: String,
    pub assigned_room_type: String,
    #[serde(default)]
    pub booking_changes: i32,
    pub deposit_type: String,
    #[serde(default)]
    pub agent: Option<i32>,
    #[serde(default)]
    pub company: Option<i32>,
    #[serde(default)]
    pub days_in_waiting_list: i32,
    pub adr: f64,
    #[serde(default)]
    pub required_car_parking_spaces: i32,
    #[serde(default)]
    pub total_of_special_requests: i32,
    #[serde(default)]
    pub is_canceled: bool,
    pub reservation_status: String,
    #[serde(default)]
    pub reservation_status_date: Option<NaiveDate>,
}

impl BookingAttributes {
    /// Field-level range checks applied before either store is touched.
    pub fn validate(&self) -> Result<(), AppError> {
        non_negative("lead_time", self.lead_time)?;
        in_range(
            "arrival_date_year",
            self.arrival_date_year,
            MIN_ARRIVAL_YEAR,
            MAX_ARRIVAL_YEAR,
        )?;
        in_range(
            "arrival_date_week_number",
            self.arrival_date_week_number,
            1,
            53,
        )?;
        in_range(
            "arrival_date_day_of_month",
            self.arrival_date_day_of_month,
            1,
            31,
        )?;
        if self.adults <= 0 {
            return Err(AppError::UnprocessableEntity(
                "adults must be greater than 0".to_string(),
            ));
        }
        for (field, value) in [
            ("stays_in_weekend_nights", self.stays_in_weekend_nights),
            ("stays_in_week_nights", self.stays_in_week_nights),
            ("children", self.children),
            ("babies", self.babies),
            ("previous_cancellations", self.previous_cancellations),
            (
                "previous_bookings_not_canceled",
                self.previous_bookings_not_canceled,
            ),
            ("booking_changes", self.booking_changes),
            ("days_in_waiting_list", self.days_in_waiting_list),
            (
                "required_car_parking_spaces",
                self.required_car_parking_spaces,
            ),
            ("total_of_special_requests", self.total_of_special_requests),
        ] {
            non_negative(field, value)?;
        }
        if self.adr.is_nan() || self.adr < 0.0 {
            return Err(AppError::UnprocessableEntity(
                "adr must be a non-negative number".to_string(),
            ));
        }
        for (field, value) in [
            ("arrival_date_month", &self.arrival_date_month),
            ("meal", &self.meal),
            ("deposit_type", &self.deposit_type),
            ("reservation_status", &self.reservation_status),
        ] {
            max_len(field, value, MAX_STATUS_LEN)?;
        }
        for (field, value) in [
            ("market_segment", &self.market_segment),
            ("distribution_channel", &self.distribution_channel),
        ] {
            max_len(field, value, MAX_SEGMENT_LEN)?;
        }
        for (field, value) in [
            ("reserved_room_type", &self.reserved_room_type),
            ("assigned_room_type", &self.assigned_room_type),
        ] {
            if value.chars().count() > 1 {
                return Err(AppError::UnprocessableEntity(format!(
                    "{field} must be a single character"
                )));
            }
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: i32) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::UnprocessableEntity(format!(
            "{field} cannot be negative"
        )));
    }
    Ok(())
}

pub(crate) fn max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::UnprocessableEntity(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn in_range(field: &str, value: i32, min: i32, max: i32) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::UnprocessableEntity(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

/// Body of `POST /bookings`. `Id` is `i64` for the relational API and the
/// opaque string key for the document API.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingCreate<Id> {
    pub hotel_id: Id,
    pub guest_id: Id,
    #[serde(flatten)]
    pub attributes: BookingAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingRow {
    pub booking_id: i64,
    pub hotel_id: i64,
    pub guest_id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub attributes: BookingAttributes,
    pub created_at: DateTime<Utc>,
}

/// Body of `PUT /bookings/{id}`. Only these four fields are ever updatable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingUpdate {
    pub reservation_status: Option<String>,
    pub is_canceled: Option<bool>,
    pub booking_changes: Option<i32>,
    pub adr: Option<f64>,
}

/// The whitelisted booking columns and where each lives in either store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingColumn {
    ReservationStatus,
    IsCanceled,
    BookingChanges,
    Adr,
}

impl BookingColumn {
    pub fn column_name(self) -> &'static str {
        match self {
            BookingColumn::ReservationStatus => "reservation_status",
            BookingColumn::IsCanceled => "is_canceled",
            BookingColumn::BookingChanges => "booking_changes",
            BookingColumn::Adr => "adr",
        }
    }

    pub fn document_path(self) -> &'static str {
        match self {
            BookingColumn::ReservationStatus => "status.reservation_status",
            BookingColumn::IsCanceled => "status.is_canceled",
            BookingColumn::BookingChanges => "booking_details.booking_changes",
            BookingColumn::Adr => "booking_details.adr",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatchValue {
    Text(String),
    Bool(bool),
    Int(i32),
    Float(f64),
}

/// Ordered `(column, value)` pairs built from whichever update fields were present.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPatch {
    fields: Vec<(BookingColumn, PatchValue)>,
}

impl FieldPatch {
    pub fn iter(&self) -> impl Iterator<Item = &(BookingColumn, PatchValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<BookingUpdate> for FieldPatch {
    type Error = AppError;

    fn try_from(update: BookingUpdate) -> Result<Self, AppError> {
        let mut fields = Vec::new();
        if let Some(status) = update.reservation_status {
            max_len("reservation_status", &status, MAX_STATUS_LEN)?;
            fields.push((BookingColumn::ReservationStatus, PatchValue::Text(status)));
        }
        if let Some(is_canceled) = update.is_canceled {
            fields.push((BookingColumn::IsCanceled, PatchValue::Bool(is_canceled)));
        }
        if let Some(changes) = update.booking_changes {
            non_negative("booking_changes", changes)?;
            fields.push((BookingColumn::BookingChanges, PatchValue::Int(changes)));
        }
        if let Some(adr) = update.adr {
            if adr.is_nan() || adr < 0.0 {
                return Err(AppError::UnprocessableEntity(
                    "adr must be a non-negative number".to_string(),
                ));
            }
            fields.push((BookingColumn::Adr, PatchValue::Float(adr)));
        }

        if fields.is_empty() {
            return Err(AppError::BadRequest("No fields to update".to_string()));
        }
        Ok(FieldPatch { fields })
    }
}
