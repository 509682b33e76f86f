//! Bulk CSV loading into either store.
//!
//! Rows stream from disk one at a time. Each row is cleaned, its hotel and
//! guest resolved through the identity resolver (memoized per run), and the
//! booking written. A row that fails is logged with its row number and skipped.

pub mod document;
pub mod relational;

use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::booking::BookingAttributes;
use crate::models::guest::{GuestKey, UNKNOWN_COUNTRY};
use crate::models::hotel::HotelKey;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// One CSV record as read. Columns may be missing altogether.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsvRow {
    pub hotel: Option<String>,
    pub is_canceled: Option<String>,
    pub lead_time: Option<String>,
    pub arrival_date_year: Option<String>,
    pub arrival_date_month: Option<String>,
    pub arrival_date_week_number: Option<String>,
    pub arrival_date_day_of_month: Option<String>,
    pub stays_in_weekend_nights: Option<String>,
    pub stays_in_week_nights: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,
    pub babies: Option<String>,
    pub meal: Option<String>,
    pub country: Option<String>,
    pub market_segment: Option<String>,
    pub distribution_channel: Option<String>,
    pub is_repeated_guest: Option<String>,
    pub previous_cancellations: Option<String>,
    pub previous_bookings_not_canceled: Option<String>,
    pub reserved_room_type: Option<String>,
    pub assigned_room_type: Option<String>,
    pub booking_changes: Option<String>,
    pub deposit_type: Option<String>,
    pub agent: Option<String>,
    pub company: Option<String>,
    pub days_in_waiting_list: Option<String>,
    pub customer_type: Option<String>,
    pub adr: Option<String>,
    pub required_car_parking_spaces: Option<String>,
    pub total_of_special_requests: Option<String>,
    pub reservation_status: Option<String>,
    pub reservation_status_date: Option<String>,
}

/// Empty, missing and the literal `NULL` are absent; anything else is trimmed.
pub fn clean_value(value: Option<&str>) -> Option<&str> {
    match value {
        None | Some("") | Some("NULL") => None,
        Some(v) => Some(v.trim()),
    }
}

fn text(field: &str, value: &Option<String>) -> Result<String, AppError> {
    clean_value(value.as_deref())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(format!("missing value for {field}")))
}

fn number<T: FromStr + Default>(field: &str, value: &Option<String>) -> Result<T, AppError> {
    match clean_value(value.as_deref()) {
        None => Ok(T::default()),
        Some(v) => parse(field, v),
    }
}

fn optional_number(field: &str, value: &Option<String>) -> Result<Option<i32>, AppError> {
    clean_value(value.as_deref())
        .map(|v| parse(field, v))
        .transpose()
}

fn parse<T: FromStr>(field: &str, value: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {field}: {value:?}")))
}

fn flag(value: &Option<String>) -> bool {
    clean_value(value.as_deref()) == Some("1")
}

/// A cleaned row: the two natural keys plus the booking itself.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRow {
    pub hotel: HotelKey,
    pub guest: GuestKey,
    pub attributes: BookingAttributes,
}

impl TryFrom<CsvRow> for LoadedRow {
    type Error = AppError;

    fn try_from(row: CsvRow) -> Result<Self, AppError> {
        let hotel = HotelKey::new(text("hotel", &row.hotel)?);
        let guest = GuestKey {
            country: clean_value(row.country.as_deref())
                .unwrap_or(UNKNOWN_COUNTRY)
                .to_string(),
            is_repeated_guest: flag(&row.is_repeated_guest),
            customer_type: text("customer_type", &row.customer_type)?,
        };
        let reservation_status_date = clean_value(row.reservation_status_date.as_deref())
            .map(|v| {
                NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                    AppError::BadRequest(format!("invalid reservation_status_date: {v:?}"))
                })
            })
            .transpose()?;

        let attributes = BookingAttributes {
            lead_time: number("lead_time", &row.lead_time)?,
            arrival_date_year: number("arrival_date_year", &row.arrival_date_year)?,
            arrival_date_month: text("arrival_date_month", &row.arrival_date_month)?,
            arrival_date_week_number: number(
                "arrival_date_week_number",
                &row.arrival_date_week_number,
            )?,
            arrival_date_day_of_month: number(
                "arrival_date_day_of_month",
                &row.arrival_date_day_of_month,
            )?,
            stays_in_weekend_nights: number(
                "stays_in_weekend_nights",
                &row.stays_in_weekend_nights,
            )?,
            stays_in_week_nights: number("stays_in_week_nights", &row.stays_in_week_nights)?,
            adults: number("adults", &row.adults)?,
            children: number("children", &row.children)?,
            babies: number("babies", &row.babies)?,
            meal: text("meal", &row.meal)?,
            market_segment: text("market_segment", &row.market_segment)?,
            distribution_channel: text("distribution_channel", &row.distribution_channel)?,
            previous_cancellations: number(
                "previous_cancellations",
                &row.previous_cancellations,
            )?,
            previous_bookings_not_canceled: number(
                "previous_bookings_not_canceled",
                &row.previous_bookings_not_canceled,
            )?,
            reserved_room_type: text("reserved_room_type", &row.reserved_room_type)?,
            assigned_room_type: text("assigned_room_type", &row.assigned_room_type)?,
            booking_changes: number("booking_changes", &row.booking_changes)?,
            deposit_type: text("deposit_type", &row.deposit_type)?,
            agent: optional_number("agent", &row.agent)?,
            company: optional_number("company", &row.company)?,
            days_in_waiting_list: number("days_in_waiting_list", &row.days_in_waiting_list)?,
            adr: number("adr", &row.adr)?,
            required_car_parking_spaces: number(
                "required_car_parking_spaces",
                &row.required_car_parking_spaces,
            )?,
            total_of_special_requests: number(
                "total_of_special_requests",
                &row.total_of_special_requests,
            )?,
            is_canceled: flag(&row.is_canceled),
            reservation_status: text("reservation_status", &row.reservation_status)?,
            reservation_status_date,
        };

        Ok(LoadedRow {
            hotel,
            guest,
            attributes,
        })
    }
}

/// Opens `path` as a headed CSV file.
pub fn open_csv(path: &Path) -> Result<csv::Reader<File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))
}

/// Reads and cleans one record; row-level problems come back as `AppError`.
pub fn read_row(record: csv::Result<CsvRow>) -> Result<LoadedRow, AppError> {
    let raw = record.map_err(|e| AppError::BadRequest(format!("unreadable CSV record: {e}")))?;
    LoadedRow::try_from(raw)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub inserted: u64,
    pub failed: u64,
    pub hotels: i64,
    pub guests: i64,
    pub bookings: i64,
}

impl LoadSummary {
    pub fn log(&self) {
        info!("Data loading completed!");
        info!("Total bookings inserted: {}", self.inserted);
        info!("Rows skipped: {}", self.failed);
        info!("Total unique hotels: {}", self.hotels);
        info!("Total unique guests: {}", self.guests);
        info!("Total bookings: {}", self.bookings);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const HEADER: &str = "hotel,is_canceled,lead_time,arrival_date_year,arrival_date_month,\
arrival_date_week_number,arrival_date_day_of_month,stays_in_weekend_nights,stays_in_week_nights,\
adults,children,babies,meal,country,market_segment,distribution_channel,is_repeated_guest,\
previous_cancellations,previous_bookings_not_canceled,reserved_room_type,assigned_room_type,\
booking_changes,deposit_type,agent,company,days_in_waiting_list,customer_type,adr,\
required_car_parking_spaces,total_of_special_requests,reservation_status,reservation_status_date";

    pub(crate) const ROWS: &str = "\
Resort Hotel,0,342,2015,July,27,1,0,0,2,0,0,BB,PRT,Direct,Direct,0,0,0,C,C,3,No Deposit,NULL,NULL,0,Transient,0,0,0,Check-Out,2015-07-01
Resort Hotel,0,7,2015,July,27,1,0,1,1,0,0,BB,GBR,Direct,Direct,0,0,0,A,C,0,No Deposit,NULL,NULL,0,Transient,75,0,0,Check-Out,2015-07-02
City Hotel,1,85,2015,July,27,1,0,3,2,0,0,BB,,Online TA,TA/TO,0,0,0,A,A,0,No Deposit,9,NULL,0,Transient,82,0,1,Canceled,2015-05-06
City Hotel,0,13,2015,July,27,1,0,1,1,0,0,BB,PRT,Corporate,Corporate,1,0,0,A,A,0,No Deposit,304,NULL,0,Transient,75,0,0,Check-Out,2015-07-02
City Hotel,0,x,2015,July,27,1,0,1,1,0,0,BB,PRT,Corporate,Corporate,0,0,0,A,A,0,No Deposit,NULL,NULL,0,Transient,75,0,0,Check-Out,2015-07-02
";

    pub(crate) fn sample_csv() -> String {
        format!("{HEADER}\n{ROWS}")
    }

    fn rows() -> Vec<Result<LoadedRow, AppError>> {
        let csv = sample_csv();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        reader.deserialize::<CsvRow>().map(read_row).collect()
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(None), None);
        assert_eq!(clean_value(Some("")), None);
        assert_eq!(clean_value(Some("NULL")), None);
        assert_eq!(clean_value(Some("  PRT ")), Some("PRT"));
    }

    #[test]
    fn test_first_row_fields() {
        let row = rows().remove(0).unwrap();
        assert_eq!(row.hotel, HotelKey::new("Resort Hotel"));
        assert_eq!(row.guest.country, "PRT");
        assert!(!row.guest.is_repeated_guest);
        assert_eq!(row.attributes.lead_time, 342);
        assert_eq!(row.attributes.agent, None);
        assert_eq!(row.attributes.adr, 0.0);
        assert_eq!(
            row.attributes.reservation_status_date,
            NaiveDate::from_ymd_opt(2015, 7, 1)
        );
    }

    #[test]
    fn test_missing_country_becomes_unknown() {
        let row = rows().remove(2).unwrap();
        assert_eq!(row.guest.country, UNKNOWN_COUNTRY);
        assert!(row.attributes.is_canceled);
        assert_eq!(row.attributes.agent, Some(9));
    }

    #[test]
    fn test_repeat_flag_only_for_one() {
        let row = rows().remove(3).unwrap();
        assert!(row.guest.is_repeated_guest);
    }

    #[test]
    fn test_malformed_number_fails_row() {
        let result = rows().remove(4);
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_absent_numbers_default_to_zero() {
        let raw = CsvRow {
            hotel: Some("City Hotel".to_string()),
            customer_type: Some("Transient".to_string()),
            arrival_date_month: Some("July".to_string()),
            meal: Some("BB".to_string()),
            market_segment: Some("Direct".to_string()),
            distribution_channel: Some("Direct".to_string()),
            reserved_room_type: Some("A".to_string()),
            assigned_room_type: Some("A".to_string()),
            deposit_type: Some("No Deposit".to_string()),
            reservation_status: Some("Check-Out".to_string()),
            ..Default::default()
        };
        let row = LoadedRow::try_from(raw).unwrap();
        assert_eq!(row.attributes.lead_time, 0);
        assert_eq!(row.attributes.adults, 0);
        assert_eq!(row.attributes.company, None);
        assert_eq!(row.attributes.reservation_status_date, None);
    }

    #[test]
    fn test_missing_hotel_fails_row() {
        let raw = CsvRow {
            customer_type: Some("Transient".to_string()),
            ..Default::default()
        };
        assert!(LoadedRow::try_from(raw).is_err());
    }
}
