//! Document shapes. Bookings embed a snapshot of their hotel and guest taken
//! at insert time; later changes to the referenced records do not propagate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::booking::BookingAttributes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub created_at: DateTime<Utc>,
}

impl Metadata {
    pub fn now() -> Self {
        Self {
            created_at: Utc::now(),
        }
    }
}

/// Stored hotel body; the key lives in the record id.
#[derive(Debug, Clone, Serialize)]
pub struct HotelDocument {
    pub hotel_name: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotelRecord {
    pub hotel_id: String,
    pub hotel_name: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestDocument {
    pub country: String,
    pub is_repeated_guest: bool,
    pub customer_type: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestRecord {
    pub guest_id: String,
    pub country: String,
    pub is_repeated_guest: bool,
    pub customer_type: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelSnapshot {
    pub hotel_id: String,
    pub hotel_name: String,
}

impl From<&HotelRecord> for HotelSnapshot {
    fn from(hotel: &HotelRecord) -> Self {
        Self {
            hotel_id: hotel.hotel_id.clone(),
            hotel_name: hotel.hotel_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestSnapshot {
    pub guest_id: String,
    pub country: String,
    pub is_repeated_guest: bool,
}

impl From<&GuestRecord> for GuestSnapshot {
    fn from(guest: &GuestRecord) -> Self {
        Self {
            guest_id: guest.guest_id.clone(),
            country: guest.country.clone(),
            is_repeated_guest: guest.is_repeated_guest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalDate {
    pub year: i32,
    pub month: String,
    pub week: i32,
    pub day: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stays {
    pub weekend_nights: i32,
    pub week_nights: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occupancy {
    pub adults: i32,
    pub children: i32,
    pub babies: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rooms {
    pub reserved: String,
    pub assigned: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub lead_time: i32,
    pub arrival_date: ArrivalDate,
    pub stays: Stays,
    pub guests: Occupancy,
    pub meal: String,
    pub market_segment: String,
    pub distribution_channel: String,
    pub room: Rooms,
    pub booking_changes: i32,
    pub deposit_type: String,
    #[serde(default)]
    pub agent: Option<i32>,
    #[serde(default)]
    pub company: Option<i32>,
    pub days_in_waiting_list: i32,
    pub adr: f64,
    pub required_car_parking_spaces: i32,
    pub total_of_special_requests: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingStatus {
    pub is_canceled: bool,
    pub reservation_status: String,
    #[serde(default)]
    pub reservation_status_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingHistory {
    pub previous_cancellations: i32,
    pub previous_bookings_not_canceled: i32,
}

/// Stored booking body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDocument {
    pub hotel: HotelSnapshot,
    pub guest: GuestSnapshot,
    pub booking_details: BookingDetails,
    pub status: BookingStatus,
    pub history: BookingHistory,
    pub metadata: Metadata,
}

impl BookingDocument {
    pub fn new(hotel: HotelSnapshot, guest: GuestSnapshot, a: BookingAttributes) -> Self {
        Self {
            hotel,
            guest,
            booking_details: BookingDetails {
                lead_time: a.lead_time,
                arrival_date: ArrivalDate {
                    year: a.arrival_date_year,
                    month: a.arrival_date_month,
                    week: a.arrival_date_week_number,
                    day: a.arrival_date_day_of_month,
                },
                stays: Stays {
                    weekend_nights: a.stays_in_weekend_nights,
                    week_nights: a.stays_in_week_nights,
                },
                guests: Occupancy {
                    adults: a.adults,
                    children: a.children,
                    babies: a.babies,
                },
                meal: a.meal,
                market_segment: a.market_segment,
                distribution_channel: a.distribution_channel,
                room: Rooms {
                    reserved: a.reserved_room_type,
                    assigned: a.assigned_room_type,
                },
                booking_changes: a.booking_changes,
                deposit_type: a.deposit_type,
                agent: a.agent,
                company: a.company,
                days_in_waiting_list: a.days_in_waiting_list,
                adr: a.adr,
                required_car_parking_spaces: a.required_car_parking_spaces,
                total_of_special_requests: a.total_of_special_requests,
            },
            status: BookingStatus {
                is_canceled: a.is_canceled,
                reservation_status: a.reservation_status,
                reservation_status_date: a.reservation_status_date,
            },
            history: BookingHistory {
                previous_cancellations: a.previous_cancellations,
                previous_bookings_not_canceled: a.previous_bookings_not_canceled,
            },
            metadata: Metadata::now(),
        }
    }

    /// Flattens the nested sections back into the shared attribute set.
    pub fn attributes(&self) -> BookingAttributes {
        let d = &self.booking_details;
        BookingAttributes {
            lead_time: d.lead_time,
            arrival_date_year: d.arrival_date.year,
            arrival_date_month: d.arrival_date.month.clone(),
            arrival_date_week_number: d.arrival_date.week,
            arrival_date_day_of_month: d.arrival_date.day,
            stays_in_weekend_nights: d.stays.weekend_nights,
            stays_in_week_nights: d.stays.week_nights,
            adults: d.guests.adults,
            children: d.guests.children,
            babies: d.guests.babies,
            meal: d.meal.clone(),
            market_segment: d.market_segment.clone(),
            distribution_channel: d.distribution_channel.clone(),
            previous_cancellations: self.history.previous_cancellations,
            previous_bookings_not_canceled: self.history.previous_bookings_not_canceled,
            reserved_room_type: d.room.reserved.clone(),
            assigned_room_type: d.room.assigned.clone(),
            booking_changes: d.booking_changes,
            deposit_type: d.deposit_type.clone(),
            agent: d.agent,
            company: d.company,
            days_in_waiting_list: d.days_in_waiting_list,
            adr: d.adr,
            required_car_parking_spaces: d.required_car_parking_spaces,
            total_of_special_requests: d.total_of_special_requests,
            is_canceled: self.status.is_canceled,
            reservation_status: self.status.reservation_status.clone(),
            reservation_status_date: self.status.reservation_status_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking_id: String,
    pub hotel: HotelSnapshot,
    pub guest: GuestSnapshot,
    pub booking_details: BookingDetails,
    pub status: BookingStatus,
    pub history: BookingHistory,
    pub metadata: Metadata,
}

impl BookingRecord {
    pub fn attributes(&self) -> BookingAttributes {
        BookingDocument {
            hotel: self.hotel.clone(),
            guest: self.guest.clone(),
            booking_details: self.booking_details.clone(),
            status: self.status.clone(),
            history: self.history.clone(),
            metadata: self.metadata.clone(),
        }
        .attributes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::tests::sample_attributes;

    fn snapshot_pair() -> (HotelSnapshot, GuestSnapshot) {
        (
            HotelSnapshot {
                hotel_id: "h".to_string(),
                hotel_name: "City Hotel".to_string(),
            },
            GuestSnapshot {
                guest_id: "g".to_string(),
                country: "PRT".to_string(),
                is_repeated_guest: false,
            },
        )
    }

    #[test]
    fn test_nesting_preserves_every_attribute() {
        let (hotel, guest) = snapshot_pair();
        let attributes = sample_attributes();
        let doc = BookingDocument::new(hotel, guest, attributes.clone());
        assert_eq!(doc.attributes(), attributes);
    }

    #[test]
    fn test_nested_layout() {
        let (hotel, guest) = snapshot_pair();
        let doc = BookingDocument::new(hotel, guest, sample_attributes());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["booking_details"]["arrival_date"]["week"], 50);
        assert_eq!(value["booking_details"]["room"]["reserved"], "A");
        assert_eq!(value["status"]["reservation_status"], "Check-Out");
        assert_eq!(value["hotel"]["hotel_name"], "City Hotel");
    }
}
