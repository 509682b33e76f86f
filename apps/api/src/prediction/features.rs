use crate::models::booking::BookingAttributes;

pub const FEATURE_COUNT: usize = 16;

/// Column order of the vector sent to the classifier.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "lead_time",
    "arrival_date_year",
    "stays_in_weekend_nights",
    "stays_in_week_nights",
    "adults",
    "children",
    "babies",
    "previous_cancellations",
    "previous_bookings_not_canceled",
    "booking_changes",
    "days_in_waiting_list",
    "adr",
    "required_car_parking_spaces",
    "total_of_special_requests",
    "meal_code",
    "deposit_code",
];

/// Unknown meal plans encode as 0.
pub fn meal_code(meal: &str) -> f64 {
    match meal {
        "BB" => 0.0,
        "FB" => 1.0,
        "HB" => 2.0,
        "SC" => 3.0,
        "Undefined" => 4.0,
        _ => 0.0,
    }
}

/// Unknown deposit types encode as 0.
pub fn deposit_code(deposit_type: &str) -> f64 {
    match deposit_type {
        "No Deposit" => 0.0,
        "Non Refund" => 1.0,
        "Refundable" => 2.0,
        _ => 0.0,
    }
}

pub fn feature_vector(a: &BookingAttributes) -> [f64; FEATURE_COUNT] {
    [
        f64::from(a.lead_time),
        f64::from(a.arrival_date_year),
        f64::from(a.stays_in_weekend_nights),
        f64::from(a.stays_in_week_nights),
        f64::from(a.adults),
        f64::from(a.children),
        f64::from(a.babies),
        f64::from(a.previous_cancellations),
        f64::from(a.previous_bookings_not_canceled),
        f64::from(a.booking_changes),
        f64::from(a.days_in_waiting_list),
        a.adr,
        f64::from(a.required_car_parking_spaces),
        f64::from(a.total_of_special_requests),
        meal_code(&a.meal),
        deposit_code(&a.deposit_type),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::tests::sample_attributes;

    #[test]
    fn test_vector_order() {
        let v = feature_vector(&sample_attributes());
        assert_eq!(v[0], 30.0);
        assert_eq!(v[1], 2024.0);
        assert_eq!(v[4], 2.0);
        assert_eq!(v[11], 100.5);
        assert_eq!(v[13], 1.0);
        assert_eq!(v[14], 0.0);
        assert_eq!(v[15], 0.0);
    }

    #[test]
    fn test_names_line_up_with_vector() {
        assert_eq!(FEATURE_NAMES.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[11], "adr");
        assert_eq!(FEATURE_NAMES[15], "deposit_code");
    }

    #[test]
    fn test_categorical_codes() {
        assert_eq!(meal_code("HB"), 2.0);
        assert_eq!(meal_code("Undefined"), 4.0);
        assert_eq!(meal_code("XX"), 0.0);
        assert_eq!(deposit_code("Non Refund"), 1.0);
        assert_eq!(deposit_code("Refundable"), 2.0);
        assert_eq!(deposit_code(""), 0.0);
    }
}
