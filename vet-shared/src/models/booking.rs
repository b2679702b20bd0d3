use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyType {
    OneWay,
    RoundTrip,
    Trip,
}

impl JourneyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JourneyType::OneWay => "one-way",
            JourneyType::RoundTrip => "round-trip",
            JourneyType::Trip => "trip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

/// Charter request entered on the vehicle page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingForm {
    pub full_name: String,
    pub phone_number: String,
    pub journey_type: JourneyType,
    pub departure: String,
    pub arrival: String,
    pub departure_date: String,
    pub amount_of_car: u32,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    #[serde(flatten)]
    pub form: BookingForm,
    pub vehicle_id: String,
    pub vehicle_name: String,
    pub status: BookingStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
}

/// Seat booking confirmation sent before payment.
///
/// Per-seat data travels as parallel arrays, one entry per booked seat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingRequest {
    pub boarding_point_id: Vec<i64>,
    pub drop_off_id: Vec<i64>,
    pub journey_date: Vec<String>,
    pub journey_id: Vec<String>,
    pub journey_type: i64,
    pub nationally: i64,
    pub seat_gender: Vec<i64>,
    pub seat_journey: Vec<String>,
    pub seat_num: Vec<String>,
    pub seat_price: Vec<f64>,
    pub total_amount: f64,
    pub total_discount: f64,
    pub total_seat: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_use_lucky_draw: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_travel_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_dob: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_name: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_nationally_id: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_passport: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

/// Where the UI navigates after a booking is confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTarget {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl PaymentTarget {
    pub const PAYMENT_PATH: &'static str = "/payment";

    pub fn payment(query: BTreeMap<String, String>) -> Self {
        Self {
            path: Self::PAYMENT_PATH.to_string(),
            query,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_wire_format() {
        let booking = Booking {
            id: "BK001".into(),
            form: BookingForm {
                full_name: "John Smith".into(),
                phone_number: "+855 12 345 678".into(),
                journey_type: JourneyType::RoundTrip,
                departure: "phnom-penh".into(),
                arrival: "siem-reap".into(),
                departure_date: "2026-02-15".into(),
                amount_of_car: 1,
                remark: String::new(),
            },
            vehicle_id: "luxury-van-h350".into(),
            vehicle_name: "Hyundai Solati H-350".into(),
            status: BookingStatus::Confirmed,
            created_at: "2026-01-20T10:30:00Z".into(),
            total_price: Some(180.0),
        };

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["fullName"], "John Smith");
        assert_eq!(json["journeyType"], "round-trip");
        assert_eq!(json["status"], "confirmed");

        let back: Booking = serde_json::from_value(json).unwrap();
        assert_eq!(back, booking);
    }
}
