use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::points::{BoardingPoint, DropOffPoint};
use super::seat::UnavailableSeat;

/// On-board facilities, decoded from the backend's `0`/`1` flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    pub air_con: bool,
    pub wifi: bool,
    pub snack: bool,
    pub steward: bool,
    pub wct: bool,
}

/// One departure listed on the search results page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub transportation_type: Option<String>,
    pub transportation_photo: Option<String>,
    #[serde(rename = "type")]
    pub trip_type: Option<i64>,
    pub vehicle_type: Option<i64>,
    pub schedule_type: Option<i64>,
    pub status: Option<i64>,

    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub duration: Option<String>,
    pub depart_date: Option<String>,

    pub seat_available: Option<i64>,
    pub total_seat: Option<i64>,

    pub price_original: f64,
    pub price: f64,
    pub price_foreigner: Option<f64>,
    pub discount: Option<f64>,
    pub dis_percent: Option<String>,
    pub allow_price_period: Option<i64>,

    pub origin: Option<String>,
    pub destination: Option<String>,
    pub route_info: String,
    pub transport_route_display: Option<String>,
    pub nation_road: Option<String>,
    pub description: Option<String>,
    pub note: Option<String>,

    pub boarding_point: Option<String>,
    pub boarding_point_id: Option<String>,
    pub boarding_point_address: Option<String>,
    pub boarding_point_lats: Option<String>,
    pub boarding_point_longs: Option<String>,
    pub boarding_points: Vec<BoardingPoint>,

    pub drop_off_point: Option<String>,
    pub drop_off_point_id: Option<String>,
    pub drop_off_point_address: Option<String>,
    pub drop_off_point_lats: Option<String>,
    pub drop_off_point_longs: Option<String>,
    pub drop_off_points: Vec<DropOffPoint>,

    pub seat_layout: Option<String>,
    pub unavailable_seats: Vec<UnavailableSeat>,
    pub amenities: Amenities,
    pub slide_photos: Vec<Value>,

    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl Schedule {
    pub fn is_sold_out(&self) -> bool {
        matches!(self.seat_available, Some(n) if n <= 0)
    }
}
