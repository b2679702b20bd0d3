use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Gender attached to a sold seat.
///
/// The backend sends `1`/`2`, `"m"`/`"f"` or free text depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SeatGender {
    Male,
    Female,
    Other(String),
}

impl SeatGender {
    /// Parse a loosely typed gender code; blank input yields `None`
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed {
            "" => None,
            "1" => Some(SeatGender::Male),
            "2" => Some(SeatGender::Female),
            other if other.eq_ignore_ascii_case("m") => Some(SeatGender::Male),
            other if other.eq_ignore_ascii_case("f") => Some(SeatGender::Female),
            other => Some(SeatGender::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SeatGender::Male => "M",
            SeatGender::Female => "F",
            SeatGender::Other(value) => value,
        }
    }
}

impl From<SeatGender> for String {
    fn from(gender: SeatGender) -> Self {
        gender.as_str().to_string()
    }
}

impl From<String> for SeatGender {
    fn from(value: String) -> Self {
        SeatGender::parse(&value).unwrap_or(SeatGender::Other(value))
    }
}

/// A seat that can no longer be booked for a journey
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailableSeat {
    pub seat_number: String,
    pub gender: Option<SeatGender>,
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

/// Seat map of a vehicle plus the seats already taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatLayout {
    /// Layout grid as sent by the backend (a JSON-encoded string)
    pub layout: String,
    pub seat_type: Option<i64>,
    pub unavailable_seats: Vec<UnavailableSeat>,
}

impl SeatLayout {
    pub const EMPTY_LAYOUT: &'static str = "[]";

    pub fn empty() -> Self {
        Self {
            layout: Self::EMPTY_LAYOUT.to_string(),
            seat_type: None,
            unavailable_seats: Vec::new(),
        }
    }

    pub fn is_taken(&self, seat_number: &str) -> bool {
        self.unavailable_seats
            .iter()
            .any(|seat| seat.seat_number == seat_number.trim())
    }
}
