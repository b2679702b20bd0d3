use serde_json::Value;
use vet_shared::models::{SeatGender, UnavailableSeat};

use super::{opt_i64, EntityKind, Normalize};

impl Normalize for UnavailableSeat {
    const KIND: EntityKind = EntityKind::Seat;

    fn normalize(raw: &Value, _position: usize) -> Self {
        match raw {
            Value::String(number) => UnavailableSeat {
                seat_number: number.trim().to_string(),
                raw: raw.clone(),
                ..Default::default()
            },
            _ => UnavailableSeat {
                seat_number: raw.get("seatNumber").map(loose_text).unwrap_or_default(),
                gender: raw
                    .get("gender")
                    .map(loose_text)
                    .and_then(|g| SeatGender::parse(&g)),
                status: opt_i64(raw, "status"),
                raw: raw.clone(),
            },
        }
    }

    fn record_id(&self) -> &str {
        &self.seat_number
    }
}

/// Any scalar as trimmed text; seat codes arrive as numbers or strings
fn loose_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
