//! Mapping loosely typed backend items onto display records.
//!
//! Every target field has a fixed priority list of source keys; the first
//! non-empty value wins. Normalization is pure and never fails: missing or
//! malformed fields become `None`, empty strings or `0`.

mod destination;
mod points;
mod promotion;
mod schedule;
mod seat;

use serde_json::Value;
use std::fmt;
use tracing::debug;

use crate::envelope::Payload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    BoardingPoint,
    DropOffPoint,
    Nationality,
    Destination,
    FlashSale,
    Schedule,
    Seat,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::BoardingPoint => "boarding point",
            EntityKind::DropOffPoint => "drop-off point",
            EntityKind::Nationality => "nationality",
            EntityKind::Destination => "destination",
            EntityKind::FlashSale => "flash sale",
            EntityKind::Schedule => "schedule",
            EntityKind::Seat => "seat",
        };
        f.write_str(name)
    }
}

/// A display record that can be built from one raw backend item
pub trait Normalize: Sized {
    const KIND: EntityKind;

    /// Build the record; `position` is the item's index in its list
    fn normalize(raw: &Value, position: usize) -> Self;

    fn record_id(&self) -> &str;
}

/// Normalize a list, dropping records that ended up without an id
pub fn normalize_all<T: Normalize>(items: &[Value]) -> Vec<T> {
    let records: Vec<T> = items
        .iter()
        .enumerate()
        .map(|(position, raw)| T::normalize(raw, position))
        .filter(|record| !record.record_id().is_empty())
        .collect();

    if records.len() < items.len() {
        debug!(
            kind = %T::KIND,
            dropped = items.len() - records.len(),
            "Dropped records without an id"
        );
    }
    records
}

pub fn from_payload<T: Normalize>(payload: Payload) -> Vec<T> {
    normalize_all(&payload.into_items())
}

/// First key holding a non-empty string or non-zero number, as text
pub fn text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| raw.get(*key).and_then(scalar_text))
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// The item's `id` as text, else `fallback`
pub fn record_id(raw: &Value, fallback: &str) -> String {
    text(raw, &["id"]).unwrap_or_else(|| fallback.to_string())
}

/// First key that is present and not null, whatever its value
pub fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| raw.get(*key).filter(|value| !value.is_null()))
}

/// Numeric coercion: numbers and numeric strings, anything else is `0`
pub fn to_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(true)) => Some(1.0),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

pub fn opt_number(raw: &Value, key: &str) -> Option<f64> {
    match raw.get(key) {
        None | Some(Value::Null) => None,
        Some(value @ Value::String(s)) if !s.trim().is_empty() => Some(to_number(Some(value))),
        Some(Value::String(_)) => None,
        value => Some(to_number(value)),
    }
}

pub fn opt_i64(raw: &Value, key: &str) -> Option<i64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// `0`/`1` style flags; missing means off
pub fn flag(raw: &Value, key: &str) -> bool {
    opt_i64(raw, key).is_some_and(|n| n != 0)
}

/// Accept a list, a single object, or nothing
pub fn as_list(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(map)) if !map.is_empty() => vec![Value::Object(map.clone())],
        _ => Vec::new(),
    }
}
