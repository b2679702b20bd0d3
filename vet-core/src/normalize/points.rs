use serde_json::Value;
use vet_shared::models::{BoardingPoint, DropOffPoint};

use super::{record_id, text, EntityKind, Normalize};

const NAME_KEYS: &[&str] = &["name", "title", "location"];
const LAT_KEYS: &[&str] = &["lats", "latitude"];
const LONG_KEYS: &[&str] = &["longs", "longitude"];

impl Normalize for BoardingPoint {
    const KIND: EntityKind = EntityKind::BoardingPoint;

    fn normalize(raw: &Value, _position: usize) -> Self {
        let name = text(raw, NAME_KEYS).unwrap_or_default();
        BoardingPoint {
            id: record_id(raw, &name),
            time: text(raw, &["time", "departTime", "departureTime", "boardingTime"]),
            address: text(raw, &["address"]),
            lats: text(raw, LAT_KEYS),
            longs: text(raw, LONG_KEYS),
            raw: raw.clone(),
            name,
        }
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Normalize for DropOffPoint {
    const KIND: EntityKind = EntityKind::DropOffPoint;

    fn normalize(raw: &Value, _position: usize) -> Self {
        let name = text(raw, NAME_KEYS).unwrap_or_default();
        DropOffPoint {
            id: record_id(raw, &name),
            time: text(raw, &["time", "arrivalTime"]),
            address: text(raw, &["address"]),
            lats: text(raw, LAT_KEYS),
            longs: text(raw, LONG_KEYS),
            raw: raw.clone(),
            name,
        }
    }

    fn record_id(&self) -> &str {
        &self.id
    }
}
