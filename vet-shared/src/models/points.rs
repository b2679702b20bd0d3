use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A pick-up stop for a scheduled journey
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardingPoint {
    pub id: String,
    pub name: String,
    pub time: Option<String>,
    pub address: Option<String>,
    pub lats: Option<String>,
    pub longs: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

/// A drop-off stop for a scheduled journey
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropOffPoint {
    pub id: String,
    pub name: String,
    pub time: Option<String>,
    pub address: Option<String>,
    pub lats: Option<String>,
    pub longs: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

impl BoardingPoint {
    /// Coordinates as floats, when both are present and parse
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        parse_coordinates(self.lats.as_deref(), self.longs.as_deref())
    }
}

impl DropOffPoint {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        parse_coordinates(self.lats.as_deref(), self.longs.as_deref())
    }
}

fn parse_coordinates(lats: Option<&str>, longs: Option<&str>) -> Option<(f64, f64)> {
    let lat = lats?.trim().parse::<f64>().ok()?;
    let long = longs?.trim().parse::<f64>().ok()?;
    Some((lat, long))
}
