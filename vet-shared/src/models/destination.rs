use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A departure or arrival location offered by the search form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub name_en: Option<String>,
    pub name_cn: Option<String>,
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nationality {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub raw: Value,
}

/// Search filters chosen on the home page.
///
/// Ids are kept as strings because they are persisted in the session store
/// and sent back verbatim as form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin: String,
    pub destination_from: String,
    pub destination: String,
    pub destination_to: String,
    pub depart_date: String,
    pub return_date: String,
    pub nationally: String,
    #[serde(rename = "type")]
    pub trip_type: String,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination_from: String::new(),
            destination: String::new(),
            destination_to: String::new(),
            depart_date: String::new(),
            return_date: String::new(),
            nationally: "local".to_string(),
            trip_type: String::new(),
        }
    }
}
