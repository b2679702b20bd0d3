use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

impl Route {
    pub fn new(id: u32, name: &str, slug: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }
}

/// Popular routes, grouped the way the home page lists them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteCatalog {
    pub local_routes: Vec<Route>,
    pub international_routes: Vec<Route>,
}

/// A charter vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub price_per_day: Option<f64>,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}
