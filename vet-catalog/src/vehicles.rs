use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use vet_core::envelope::unwrap_with;
use vet_core::{ApiClient, Payload, RequestEnvelope, ResponseEnvelope, Sourced, UnwrapRules};
use vet_shared::models::Vehicle;

pub const VEHICLES_ENDPOINT: &str = "/vehicles";

#[derive(Debug, Default)]
struct VehicleState {
    vehicles: Vec<Vehicle>,
    current_id: Option<String>,
}

/// Charter vehicles. Starts from the built-in fleet, replaced by the
/// backend's list when it answers with one.
pub struct VehicleService {
    client: Arc<ApiClient>,
    state: RwLock<VehicleState>,
}

impl VehicleService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(VehicleState {
                vehicles: builtin_vehicles(),
                current_id: None,
            }),
        }
    }

    pub async fn fetch_vehicles(&self) -> Sourced<Vec<Vehicle>> {
        let fetched = match self.client.request(&RequestEnvelope::post(VEHICLES_ENDPOINT)).await {
            Ok(response) => match unwrap_with(&response.data, &UnwrapRules::DEFAULT) {
                ResponseEnvelope::Success(Payload::List(items)) => parse_vehicles(items),
                ResponseEnvelope::Success(_) => Err("response carried no vehicle list".to_string()),
                ResponseEnvelope::Failure { message, .. } => Err(message),
            },
            Err(err) => Err(err.to_string()),
        };

        let mut state = self.state.write().await;
        match fetched {
            Ok(vehicles) => {
                info!(count = vehicles.len(), "Fetched vehicles");
                state.vehicles = vehicles.clone();
                Sourced::live(vehicles)
            }
            Err(reason) => Sourced::fallback(state.vehicles.clone(), &reason),
        }
    }

    pub async fn vehicles(&self) -> Vec<Vehicle> {
        self.state.read().await.vehicles.clone()
    }

    pub async fn available_vehicles(&self) -> Vec<Vehicle> {
        self.state
            .read()
            .await
            .vehicles
            .iter()
            .filter(|v| v.available)
            .cloned()
            .collect()
    }

    pub async fn vehicle_by_id(&self, id: &str) -> Option<Vehicle> {
        self.state.read().await.vehicles.iter().find(|v| v.id == id).cloned()
    }

    pub async fn set_current_vehicle(&self, id: &str) {
        self.state.write().await.current_id = Some(id.to_string());
    }

    /// The selected vehicle, or the first one when nothing is selected
    pub async fn current_vehicle(&self) -> Option<Vehicle> {
        let state = self.state.read().await;
        match &state.current_id {
            Some(id) => state.vehicles.iter().find(|v| &v.id == id).cloned(),
            None => state.vehicles.first().cloned(),
        }
    }

    pub async fn set_availability(&self, id: &str, available: bool) -> bool {
        let mut state = self.state.write().await;
        match state.vehicles.iter_mut().find(|v| v.id == id) {
            Some(vehicle) => {
                vehicle.available = available;
                true
            }
            None => false,
        }
    }
}

fn parse_vehicles(items: Vec<serde_json::Value>) -> Result<Vec<Vehicle>, String> {
    items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Vehicle>, _>>()
        .map_err(|e| format!("malformed vehicle list: {}", e))
}

pub fn builtin_vehicles() -> Vec<Vehicle> {
    vec![Vehicle {
        id: "luxury-van-h350".into(),
        name: "Hyundai Solati H-350".into(),
        description: Some(
            "Premium luxury van with comfortable seating and modern amenities".into(),
        ),
        images: vec![
            "/images/gallery/vet/Luxury_Van-H350/Slide/Classic Hyundai Solati H350-01.jpg".into(),
            "/images/gallery/vet/Luxury_Van-H350/Slide/Classic Hyundai Solati H350-03.jpg".into(),
        ],
        capacity: Some(16),
        features: vec![
            "Air Conditioning".into(),
            "Leather Seats".into(),
            "Entertainment System".into(),
            "WiFi".into(),
        ],
        price_per_day: Some(180.0),
        available: true,
    }]
}
