//! Seat map and sold seats of a journey.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use vet_core::normalize::{self, opt_i64};
use vet_core::pipeline::{fetch_payload, fetch_records};
use vet_core::{
    ApiClient, ApiError, Fields, Outcome, RequestEnvelope, SessionKey, SessionStorage, UnwrapRules,
};
use vet_shared::models::{SeatLayout, UnavailableSeat};

pub const LAYOUT_ENDPOINT: &str = "/seat/layout";
pub const UNAVAILABLE_ENDPOINT: &str = "/seat/unavailable";

const LAYOUT_RULES: UnwrapRules =
    UnwrapRules::DEFAULT.failure_message("Failed to fetch seat layout");
const UNAVAILABLE_RULES: UnwrapRules =
    UnwrapRules::DEFAULT.failure_message("Failed to fetch unavailable seats");

pub struct SeatService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionStorage>,
}

impl SeatService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionStorage>) -> Self {
        Self { client, session }
    }

    /// Layout grid of the vehicle serving a journey. A journey without a
    /// layout yields the empty grid.
    pub async fn fetch_seat_layout(
        &self,
        date: Option<&str>,
        journey: Option<&str>,
    ) -> Outcome<SeatLayout> {
        let request = match self.seat_request(LAYOUT_ENDPOINT, date, journey) {
            Ok(request) => request,
            Err(err) => return Outcome::Failed(err),
        };

        let payload = match fetch_payload(&self.client, &request, &LAYOUT_RULES).await {
            Ok(payload) => payload,
            Err(err) => return Outcome::Failed(err),
        };

        let Some(first) = payload.into_items().into_iter().next() else {
            return Outcome::Loaded(SeatLayout::empty());
        };
        match layout_text(&first) {
            Some(layout) => Outcome::Loaded(SeatLayout {
                layout,
                seat_type: opt_i64(&first, "seatType"),
                unavailable_seats: Vec::new(),
            }),
            None => {
                warn!("Seat layout response has no layout field");
                Outcome::Failed(ApiError::UnexpectedPayload(
                    "Invalid seat layout data structure".into(),
                ))
            }
        }
    }

    /// Seats already sold. Failures are logged and read as "none sold".
    pub async fn fetch_unavailable_seats(
        &self,
        date: Option<&str>,
        journey: Option<&str>,
    ) -> Vec<UnavailableSeat> {
        let request = match self.seat_request(UNAVAILABLE_ENDPOINT, date, journey) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Unavailable seats request skipped");
                return Vec::new();
            }
        };

        match fetch_records(&self.client, &request, &UNAVAILABLE_RULES).await {
            Outcome::Failed(err) => {
                warn!(error = %err, "Treating unavailable seats as none");
                Vec::new()
            }
            outcome => outcome.into_items(),
        }
    }

    /// Layout and sold seats fetched concurrently and joined
    pub async fn fetch_seat_map(&self, date: Option<&str>, journey: Option<&str>) -> Outcome<SeatLayout> {
        let (layout, unavailable) = tokio::join!(
            self.fetch_seat_layout(date, journey),
            self.fetch_unavailable_seats(date, journey)
        );
        let outcome = layout.map(|mut layout| {
            layout.unavailable_seats = unavailable;
            layout
        });
        if let Outcome::Loaded(layout) = &outcome {
            info!(unavailable = layout.unavailable_seats.len(), "Fetched seat map");
        }
        outcome
    }

    fn seat_request(
        &self,
        endpoint: &str,
        date: Option<&str>,
        journey: Option<&str>,
    ) -> Result<RequestEnvelope, ApiError> {
        let date = self.or_session(date, SessionKey::DateFrom);
        let journey = self.or_session(journey, SessionKey::JourneyId);
        match (date, journey) {
            (Some(date), Some(journey)) => Ok(RequestEnvelope::post(endpoint)
                .body(Fields::new().with("date", date).with("journey", journey))),
            _ => Err(ApiError::MissingInput("date or journey for seats".into())),
        }
    }

    fn or_session(&self, value: Option<&str>, key: SessionKey) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .or_else(|| self.session.get_non_empty(key))
    }
}

/// The layout is usually a JSON-encoded string; structured grids are re-encoded
fn layout_text(item: &Value) -> Option<String> {
    match normalize::first_present(item, &["layout"])? {
        Value::String(layout) => Some(layout.clone()),
        other => Some(other.to_string()),
    }
}
