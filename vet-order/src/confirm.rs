//! Seat booking confirmation and the hand-off to the payment page.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};
use vet_core::normalize::to_number;
use vet_core::pipeline::fetch_payload;
use vet_core::{
    ApiClient, ApiError, Fields, RequestEnvelope, SessionKey, SessionStorage, UnwrapRules,
};
use vet_shared::models::{ConfirmBookingRequest, JourneyType, PaymentTarget};

pub const CONFIRM_ENDPOINT: &str = "/booking/confirm";

pub const CONFIRM_FAILED: &str = "Booking confirmation failed. Please try again.";
pub const DEFAULT_NOTICE: &str = "Booking confirmed successfully.";

/// Keys that may carry the order id, most specific first
const ORDER_ID_KEYS: [&str; 7] = [
    "transactionId",
    "transaction_id",
    "bookingCode",
    "orderId",
    "bookingId",
    "booking_code",
    "order_id",
];

const CONFIRM_RULES: UnwrapRules = UnwrapRules::DEFAULT
    .bare_object()
    .failure_message(CONFIRM_FAILED);

/// Trip details shown on the payment page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSummary {
    pub route_title: String,
    pub vehicle_type: String,
    pub depart_date: String,
    pub departure_time: String,
    pub seat_no: String,
    pub total_fare: f64,
    pub trip_type: Option<JourneyType>,
    pub email: Option<String>,
    pub outbound_route_title: Option<String>,
    pub return_route_title: Option<String>,
    pub outbound_vehicle_type: Option<String>,
    pub return_vehicle_type: Option<String>,
    pub outbound_depart_date: Option<String>,
    pub return_depart_date: Option<String>,
    pub outbound_departure_time: Option<String>,
    pub return_departure_time: Option<String>,
    pub outbound_seats: Option<String>,
    pub return_seats: Option<String>,
    pub outbound_seat_count: Option<u32>,
    pub return_seat_count: Option<u32>,
    pub outbound_genders: Vec<String>,
    pub return_genders: Vec<String>,
    pub outbound_nationalities: Vec<String>,
    pub return_nationalities: Vec<String>,
    pub genders: Vec<String>,
    pub nationalities: Vec<String>,
    pub first_gender: Option<String>,
    pub first_nationality: Option<String>,
}

impl PaymentSummary {
    /// Query parameters of the payment page; blank optionals are left out
    pub fn query(&self, order_id: Option<&str>) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        let mut put = |key: &str, value: String| {
            query.insert(key.to_string(), value);
        };

        put("routeTitle", self.route_title.clone());
        put("vehicleType", self.vehicle_type.clone());
        put("departDate", self.depart_date.clone());
        put("departureTime", self.departure_time.clone());
        put("seatNo", self.seat_no.clone());
        put("totalFare", self.total_fare.to_string());

        if let Some(order_id) = order_id {
            put("orderId", order_id.to_string());
            put("bookingCode", order_id.to_string());
        }
        if let Some(email) = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            put("email", email.to_string());
        }
        if let Some(trip_type) = self.trip_type {
            put("tripType", trip_type.as_str().to_string());
        }

        let texts = [
            ("outboundRouteTitle", &self.outbound_route_title),
            ("returnRouteTitle", &self.return_route_title),
            ("outboundVehicleType", &self.outbound_vehicle_type),
            ("returnVehicleType", &self.return_vehicle_type),
            ("outboundDepartDate", &self.outbound_depart_date),
            ("returnDepartDate", &self.return_depart_date),
            ("outboundDepartureTime", &self.outbound_departure_time),
            ("returnDepartureTime", &self.return_departure_time),
            ("outboundSeats", &self.outbound_seats),
            ("returnSeats", &self.return_seats),
            ("gender", &self.first_gender),
            ("nationality", &self.first_nationality),
        ];
        for (key, value) in texts {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                put(key, value.to_string());
            }
        }

        for (key, count) in [
            ("outboundSeatCount", self.outbound_seat_count),
            ("returnSeatCount", self.return_seat_count),
        ] {
            if let Some(count) = count {
                put(key, count.to_string());
            }
        }

        let lists = [
            ("outboundGenders", &self.outbound_genders),
            ("returnGenders", &self.return_genders),
            ("outboundNationalities", &self.outbound_nationalities),
            ("returnNationalities", &self.return_nationalities),
            ("genders", &self.genders),
            ("nationalities", &self.nationalities),
        ];
        for (key, values) in lists {
            if !values.is_empty() {
                put(key, values.join(","));
            }
        }

        query
    }
}

/// What the UI does after a confirmation request
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    /// Booking awaits payment; navigate to the payment page
    Payment(PaymentTarget),
    /// Nothing to pay; show the server's message
    Notice(String),
}

pub struct ConfirmationService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionStorage>,
}

impl ConfirmationService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionStorage>) -> Self {
        Self { client, session }
    }

    pub async fn confirm_booking(
        &self,
        request: &ConfirmBookingRequest,
        summary: &PaymentSummary,
    ) -> Result<Confirmation, ApiError> {
        let fields = Fields::from_serialize(request)
            .map_err(|e| ApiError::UnexpectedPayload(format!("Unserializable booking: {}", e)))?;
        let envelope = RequestEnvelope::post(CONFIRM_ENDPOINT).body(fields);

        let payload = fetch_payload(&self.client, &envelope, &CONFIRM_RULES).await?;
        let response = payload
            .into_items()
            .into_iter()
            .find_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .ok_or_else(|| ApiError::UnexpectedPayload(CONFIRM_FAILED.into()))?;

        if to_number(response.get("status")) != 1.0 {
            let message = response_string(&response, &["message"])
                .unwrap_or_else(|| DEFAULT_NOTICE.to_string());
            return Ok(Confirmation::Notice(message));
        }

        let order_id = response_string(&response, &ORDER_ID_KEYS);
        match &order_id {
            Some(order_id) => {
                info!(order_id, "Booking confirmed");
                if let Err(err) = self.session.set(SessionKey::LastOrderId, order_id) {
                    warn!(error = %err, "Could not persist last order id");
                }
            }
            None => warn!("Booking confirmed without an order id"),
        }

        Ok(Confirmation::Payment(PaymentTarget::payment(
            summary.query(order_id.as_deref()),
        )))
    }
}

/// First key holding non-blank text or a finite number
fn response_string(response: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match response.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
