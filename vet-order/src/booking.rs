//! Charter bookings made from the vehicle page.

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use vet_core::envelope::unwrap_with;
use vet_core::{
    path_segment, ApiClient, Fields, Payload, RequestEnvelope, ResponseEnvelope, Sourced,
    UnwrapRules,
};
use vet_shared::models::{Booking, BookingForm, BookingStatus, JourneyType};

pub const BOOKINGS_ENDPOINT: &str = "/bookings";

/// Bookings known to this client. The ledger starts with sample bookings and
/// keeps working locally when the backend is unreachable.
pub struct BookingService {
    client: Arc<ApiClient>,
    bookings: RwLock<Vec<Booking>>,
}

impl BookingService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self::with_bookings(client, builtin_bookings())
    }

    pub fn with_bookings(client: Arc<ApiClient>, bookings: Vec<Booking>) -> Self {
        Self {
            client,
            bookings: RwLock::new(bookings),
        }
    }

    /// Submit a booking; when the backend does not return one, a pending
    /// booking is recorded locally instead.
    pub async fn create_booking(
        &self,
        form: BookingForm,
        vehicle_id: &str,
        vehicle_name: &str,
    ) -> Sourced<Booking> {
        let created = self.submit(&form, vehicle_id, vehicle_name).await;

        let mut bookings = self.bookings.write().await;
        match created {
            Ok(booking) => {
                info!(booking_id = %booking.id, "Booking created");
                bookings.push(booking.clone());
                Sourced::live(booking)
            }
            Err(reason) => {
                let booking = Booking {
                    id: next_local_id(&bookings),
                    form,
                    vehicle_id: vehicle_id.to_string(),
                    vehicle_name: vehicle_name.to_string(),
                    status: BookingStatus::Pending,
                    created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                    total_price: None,
                };
                bookings.push(booking.clone());
                Sourced::fallback(booking, &reason)
            }
        }
    }

    async fn submit(
        &self,
        form: &BookingForm,
        vehicle_id: &str,
        vehicle_name: &str,
    ) -> Result<Booking, String> {
        let fields = Fields::from_serialize(form)
            .map_err(|e| format!("unserializable booking form: {}", e))?
            .with("vehicleId", vehicle_id)
            .with("vehicleName", vehicle_name);
        let request = RequestEnvelope::post(BOOKINGS_ENDPOINT).body(fields);

        let response = self.client.request(&request).await.map_err(|e| e.to_string())?;
        match unwrap_with(&response.data, &UnwrapRules::DEFAULT) {
            ResponseEnvelope::Success(Payload::Single(raw)) => serde_json::from_value(raw)
                .map_err(|e| format!("malformed booking: {}", e)),
            ResponseEnvelope::Success(_) => Err("response carried no booking".to_string()),
            ResponseEnvelope::Failure { message, .. } => Err(message),
        }
    }

    /// Report a status change to the backend and apply it locally either way.
    /// Returns whether the booking is known locally.
    pub async fn update_status(&self, booking_id: &str, status: BookingStatus) -> bool {
        let endpoint = format!("{}/{}/status", BOOKINGS_ENDPOINT, path_segment(booking_id));
        let request = RequestEnvelope::post(endpoint).field("status", status.as_str());
        if let Err(err) = self.client.request(&request).await {
            warn!(booking_id, error = %err, "Booking status not reported to backend");
        }

        let mut bookings = self.bookings.write().await;
        match bookings.iter_mut().find(|b| b.id == booking_id) {
            Some(booking) => {
                booking.status = status;
                true
            }
            None => false,
        }
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.bookings.read().await.clone()
    }

    pub async fn booking_by_id(&self, id: &str) -> Option<Booking> {
        self.bookings.read().await.iter().find(|b| b.id == id).cloned()
    }

    pub async fn bookings_by_status(&self, status: BookingStatus) -> Vec<Booking> {
        self.filtered(|b| b.status == status).await
    }

    pub async fn confirmed_bookings(&self) -> Vec<Booking> {
        self.bookings_by_status(BookingStatus::Confirmed).await
    }

    pub async fn pending_bookings(&self) -> Vec<Booking> {
        self.bookings_by_status(BookingStatus::Pending).await
    }

    pub async fn bookings_by_vehicle(&self, vehicle_id: &str) -> Vec<Booking> {
        self.filtered(|b| b.vehicle_id == vehicle_id).await
    }

    pub async fn total_bookings(&self) -> usize {
        self.bookings.read().await.len()
    }

    pub async fn delete_booking(&self, id: &str) -> bool {
        let mut bookings = self.bookings.write().await;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        bookings.len() < before
    }

    async fn filtered(&self, keep: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        self.bookings
            .read()
            .await
            .iter()
            .filter(|b| keep(b))
            .cloned()
            .collect()
    }
}

/// Next `BKnnn` id, one past the highest suffix still in the ledger.
fn next_local_id(bookings: &[Booking]) -> String {
    let highest = bookings
        .iter()
        .filter_map(|b| b.id.strip_prefix("BK")?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("BK{:03}", highest + 1)
}

fn sample(
    id: &str,
    form: BookingForm,
    vehicle: (&str, &str),
    status: BookingStatus,
    created_at: &str,
    total_price: f64,
) -> Booking {
    Booking {
        id: id.to_string(),
        form,
        vehicle_id: vehicle.0.to_string(),
        vehicle_name: vehicle.1.to_string(),
        status,
        created_at: created_at.to_string(),
        total_price: Some(total_price),
    }
}

fn form(
    full_name: &str,
    phone_number: &str,
    journey_type: JourneyType,
    route: (&str, &str),
    departure_date: &str,
    amount_of_car: u32,
    remark: &str,
) -> BookingForm {
    BookingForm {
        full_name: full_name.to_string(),
        phone_number: phone_number.to_string(),
        journey_type,
        departure: route.0.to_string(),
        arrival: route.1.to_string(),
        departure_date: departure_date.to_string(),
        amount_of_car,
        remark: remark.to_string(),
    }
}

pub fn builtin_bookings() -> Vec<Booking> {
    vec![
        sample(
            "BK001",
            form(
                "John Smith",
                "+855 12 345 678",
                JourneyType::RoundTrip,
                ("phnom-penh", "siem-reap"),
                "2026-02-15",
                1,
                "Need English speaking driver",
            ),
            ("luxury-van-h350", "Hyundai Solati H-350"),
            BookingStatus::Confirmed,
            "2026-01-20T10:30:00Z",
            180.0,
        ),
        sample(
            "BK002",
            form(
                "Sarah Johnson",
                "+855 98 765 432",
                JourneyType::OneWay,
                ("siem-reap", "sihanoukville"),
                "2026-02-20",
                2,
                "Pickup from hotel at 8 AM",
            ),
            ("luxury-van-hiace", "Luxury Van Hiace"),
            BookingStatus::Pending,
            "2026-01-21T14:20:00Z",
            300.0,
        ),
        sample(
            "BK003",
            form(
                "Michael Chen",
                "+855 77 888 999",
                JourneyType::Trip,
                ("phnom-penh", "battambang"),
                "2026-03-01",
                1,
                "Full day tour with stops at temples",
            ),
            ("luxury-coaster", "Luxury Coaster"),
            BookingStatus::Confirmed,
            "2026-01-22T09:15:00Z",
            250.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vet_core::transport::mock::MockTransport;
    use vet_core::{DataSource, Method, TransportError};
    use vet_shared::Masked;

    fn service(transport: Arc<MockTransport>) -> BookingService {
        let client = ApiClient::new("http://api.test", Masked::from("t"), transport).unwrap();
        BookingService::new(Arc::new(client))
    }

    fn charter() -> BookingForm {
        form(
            "Dara Sok",
            "+855 10 222 333",
            JourneyType::OneWay,
            ("phnom-penh", "kampot"),
            "2026-04-01",
            1,
            "",
        )
    }

    #[tokio::test]
    async fn test_create_booking_live() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            BOOKINGS_ENDPOINT,
            json!({"data": {
                "id": "SRV-9",
                "fullName": "Dara Sok",
                "phoneNumber": "+855 10 222 333",
                "journeyType": "one-way",
                "departure": "phnom-penh",
                "arrival": "kampot",
                "departureDate": "2026-04-01",
                "amountOfCar": 1,
                "remark": "",
                "vehicleId": "luxury-van-h350",
                "vehicleName": "Hyundai Solati H-350",
                "status": "pending",
                "createdAt": "2026-03-20T08:00:00Z"
            }}),
        ));
        let service = service(transport.clone());

        let created = service
            .create_booking(charter(), "luxury-van-h350", "Hyundai Solati H-350")
            .await;

        assert_eq!(created.source, DataSource::Live);
        assert_eq!(created.value.id, "SRV-9");
        assert_eq!(service.total_bookings().await, 4);

        let body = transport.requests()[0].body.clone().unwrap();
        assert!(body.contains("fullName=Dara+Sok"));
        assert!(body.contains("vehicleId=luxury-van-h350"));
    }

    #[tokio::test]
    async fn test_create_booking_offline_is_local() {
        let transport = Arc::new(MockTransport::new().fail(
            Method::Post,
            BOOKINGS_ENDPOINT,
            TransportError::Connection("refused".into()),
        ));
        let service = service(transport);

        let created = service.create_booking(charter(), "luxury-coaster", "Luxury Coaster").await;

        assert!(created.is_degraded());
        assert_eq!(created.value.id, "BK004");
        assert_eq!(created.value.status, BookingStatus::Pending);
        assert!(created.value.created_at.ends_with('Z'));
        assert_eq!(service.pending_bookings().await.len(), 2);
    }

    #[tokio::test]
    async fn test_local_id_not_reused_after_delete() {
        let transport = Arc::new(MockTransport::new().fail(
            Method::Post,
            BOOKINGS_ENDPOINT,
            TransportError::Connection("refused".into()),
        ));
        let service = service(transport);
        assert!(service.delete_booking("BK001").await);

        let created = service.create_booking(charter(), "luxury-coaster", "Luxury Coaster").await;
        assert_eq!(created.value.id, "BK004");

        let ids: Vec<String> = service.bookings().await.into_iter().map(|b| b.id).collect();
        assert_eq!(ids, vec!["BK002", "BK003", "BK004"]);

        assert!(service.delete_booking("BK004").await);
        assert!(service.booking_by_id("BK003").await.is_some());
    }

    #[test]
    fn test_next_local_id_skips_foreign_ids() {
        let mut bookings = builtin_bookings();
        bookings[0].id = "SRV-77".to_string();
        assert_eq!(next_local_id(&bookings), "BK004");
        assert_eq!(next_local_id(&[]), "BK001");
    }

    #[tokio::test]
    async fn test_update_status_applies_locally_on_failure() {
        let transport = Arc::new(MockTransport::new().respond(
            Method::Post,
            "/bookings/BK002/status",
            500,
            r#"{"message":"server down"}"#,
        ));
        let service = service(transport.clone());

        assert!(service.update_status("BK002", BookingStatus::Cancelled).await);
        assert_eq!(
            service.booking_by_id("BK002").await.map(|b| b.status),
            Some(BookingStatus::Cancelled)
        );
        assert_eq!(transport.requests()[0].body.as_deref(), Some("status=cancelled"));
        assert!(!service.update_status("BK999", BookingStatus::Confirmed).await);
    }

    #[tokio::test]
    async fn test_queries_and_delete() {
        let service = service(Arc::new(MockTransport::new()));

        assert_eq!(service.confirmed_bookings().await.len(), 2);
        assert_eq!(service.bookings_by_vehicle("luxury-coaster").await[0].id, "BK003");
        assert!(service.delete_booking("BK001").await);
        assert!(!service.delete_booking("BK001").await);
        assert_eq!(service.total_bookings().await, 2);
    }
}
