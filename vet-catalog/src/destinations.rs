use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use vet_core::pipeline::fetch_records;
use vet_core::{
    ApiClient, Fields, Outcome, RequestEnvelope, SessionError, SessionKey, SessionStorage,
    UnwrapRules,
};
use vet_shared::models::{Destination, SearchParams};

pub const ORIGINS_ENDPOINT: &str = "/destination/from";
pub const DESTINATIONS_ENDPOINT: &str = "/destination/to";

/// Vehicle type sent with every destination lookup
pub const DEFAULT_VEHICLE_TYPE: i64 = 1;

const ORIGIN_RULES: UnwrapRules = UnwrapRules::DEFAULT
    .strict_status()
    .failure_message("Failed to fetch origins");
const DESTINATION_RULES: UnwrapRules = UnwrapRules::DEFAULT
    .strict_status()
    .failure_message("Failed to fetch destinations");

#[derive(Debug, Default)]
struct DestinationState {
    origins: Vec<Destination>,
    destinations: Vec<Destination>,
    current_type: String,
    search_params: SearchParams,
}

/// Departure and arrival lookups for the search form
pub struct DestinationService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionStorage>,
    state: RwLock<DestinationState>,
}

impl DestinationService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionStorage>) -> Self {
        Self {
            client,
            session,
            state: RwLock::new(DestinationState::default()),
        }
    }

    pub async fn fetch_origins(&self, search_text: &str) -> Outcome<Vec<Destination>> {
        let request = RequestEnvelope::post(ORIGINS_ENDPOINT).body(
            Fields::new()
                .with("searchText", search_text)
                .with("type", DEFAULT_VEHICLE_TYPE),
        );
        let outcome = fetch_records(&self.client, &request, &ORIGIN_RULES).await;
        if !outcome.is_failed() {
            self.state.write().await.origins = outcome.items().to_vec();
        }
        outcome
    }

    /// Arrival points, optionally restricted to those reachable from `departure_id`
    pub async fn fetch_destinations(
        &self,
        search_text: &str,
        departure_id: Option<&str>,
    ) -> Outcome<Vec<Destination>> {
        let body = Fields::new()
            .with("searchText", search_text)
            .with("type", DEFAULT_VEHICLE_TYPE)
            .with_opt("fromId", departure_id);
        let request = RequestEnvelope::post(DESTINATIONS_ENDPOINT).body(body);

        let outcome = fetch_records(&self.client, &request, &DESTINATION_RULES).await;
        if !outcome.is_failed() {
            self.state.write().await.destinations = outcome.items().to_vec();
        }
        outcome
    }

    pub async fn origins(&self) -> Vec<Destination> {
        self.state.read().await.origins.clone()
    }

    pub async fn destinations(&self) -> Vec<Destination> {
        self.state.read().await.destinations.clone()
    }

    /// Case-insensitive lookup among the last fetched origins
    pub async fn origin_by_name(&self, name: &str) -> Option<Destination> {
        find_by_name(&self.state.read().await.origins, name).cloned()
    }

    pub async fn destination_by_name(&self, name: &str) -> Option<Destination> {
        find_by_name(&self.state.read().await.destinations, name).cloned()
    }

    pub async fn search_params(&self) -> SearchParams {
        self.state.read().await.search_params.clone()
    }

    /// Replace the search filters and persist the ids later calls read back
    pub async fn set_search_params(&self, params: SearchParams) -> Result<(), SessionError> {
        set_if_present(&*self.session, SessionKey::DepartureFromId, &params.destination_from)?;
        set_if_present(&*self.session, SessionKey::DestinationToId, &params.destination_to)?;
        self.session.set(SessionKey::ReturnDate, &params.return_date)?;
        set_if_present(&*self.session, SessionKey::Types, &params.trip_type)?;
        set_if_present(&*self.session, SessionKey::Nationally, &params.nationally)?;

        debug!(
            from = %params.destination_from,
            to = %params.destination_to,
            "Search parameters updated"
        );
        self.state.write().await.search_params = params;
        Ok(())
    }

    pub async fn set_type(&self, vehicle_type: &str) -> Result<(), SessionError> {
        self.session.set(SessionKey::Types, vehicle_type)?;
        self.state.write().await.current_type = vehicle_type.to_string();
        Ok(())
    }

    pub async fn current_type(&self) -> String {
        self.state.read().await.current_type.clone()
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.origins.clear();
        state.destinations.clear();
    }
}

fn set_if_present(
    session: &dyn SessionStorage,
    key: SessionKey,
    value: &str,
) -> Result<(), SessionError> {
    if value.is_empty() {
        return Ok(());
    }
    session.set(key, value)
}

pub fn find_by_name<'a>(list: &'a [Destination], name: &str) -> Option<&'a Destination> {
    list.iter().find(|d| d.name.to_lowercase() == name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vet_core::transport::mock::MockTransport;
    use vet_core::{ApiError, Method};
    use vet_shared::Masked;
    use vet_store::SessionStore;

    fn service(transport: Arc<MockTransport>) -> (DestinationService, Arc<SessionStore>) {
        let client = ApiClient::new("http://api.test", Masked::from("t"), transport).unwrap();
        let session = Arc::new(SessionStore::in_memory());
        (DestinationService::new(Arc::new(client), session.clone()), session)
    }

    #[tokio::test]
    async fn test_fetch_origins() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            ORIGINS_ENDPOINT,
            json!({
                "header": {"result": true, "statusCode": 200},
                "body": [{"id": 1, "nameEn": "Phnom Penh"}, {"id": 2, "name": "Siem Reap"}]
            }),
        ));
        let (service, _) = service(transport.clone());

        let outcome = service.fetch_origins("").await;

        assert_eq!(outcome.items().len(), 2);
        assert_eq!(outcome.items()[0].name, "Phnom Penh");
        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some("searchText=&type=1")
        );
        assert_eq!(service.origin_by_name("siem reap").await.map(|d| d.id), Some("2".into()));
    }

    #[tokio::test]
    async fn test_destinations_with_from_id() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            DESTINATIONS_ENDPOINT,
            json!({"header": {"result": true, "statusCode": 200}, "body": 0}),
        ));
        let (service, _) = service(transport.clone());

        let outcome = service.fetch_destinations("kam", Some("1")).await;

        assert_eq!(outcome, Outcome::Empty);
        assert_eq!(
            transport.requests()[0].body.as_deref(),
            Some("searchText=kam&type=1&fromId=1")
        );
    }

    #[tokio::test]
    async fn test_non_200_status_is_failure() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            ORIGINS_ENDPOINT,
            json!({"header": {"result": true, "statusCode": 500}, "body": [{"id": 1, "name": "X"}]}),
        ));
        let (service, _) = service(transport);

        let outcome = service.fetch_origins("").await;
        assert_eq!(
            outcome.error(),
            Some(&ApiError::Business {
                status_code: Some(500),
                message: "Failed to fetch origins".into()
            })
        );
        assert!(service.origins().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_params_persisted() {
        let (service, session) = service(Arc::new(MockTransport::new()));

        service
            .set_search_params(SearchParams {
                destination_from: "1".into(),
                destination_to: "9".into(),
                depart_date: "2026-03-01".into(),
                trip_type: "2".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(session.get(SessionKey::DepartureFromId).as_deref(), Some("1"));
        assert_eq!(session.get(SessionKey::DestinationToId).as_deref(), Some("9"));
        assert_eq!(session.get(SessionKey::ReturnDate).as_deref(), Some(""));
        assert_eq!(session.get(SessionKey::Types).as_deref(), Some("2"));
        assert_eq!(session.get(SessionKey::Nationally).as_deref(), Some("local"));
        assert_eq!(service.search_params().await.depart_date, "2026-03-01");

        service.set_type("3").await.unwrap();
        assert_eq!(service.current_type().await, "3");
        assert_eq!(session.get(SessionKey::Types).as_deref(), Some("3"));
    }
}
