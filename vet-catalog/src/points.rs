//! Boarding and drop-off points for a chosen schedule.

use std::sync::Arc;
use tracing::{info, warn};
use vet_core::pipeline::fetch_records;
use vet_core::{
    normalize, path_segment, try_in_order, ApiClient, ApiError, FallbackPlan, Fields, Outcome,
    RequestEnvelope, SessionKey, SessionStorage, UnwrapRules,
};
use vet_shared::models::{BoardingPoint, DropOffPoint};

pub const BOARDING_ENDPOINT: &str = "/boarding-point/listByScheduleDate";
pub const DROP_OFF_ENDPOINT: &str = "/drop-off-point/findBySchedule";

pub const DROP_OFF_NOT_FOUND: &str =
    "Drop-off point endpoint not found. Please check the API configuration.";

const BOARDING_RULES: UnwrapRules =
    UnwrapRules::DEFAULT.failure_message("Failed to fetch boarding points");
const DROP_OFF_RULES: UnwrapRules =
    UnwrapRules::DEFAULT.failure_message("Failed to fetch drop-off points");

pub struct PointService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionStorage>,
}

impl PointService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionStorage>) -> Self {
        Self { client, session }
    }

    /// Boarding points of a schedule on a date. Both default to the values
    /// persisted when the schedule was chosen; without them no request is sent.
    pub async fn fetch_boarding_points(
        &self,
        date: Option<&str>,
        schedule_id: Option<&str>,
    ) -> Outcome<Vec<BoardingPoint>> {
        let date = self.or_session(date, SessionKey::DateFrom);
        let schedule_id = self.or_session(schedule_id, SessionKey::JourneyId);

        let (Some(date), Some(schedule_id)) = (date, schedule_id) else {
            warn!("Boarding points request skipped: missing date or schedule id");
            return Outcome::Failed(ApiError::MissingInput(
                "date or schedule id for boarding points".into(),
            ));
        };

        let request = RequestEnvelope::post(BOARDING_ENDPOINT)
            .body(Fields::new().with("date", date).with("id", schedule_id));
        fetch_records(&self.client, &request, &BOARDING_RULES).await
    }

    /// Drop-off points for a boarding point, trying the request shapes the
    /// backend has accepted over time.
    pub async fn fetch_drop_off_points(
        &self,
        boarding_point_id: Option<&str>,
        date: Option<&str>,
    ) -> Outcome<Vec<DropOffPoint>> {
        let schedule_id = self.session.get_non_empty(SessionKey::JourneyId);
        let Some(boarding_point_id) = non_empty(boarding_point_id).or_else(|| schedule_id.clone())
        else {
            warn!("Drop-off points request skipped: no boarding point id");
            return Outcome::Failed(ApiError::MissingInput(
                "boarding point ID for drop-off points".into(),
            ));
        };
        let date = self.or_session(date, SessionKey::DateFrom);

        let plan = drop_off_plan(&boarding_point_id, schedule_id.as_deref(), date.as_deref());
        let outcome = try_in_order(&self.client, &plan, &DROP_OFF_RULES).await;

        if outcome.is_resolved() {
            let points: Vec<DropOffPoint> = normalize::from_payload(outcome.payload);
            info!(count = points.len(), "Fetched drop-off points");
            return Outcome::from_items(points);
        }

        match outcome.last_error() {
            Some(err) if outcome.all_failed(plan.len()) => Outcome::Failed(drop_off_error(err)),
            _ => Outcome::Empty,
        }
    }

    fn or_session(&self, value: Option<&str>, key: SessionKey) -> Option<String> {
        non_empty(value).or_else(|| self.session.get_non_empty(key))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn drop_off_plan(boarding_point_id: &str, schedule_id: Option<&str>, date: Option<&str>) -> FallbackPlan {
    let with_date = |fields: Fields| fields.with_opt("date", date);

    let by_path = format!("{}/{}", DROP_OFF_ENDPOINT, path_segment(boarding_point_id));

    let mut plan = FallbackPlan::new()
        .then(RequestEnvelope::post(by_path).body(with_date(Fields::new())))
        .then(
            RequestEnvelope::post(DROP_OFF_ENDPOINT)
                .body(with_date(Fields::new().with("id", boarding_point_id))),
        );

    if let Some(schedule_id) = schedule_id.filter(|id| *id != boarding_point_id) {
        plan.push(
            RequestEnvelope::post(DROP_OFF_ENDPOINT)
                .body(with_date(Fields::new().with("id", schedule_id))),
        );
    }
    plan
}

fn drop_off_error(err: &ApiError) -> ApiError {
    if err.is_not_found() {
        ApiError::Http {
            status: 404,
            message: DROP_OFF_NOT_FOUND.to_string(),
            errors: None,
        }
    } else {
        err.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vet_core::transport::mock::MockTransport;
    use vet_core::Method;
    use vet_shared::Masked;
    use vet_store::SessionStore;

    fn service(transport: Arc<MockTransport>) -> (PointService, Arc<SessionStore>) {
        let client = ApiClient::new("http://api.test", Masked::from("t"), transport).unwrap();
        let session = Arc::new(SessionStore::in_memory());
        (PointService::new(Arc::new(client), session.clone()), session)
    }

    #[tokio::test]
    async fn test_boarding_points_from_session() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            BOARDING_ENDPOINT,
            json!({"header": {"result": true, "statusCode": 200}, "body": [{"id": 1, "name": "Wat Phnom"}]}),
        ));
        let (service, session) = service(transport.clone());
        session.set(SessionKey::DateFrom, "2026-03-01").unwrap();
        session.set(SessionKey::JourneyId, "77").unwrap();

        let outcome = service.fetch_boarding_points(None, None).await;

        assert_eq!(outcome.items().len(), 1);
        assert_eq!(outcome.items()[0].name, "Wat Phnom");
        assert_eq!(transport.requests()[0].body.as_deref(), Some("date=2026-03-01&id=77"));
    }

    #[tokio::test]
    async fn test_boarding_points_skipped_without_inputs() {
        let transport = Arc::new(MockTransport::new());
        let (service, _) = service(transport.clone());

        let outcome = service.fetch_boarding_points(Some("2026-03-01"), None).await;

        assert_eq!(
            outcome.error().map(ApiError::to_string).as_deref(),
            Some("Missing date or schedule id for boarding points")
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_drop_off_falls_back_to_body_id() {
        let transport = Arc::new(
            MockTransport::new()
                .respond(Method::Post, "/drop-off-point/findBySchedule/12", 404, "Not Found")
                .respond_json(
                    Method::Post,
                    DROP_OFF_ENDPOINT,
                    json!({"header": {"result": true}, "body": {"id": 4, "name": "Kampot Bridge", "arrivalTime": "11:30"}}),
                ),
        );
        let (service, _) = service(transport.clone());

        let outcome = service.fetch_drop_off_points(Some("12"), Some("2026-03-01")).await;

        assert_eq!(outcome.items().len(), 1);
        assert_eq!(outcome.items()[0].time.as_deref(), Some("11:30"));
        assert_eq!(
            transport.paths(),
            vec!["/drop-off-point/findBySchedule/12", "/drop-off-point/findBySchedule"]
        );
        assert_eq!(transport.requests()[1].body.as_deref(), Some("id=12&date=2026-03-01"));
    }

    #[tokio::test]
    async fn test_drop_off_id_is_one_path_segment() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            "/drop-off-point/findBySchedule/a%2Fb%20c",
            json!([{"id": 8, "name": "Kampot Market"}]),
        ));
        let (service, _) = service(transport.clone());

        let outcome = service.fetch_drop_off_points(Some("a/b c"), None).await;

        assert_eq!(outcome.items()[0].name, "Kampot Market");
        assert_eq!(transport.paths(), vec!["/drop-off-point/findBySchedule/a%2Fb%20c"]);
    }

    #[tokio::test]
    async fn test_drop_off_tries_schedule_id_last() {
        let transport = Arc::new(
            MockTransport::new()
                .respond_json(Method::Post, "/drop-off-point/findBySchedule/12", json!({"body": 0}))
                .respond_json(Method::Post, DROP_OFF_ENDPOINT, json!({"body": 0}))
                .respond_json(Method::Post, DROP_OFF_ENDPOINT, json!([{"id": 5, "name": "Kep"}])),
        );
        let (service, session) = service(transport.clone());
        session.set(SessionKey::JourneyId, "900").unwrap();

        let outcome = service.fetch_drop_off_points(Some("12"), None).await;

        assert_eq!(outcome.items()[0].name, "Kep");
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(transport.requests()[2].body.as_deref(), Some("id=900"));
    }

    #[tokio::test]
    async fn test_drop_off_not_found_message() {
        let (service, _) = service(Arc::new(MockTransport::new()));

        let outcome = service.fetch_drop_off_points(Some("12"), None).await;

        assert_eq!(outcome.error().map(ApiError::message).as_deref(), Some(DROP_OFF_NOT_FOUND));
        assert_eq!(outcome.error().map(ApiError::status), Some(404));
    }

    #[tokio::test]
    async fn test_drop_off_all_empty_is_empty() {
        let transport = Arc::new(
            MockTransport::new()
                .respond_json(Method::Post, "/drop-off-point/findBySchedule/12", json!({}))
                .respond(Method::Post, DROP_OFF_ENDPOINT, 500, r#"{"message":"boom"}"#),
        );
        let (service, _) = service(transport);

        let outcome = service.fetch_drop_off_points(Some("12"), None).await;
        assert_eq!(outcome, Outcome::Empty);
    }
}
