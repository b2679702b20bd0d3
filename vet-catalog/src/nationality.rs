use std::sync::Arc;
use vet_core::pipeline::fetch_records;
use vet_core::{ApiClient, Outcome, RequestEnvelope, UnwrapRules};
use vet_shared::models::Nationality;

pub const NATIONALITY_ENDPOINT: &str = "/travel-package/nationalityList";

const NATIONALITY_RULES: UnwrapRules = UnwrapRules::DEFAULT
    .nested(&["nationalityList", "nationalities", "list", "data"])
    .failure_message("Failed to fetch nationalities");

pub struct NationalityService {
    client: Arc<ApiClient>,
}

impl NationalityService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn fetch_nationalities(&self) -> Outcome<Vec<Nationality>> {
        fetch_records(
            &self.client,
            &RequestEnvelope::post(NATIONALITY_ENDPOINT),
            &NATIONALITY_RULES,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vet_core::transport::mock::MockTransport;
    use vet_core::Method;
    use vet_shared::Masked;

    fn service(transport: Arc<MockTransport>) -> NationalityService {
        let client = ApiClient::new("http://api.test", Masked::from("t"), transport).unwrap();
        NationalityService::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_nested_list_in_body() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            NATIONALITY_ENDPOINT,
            json!({
                "header": {"result": true, "statusCode": 200},
                "body": {"nationalities": [
                    {"id": 1, "nationality": "Cambodian", "code": "KH"},
                    {"countryName": "Thai"}
                ]}
            }),
        ));
        let service = service(transport.clone());

        let outcome = service.fetch_nationalities().await;

        let items = outcome.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Cambodian");
        assert_eq!(items[1].id, "Thai");
        assert_eq!(transport.requests()[0].body, None);
    }

    #[tokio::test]
    async fn test_bare_array_and_data_shapes() {
        let transport = Arc::new(
            MockTransport::new()
                .respond_json(Method::Post, NATIONALITY_ENDPOINT, json!([{"id": "KH", "name": "Cambodia"}]))
                .respond_json(Method::Post, NATIONALITY_ENDPOINT, json!({"data": 0})),
        );
        let service = service(transport);

        assert_eq!(service.fetch_nationalities().await.items()[0].id, "KH");
        assert_eq!(service.fetch_nationalities().await, Outcome::Empty);
    }

    #[tokio::test]
    async fn test_header_failure() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            NATIONALITY_ENDPOINT,
            json!({"header": {"result": false}}),
        ));
        let outcome = service(transport).fetch_nationalities().await;
        assert_eq!(
            outcome.error().map(|e| e.message()).as_deref(),
            Some("Failed to fetch nationalities")
        );
    }
}
