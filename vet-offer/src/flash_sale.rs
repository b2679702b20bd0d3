use std::sync::Arc;
use vet_core::pipeline::fetch_records;
use vet_core::{ApiClient, Fields, Outcome, RequestEnvelope, UnwrapRules};
use vet_shared::models::FlashSaleCard;

pub const PROMOTION_ENDPOINT: &str = "/promotion/list";

/// Promotion type of flash-sale cards
pub const FLASH_SALE_TYPE: i64 = 1;

const PROMOTION_RULES: UnwrapRules = UnwrapRules::DEFAULT
    .nested(&["body", "data", "list"])
    .failure_message("Failed to fetch flash sales");

pub struct FlashSaleService {
    client: Arc<ApiClient>,
}

impl FlashSaleService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn fetch_flash_sales(&self, lang: &str) -> Outcome<Vec<FlashSaleCard>> {
        let request = RequestEnvelope::post(PROMOTION_ENDPOINT).body(
            Fields::new()
                .with("type", FLASH_SALE_TYPE)
                .with("lang", lang),
        );
        fetch_records(&self.client, &request, &PROMOTION_RULES).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vet_core::transport::mock::MockTransport;
    use vet_core::Method;
    use vet_shared::Masked;

    fn service(transport: Arc<MockTransport>) -> FlashSaleService {
        let client = ApiClient::new("http://api.test", Masked::from("t"), transport).unwrap();
        FlashSaleService::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_promotion_list() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            PROMOTION_ENDPOINT,
            json!({"data": {"body": [{"id": 5, "price": "12"}]}}),
        ));
        let service = service(transport.clone());

        let outcome = service.fetch_flash_sales("en").await;

        let cards = outcome.items();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, "5");
        assert_eq!(cards[0].price, 12.0);
        assert_eq!(transport.requests()[0].body.as_deref(), Some("type=1&lang=en"));
    }

    #[tokio::test]
    async fn test_positions_number_cards_without_id() {
        let transport = Arc::new(MockTransport::new().respond_json(
            Method::Post,
            PROMOTION_ENDPOINT,
            json!({"header": {"result": true}, "body": [{"title": "A"}, {"title": "B"}]}),
        ));
        let outcome = service(transport).fetch_flash_sales("km").await;
        let ids: Vec<&str> = outcome.items().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_transport_error_is_failed() {
        let transport = Arc::new(MockTransport::new().fail(
            Method::Post,
            PROMOTION_ENDPOINT,
            vet_core::TransportError::Timeout,
        ));
        let outcome = service(transport).fetch_flash_sales("en").await;
        assert_eq!(outcome.error().map(|e| e.status()), Some(0));
        assert!(outcome.items().is_empty());
    }
}
