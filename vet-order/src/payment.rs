use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};
use vet_core::normalize::to_number;
use vet_core::pipeline::fetch_payload;
use vet_core::{ApiClient, ApiError, Outcome, Payload, RequestEnvelope, UnwrapRules};

pub const CANCEL_ENDPOINT: &str = "/booking/cancel";
pub const PROCESS_PAYMENT_ENDPOINT: &str = "/booking/processPayment";
pub const TRANSACTION_ENDPOINT: &str = "/booking/checkTransaction";
pub const RESEND_TICKET_ENDPOINT: &str = "/booking/ticketSendEmail";

pub const PAYMENT_FAILED: &str = "Sorry, the payment process failed. Please try again.";

const PAYMENT_RULES: UnwrapRules = UnwrapRules::DEFAULT
    .strict_status()
    .failure_message(PAYMENT_FAILED);
const TRANSACTION_RULES: UnwrapRules = UnwrapRules::DEFAULT.bare_object();

/// Payment steps of an existing booking, keyed by its transaction id
pub struct PaymentService {
    client: Arc<ApiClient>,
}

impl PaymentService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Whether the backend accepted the cancellation. Placeholder ids are
    /// never sent.
    pub async fn cancel_booking(&self, transaction_id: &str) -> bool {
        let transaction_id = transaction_id.trim();
        if transaction_id.is_empty() || transaction_id == "-" {
            return false;
        }

        let request = RequestEnvelope::post(CANCEL_ENDPOINT).field("transactionId", transaction_id);
        match self.client.request(&request).await {
            Ok(_) => {
                info!(transaction_id, "Booking cancelled");
                true
            }
            Err(err) => {
                warn!(transaction_id, error = %err, "Booking cancellation failed");
                false
            }
        }
    }

    /// Start payment with the chosen method; returns the redirect the
    /// payment gateway expects.
    pub async fn process_payment(&self, code: &str, payment_method_id: i64) -> Result<String, ApiError> {
        if code.trim().is_empty() || payment_method_id == 0 {
            return Err(ApiError::MissingInput("transaction ID or payment method".into()));
        }

        let request = RequestEnvelope::post(PROCESS_PAYMENT_ENDPOINT)
            .field("code", code)
            .field("paymentMethodId", payment_method_id);
        let body = match fetch_payload(&self.client, &request, &PAYMENT_RULES).await? {
            Payload::Single(body) => body,
            _ => return Err(ApiError::UnexpectedPayload(PAYMENT_FAILED.into())),
        };

        let redirect = body
            .get("request")
            .and_then(Value::as_str)
            .filter(|r| !r.trim().is_empty());
        match redirect {
            Some(redirect) if to_number(body.get("status")) == 1.0 => Ok(redirect.to_string()),
            _ => Err(ApiError::UnexpectedPayload(PAYMENT_FAILED.into())),
        }
    }

    /// Transaction record; the backend sends it wrapped or bare
    pub async fn fetch_transaction_details(&self, transaction_id: &str) -> Outcome<Map<String, Value>> {
        if transaction_id.trim().is_empty() {
            return Outcome::Empty;
        }

        let request = RequestEnvelope::post(TRANSACTION_ENDPOINT).field("transactionId", transaction_id);
        match fetch_payload(&self.client, &request, &TRANSACTION_RULES).await {
            Ok(Payload::Single(Value::Object(details))) => Outcome::Loaded(details),
            Ok(_) => Outcome::Empty,
            Err(err) => Outcome::Failed(err),
        }
    }

    pub async fn resend_ticket_email(&self, transaction_id: &str) -> Result<(), ApiError> {
        if transaction_id.trim().is_empty() {
            return Err(ApiError::MissingInput("transaction ID".into()));
        }

        let request = RequestEnvelope::post(RESEND_TICKET_ENDPOINT).field("transactionId", transaction_id);
        self.client.request(&request).await?;
        info!(transaction_id, "E-ticket email resent");
        Ok(())
    }
}
