//! The request → unwrap → normalize chain shared by every list endpoint.

use tracing::info;

use crate::client::ApiClient;
use crate::envelope::{unwrap_with, Payload, ResponseEnvelope, UnwrapRules};
use crate::error::{ApiError, ApiResult};
use crate::normalize::{from_payload, Normalize};
use crate::outcome::Outcome;
use crate::request::RequestEnvelope;

/// Send a request and unwrap its envelope; a failing header becomes
/// [`ApiError::Business`].
pub async fn fetch_payload(
    client: &ApiClient,
    request: &RequestEnvelope,
    rules: &UnwrapRules,
) -> ApiResult<Payload> {
    let response = client.request(request).await?;
    match unwrap_with(&response.data, rules) {
        ResponseEnvelope::Success(payload) => Ok(payload),
        ResponseEnvelope::Failure {
            message,
            status_code,
        } => Err(ApiError::Business {
            status_code,
            message,
        }),
    }
}

/// Fetch and normalize a list of records
pub async fn fetch_records<T: Normalize>(
    client: &ApiClient,
    request: &RequestEnvelope,
    rules: &UnwrapRules,
) -> Outcome<Vec<T>> {
    match fetch_payload(client, request, rules).await {
        Ok(payload) => records_outcome(payload, &request.endpoint),
        Err(err) => Outcome::Failed(err),
    }
}

pub(crate) fn records_outcome<T: Normalize>(payload: Payload, endpoint: &str) -> Outcome<Vec<T>> {
    let records: Vec<T> = from_payload(payload);
    info!(kind = %T::KIND, endpoint, count = records.len(), "Fetched records");
    Outcome::from_items(records)
}
