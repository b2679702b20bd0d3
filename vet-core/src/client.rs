use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, error};
use uuid::Uuid;
use vet_shared::Masked;

use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::request::{Fields, Method, RequestEnvelope};
use crate::transport::{
    HttpRequest, HttpResponse, Transport, TransportError, AUTHORIZATION, CONTENT_TYPE,
    FORM_CONTENT_TYPE,
};

/// Uniform result of a successful call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// Decoded JSON body; `Null` for an empty body
    pub data: Value,
    pub status: u16,
    pub success: bool,
    /// Top-level `message` of the body, if it had one
    pub message: Option<String>,
}

/// Loading and last-error indicators shared by every call on one client.
///
/// Each call clears the last error when it starts, and marks itself done on
/// every exit path through [`InFlight`]'s `Drop`.
#[derive(Debug, Default)]
pub struct RequestState {
    in_flight: AtomicUsize,
    last_error: Mutex<Option<ApiError>>,
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_error(&self) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn record_error(&self, error: ApiError) {
        *self.last_error.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn begin(&self) -> InFlight<'_> {
        self.clear_error();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlight(self)
    }
}

struct InFlight<'a>(&'a RequestState);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Form-encoding API client with a static bearer token
pub struct ApiClient {
    base_url: String,
    token: Masked<String>,
    transport: Arc<dyn Transport>,
    state: Arc<RequestState>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .field("state", &self.state)
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        token: Masked<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, url::ParseError> {
        url::Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            transport,
            state: Arc::new(RequestState::default()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn state(&self) -> Arc<RequestState> {
        self.state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn last_error(&self) -> Option<ApiError> {
        self.state.last_error()
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }

    pub async fn get(&self, endpoint: &str, params: Option<Fields>) -> ApiResult<ApiResponse> {
        let mut request = RequestEnvelope::get(endpoint);
        request.params = params;
        self.request(&request).await
    }

    pub async fn post(&self, endpoint: &str, body: Option<Fields>) -> ApiResult<ApiResponse> {
        let mut request = RequestEnvelope::post(endpoint);
        request.body = body;
        self.request(&request).await
    }

    pub async fn put(&self, endpoint: &str, body: Option<Fields>) -> ApiResult<ApiResponse> {
        let mut request = RequestEnvelope::new(Method::Put, endpoint);
        request.body = body;
        self.request(&request).await
    }

    pub async fn patch(&self, endpoint: &str, body: Option<Fields>) -> ApiResult<ApiResponse> {
        let mut request = RequestEnvelope::new(Method::Patch, endpoint);
        request.body = body;
        self.request(&request).await
    }

    pub async fn delete(&self, endpoint: &str) -> ApiResult<ApiResponse> {
        self.request(&RequestEnvelope::new(Method::Delete, endpoint)).await
    }

    /// Send one request. Failures are returned and also recorded as the
    /// client's last error.
    pub async fn request(&self, envelope: &RequestEnvelope) -> ApiResult<ApiResponse> {
        let _in_flight = self.state.begin();
        let request_id = Uuid::new_v4();

        let result = match self.build(envelope) {
            Ok(http_request) => {
                debug!(
                    %request_id,
                    method = %envelope.method,
                    endpoint = %envelope.endpoint,
                    "Dispatching API request"
                );
                match self.transport.send(http_request).await {
                    Ok(response) => decode(response),
                    Err(err) => Err(transport_error(err)),
                }
            }
            Err(err) => Err(err),
        };

        match &result {
            Ok(response) => debug!(%request_id, status = response.status, "API request succeeded"),
            Err(err) => {
                error!(
                    %request_id,
                    endpoint = %envelope.endpoint,
                    status = err.status(),
                    "API Error: {}",
                    err
                );
                self.state.record_error(err.clone());
            }
        }
        result
    }

    fn build(&self, envelope: &RequestEnvelope) -> ApiResult<HttpRequest> {
        let query = envelope
            .query_string()
            .map_err(|e| ApiError::transport(format!("Failed to encode query: {}", e)))?;
        let body = envelope
            .form_body()
            .map_err(|e| ApiError::transport(format!("Failed to encode form body: {}", e)))?;

        Ok(HttpRequest {
            method: envelope.method,
            url: format!("{}{}{}", self.base_url, envelope.endpoint, query),
            headers: vec![
                (AUTHORIZATION.to_string(), format!("Bearer {}", self.token.expose())),
                (CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body,
        })
    }
}

fn transport_error(err: TransportError) -> ApiError {
    let message = match err {
        TransportError::Other(msg) if msg.trim().is_empty() => "Network error".to_string(),
        other => other.to_string(),
    };
    ApiError::Transport { message }
}

fn decode(response: HttpResponse) -> ApiResult<ApiResponse> {
    let parsed = parse_body(&response.body);

    if !response.is_success() {
        let body = parsed.unwrap_or(Value::Null);
        let message = text_field(&body, "message")
            .or_else(|| text_field(&body, "error"))
            .unwrap_or_else(|| format!("HTTP Error {}", response.status));
        let errors = body
            .get("errors")
            .and_then(|e| serde_json::from_value::<FieldErrors>(e.clone()).ok());
        return Err(ApiError::Http {
            status: response.status,
            message,
            errors,
        });
    }

    let data = parsed.map_err(|e| ApiError::transport(format!("Invalid JSON response: {}", e)))?;
    let message = text_field(&data, "message");
    Ok(ApiResponse {
        data,
        status: response.status,
        success: true,
        message,
    })
}

fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
