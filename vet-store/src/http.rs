//! reqwest-backed [`Transport`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::trace;
use vet_core::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(map_reqwest_error)?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;
        trace!(status, bytes = body.len(), "Received response");

        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vet_core::transport::{AUTHORIZATION, CONTENT_TYPE, FORM_CONTENT_TYPE};

    fn request(method: Method, url: String, body: Option<&str>) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![
                (AUTHORIZATION.to_string(), "Bearer test-token".to_string()),
                (CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: body.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_sends_form_post() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/seat/layout")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", FORM_CONTENT_TYPE)
            .match_body("date=2026-03-01&journey=42")
            .with_status(200)
            .with_body(r#"{"header":{"result":true},"body":[]}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new();
        let response = transport
            .send(request(
                Method::Post,
                format!("{}/seat/layout", server.url()),
                Some("date=2026-03-01&journey=42"),
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.body.contains("\"result\":true"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/bookings")
            .with_status(500)
            .with_body(r#"{"message":"server down"}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new();
        let response = transport
            .send(request(Method::Get, format!("{}/bookings", server.url()), None))
            .await
            .unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(response.body, r#"{"message":"server down"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let transport = ReqwestTransport::with_timeout(Some(Duration::from_secs(5))).unwrap();
        let result = transport
            .send(request(Method::Get, "http://127.0.0.1:1/unreachable".to_string(), None))
            .await;
        assert!(matches!(result, Err(TransportError::Connection(_))));
    }
}
