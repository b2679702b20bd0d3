use async_trait::async_trait;

use crate::request::Method;

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// A fully built request, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and undecoded body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures where no HTTP response was received
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Request timeout")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// Sends requests to the backend. Implemented over reqwest in `vet-store`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub mod mock {
    //! Scripted in-process transport for service tests.

    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Mutex, PoisonError};

    type Reply = Result<HttpResponse, TransportError>;

    /// Replies are matched on method and URL path (query ignored). Each route
    /// replays its scripted replies in order and repeats the last one.
    /// Unscripted routes answer 404.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        routes: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, method: Method, path: &str, status: u16, body: impl Into<String>) -> Self {
            self.push(method, path, Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn respond_json(self, method: Method, path: &str, body: serde_json::Value) -> Self {
            self.respond(method, path, 200, body.to_string())
        }

        pub fn fail(self, method: Method, path: &str, error: TransportError) -> Self {
            self.push(method, path, Err(error));
            self
        }

        fn push(&self, method: Method, path: &str, reply: Reply) {
            self.routes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entry((method, path.to_string()))
                .or_default()
                .push_back(reply);
        }

        /// Every request sent so far, in order
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Paths of the requests sent so far, in order
        pub fn paths(&self) -> Vec<String> {
            self.requests().iter().map(|r| path_of(&r.url)).collect()
        }
    }

    fn path_of(url: &str) -> String {
        match url::Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.split('?').next().unwrap_or(url).to_string(),
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
            let key = (request.method, path_of(&request.url));
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);

            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            match routes.get_mut(&key) {
                Some(replies) if replies.len() > 1 => replies
                    .pop_front()
                    .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".into()))),
                Some(replies) => replies
                    .front()
                    .cloned()
                    .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".into()))),
                None => Ok(HttpResponse::new(404, r#"{"message":"Not Found"}"#)),
            }
        }
    }
}
