//! Account sign-in. The token and profile outlive the process in session
//! storage under `auth_token` / `auth_user`.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};
use vet_core::{ApiClient, ApiError, Fields, RequestEnvelope, SessionError, SessionKey, SessionStorage};
use vet_shared::models::{AuthSession, AuthUser, LoginRequest};
use vet_shared::Masked;

pub const LOGIN_ENDPOINT: &str = "/user-register/login";

pub const LOGIN_FAILED: &str = "Login failed";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl AuthError {
    /// Message suitable for the login form
    pub fn message(&self) -> String {
        match self {
            AuthError::Api(err) => err.message(),
            other => other.to_string(),
        }
    }
}

pub struct AuthService {
    client: Arc<ApiClient>,
    session: Arc<dyn SessionStorage>,
    current: RwLock<Option<AuthSession>>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, session: Arc<dyn SessionStorage>) -> Self {
        Self {
            client,
            session,
            current: RwLock::new(None),
        }
    }

    pub async fn sign_in(&self, login: &LoginRequest) -> Result<AuthSession, AuthError> {
        let request = RequestEnvelope::post(LOGIN_ENDPOINT).body(
            Fields::new()
                .with("username", login.username.as_str())
                .with("password", login.password.expose().as_str()),
        );
        let response = self.client.request(&request).await?;

        let Some(token) = find_token(&response.data) else {
            let message = rejection_message(&response.data);
            warn!(username = %login.username, reason = %message, "Login rejected");
            return Err(AuthError::Rejected(message));
        };
        let user = find_user(&response.data);

        self.session.set(SessionKey::AuthToken, &token)?;
        self.session
            .set(SessionKey::AuthUser, &serde_json::to_string(&user).map_err(SessionError::from)?)?;

        let auth = AuthSession {
            token: Masked::from(token),
            user,
        };
        *self.current.write().await = Some(auth.clone());
        info!(username = %login.username, "Signed in");
        Ok(auth)
    }

    /// Reload the persisted sign-in, if any
    pub async fn restore(&self) -> Option<AuthSession> {
        let token = self.session.get_non_empty(SessionKey::AuthToken)?;
        let user = self
            .session
            .get(SessionKey::AuthUser)
            .and_then(|raw| match serde_json::from_str::<Option<AuthUser>>(&raw) {
                Ok(user) => user,
                Err(err) => {
                    warn!(error = %err, "Ignoring unreadable stored user");
                    None
                }
            });

        let auth = AuthSession {
            token: Masked::from(token),
            user,
        };
        *self.current.write().await = Some(auth.clone());
        Some(auth)
    }

    pub async fn sign_out(&self) -> Result<(), SessionError> {
        *self.current.write().await = None;
        self.session.remove(SessionKey::AuthToken)?;
        self.session.remove(SessionKey::AuthUser)
    }

    pub async fn current(&self) -> Option<AuthSession> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(AuthSession::is_authenticated)
    }
}

fn object(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| v.is_object())
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// `status` as sent by the login endpoint; only real booleans count
fn status_flag(value: Option<&Value>) -> Option<bool> {
    value.and_then(|v| v.get("status")).and_then(Value::as_bool)
}

fn message_when(value: Option<&Value>, status: bool) -> Option<&str> {
    match (status_flag(value), value) {
        (Some(flag), Some(value)) if flag == status => non_empty_str(value, "message"),
        _ => None,
    }
}

fn find_token(response: &Value) -> Option<String> {
    let body = object(response.get("body"));
    let nested = body.and_then(|b| object(b.get("data")));
    let data = object(response.get("data"));

    [body, nested, data, Some(response)]
        .into_iter()
        .flatten()
        .find_map(|source| {
            non_empty_str(source, "token").or_else(|| non_empty_str(source, "accessToken"))
        })
        .or_else(|| message_when(body, true))
        .or_else(|| message_when(data, true))
        .map(str::to_string)
}

fn find_user(response: &Value) -> Option<AuthUser> {
    let body = object(response.get("body"));
    let data = object(response.get("data"));

    [body, data, Some(response)]
        .into_iter()
        .flatten()
        .find_map(|source| source.get("user").filter(|u| !u.is_null()))
        .and_then(|user| serde_json::from_value(user.clone()).ok())
}

fn rejection_message(response: &Value) -> String {
    let body = object(response.get("body"));
    let data = object(response.get("data"));

    message_when(body, false)
        .or_else(|| message_when(data, false))
        .or_else(|| response.get("header").and_then(|h| non_empty_str(h, "message")))
        .or_else(|| non_empty_str(response, "message"))
        .unwrap_or(LOGIN_FAILED)
        .to_string()
}
