use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pii::Masked;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Masked<String>,
}

/// Account profile returned by the login endpoint; unknown keys are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: Masked<String>,
    pub user: Option<AuthUser>,
}

impl AuthSession {
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}
