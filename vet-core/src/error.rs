use std::collections::BTreeMap;

/// Validation messages keyed by form field, as some endpoints return them
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Everything that can go wrong between a service call and a usable payload.
///
/// An empty result is not an error; see [`crate::Outcome::Empty`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No HTTP response was received, or a 2xx body was not JSON
    #[error("Network error: {message}")]
    Transport { message: String },

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        errors: Option<FieldErrors>,
    },

    /// A well-formed envelope whose header reports failure
    #[error("{message}")]
    Business {
        status_code: Option<u16>,
        message: String,
    },

    /// The request was skipped because a required value was missing
    #[error("Missing {0}")]
    MissingInput(String),

    /// The payload was well-formed but not usable for this endpoint
    #[error("{0}")]
    UnexpectedPayload(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    /// HTTP status associated with the error; `0` when no response was involved
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } => *status,
            ApiError::Business { status_code, .. } => status_code.unwrap_or(0),
            ApiError::Transport { .. }
            | ApiError::MissingInput(_)
            | ApiError::UnexpectedPayload(_) => 0,
        }
    }

    /// Message suitable for an error banner
    pub fn message(&self) -> String {
        match self {
            ApiError::Http { message, .. } | ApiError::Business { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Http { status: 404, .. })
    }
}
