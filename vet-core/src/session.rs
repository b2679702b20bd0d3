use std::fmt;

/// Keys of the values persisted between page loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    DateFrom,
    JourneyId,
    DepartureFromId,
    DestinationToId,
    ReturnDate,
    Types,
    Nationally,
    AuthToken,
    AuthUser,
    LastOrderId,
}

impl SessionKey {
    pub const ALL: [SessionKey; 10] = [
        SessionKey::DateFrom,
        SessionKey::JourneyId,
        SessionKey::DepartureFromId,
        SessionKey::DestinationToId,
        SessionKey::ReturnDate,
        SessionKey::Types,
        SessionKey::Nationally,
        SessionKey::AuthToken,
        SessionKey::AuthUser,
        SessionKey::LastOrderId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::DateFrom => "dateFrom",
            SessionKey::JourneyId => "journeyid",
            SessionKey::DepartureFromId => "departureFromId",
            SessionKey::DestinationToId => "destinationToId",
            SessionKey::ReturnDate => "returnDate",
            SessionKey::Types => "types",
            SessionKey::Nationally => "nationally",
            SessionKey::AuthToken => "auth_token",
            SessionKey::AuthUser => "auth_user",
            SessionKey::LastOrderId => "lastOrderId",
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage that outlives a single call.
/// Values are stored and read back verbatim.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: SessionKey) -> Option<String>;

    fn set(&self, key: SessionKey, value: &str) -> Result<(), SessionError>;

    fn remove(&self, key: SessionKey) -> Result<(), SessionError>;

    /// Stored value, treating blank as absent
    fn get_non_empty(&self, key: SessionKey) -> Option<String> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }
}
