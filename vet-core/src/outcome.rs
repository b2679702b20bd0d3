use tracing::warn;

use crate::error::ApiError;

/// Result of one service call, scoped to that call.
///
/// `Empty` is a successful response with nothing in it; it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Loaded(T),
    Empty,
    Failed(ApiError),
}

impl<T> Outcome<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Outcome::Loaded(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Outcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Outcome::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            Outcome::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Loaded(value) => Outcome::Loaded(f(value)),
            Outcome::Empty => Outcome::Empty,
            Outcome::Failed(err) => Outcome::Failed(err),
        }
    }

    pub fn into_result(self) -> Result<Option<T>, ApiError> {
        match self {
            Outcome::Loaded(value) => Ok(Some(value)),
            Outcome::Empty => Ok(None),
            Outcome::Failed(err) => Err(err),
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// `Empty` for an empty list, `Loaded` otherwise
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Outcome::Empty
        } else {
            Outcome::Loaded(items)
        }
    }

    /// Loaded items, or an empty slice
    pub fn items(&self) -> &[T] {
        match self {
            Outcome::Loaded(items) => items,
            _ => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.into_loaded().unwrap_or_default()
    }
}

impl<T> From<ApiError> for Outcome<T> {
    fn from(err: ApiError) -> Self {
        Outcome::Failed(err)
    }
}

/// Where a served value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    /// Built-in data served because the backend could not be used
    Fallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Self {
            value,
            source: DataSource::Live,
        }
    }

    /// Serve built-in data, logging why
    pub fn fallback(value: T, reason: &str) -> Self {
        warn!(reason, "Serving built-in data in degraded mode");
        Self {
            value,
            source: DataSource::Fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.source == DataSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_items() {
        assert_eq!(Outcome::<Vec<u8>>::from_items(vec![]), Outcome::Empty);
        assert_eq!(Outcome::from_items(vec![1, 2]).items(), &[1, 2]);
    }

    #[test]
    fn test_failed_has_no_items() {
        let outcome: Outcome<Vec<u8>> = ApiError::transport("offline").into();
        assert!(outcome.items().is_empty());
        assert_eq!(outcome.error().map(ApiError::status), Some(0));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_map_keeps_variant() {
        assert_eq!(Outcome::Loaded(2).map(|n| n * 10), Outcome::Loaded(20));
        assert_eq!(Outcome::<u8>::Empty.map(|n| n * 10), Outcome::Empty);
    }

    #[test]
    fn test_sourced() {
        assert!(!Sourced::live(1).is_degraded());
        assert!(Sourced::fallback(1, "backend unavailable").is_degraded());
    }
}
