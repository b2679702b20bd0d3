use serde::Serialize;
use vet_core::Outcome;

/// What a list page renders for a fetch result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ViewState {
    Ready(usize),
    NoResults,
    ErrorBanner(String),
}

impl<T> From<&Outcome<Vec<T>>> for ViewState {
    fn from(outcome: &Outcome<Vec<T>>) -> Self {
        match outcome {
            Outcome::Loaded(items) if items.is_empty() => ViewState::NoResults,
            Outcome::Loaded(items) => ViewState::Ready(items.len()),
            Outcome::Empty => ViewState::NoResults,
            Outcome::Failed(err) => ViewState::ErrorBanner(err.message()),
        }
    }
}
