//! Trying alternative request shapes until one returns data.
//!
//! Some endpoints accept their key either as a path segment or as a body
//! field depending on the deployment. A [`FallbackPlan`] lists the shapes in
//! order; [`try_in_order`] stops at the first one that yields a non-empty
//! payload.

use tracing::{debug, info};

use crate::client::ApiClient;
use crate::envelope::{Payload, UnwrapRules};
use crate::error::ApiError;
use crate::pipeline::fetch_payload;
use crate::request::RequestEnvelope;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackPlan {
    candidates: Vec<RequestEnvelope>,
}

impl FallbackPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, candidate: RequestEnvelope) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn push(&mut self, candidate: RequestEnvelope) {
        self.candidates.push(candidate);
    }

    pub fn candidates(&self) -> &[RequestEnvelope] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl FromIterator<RequestEnvelope> for FallbackPlan {
    fn from_iter<I: IntoIterator<Item = RequestEnvelope>>(iter: I) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackOutcome {
    /// Payload of the resolving candidate, or `Empty` when none resolved
    pub payload: Payload,
    /// Index of the candidate that resolved
    pub resolved_by: Option<usize>,
    /// Errors from the candidates that were tried, in order
    pub errors: Vec<ApiError>,
}

impl FallbackOutcome {
    pub fn is_resolved(&self) -> bool {
        self.resolved_by.is_some()
    }

    pub fn last_error(&self) -> Option<&ApiError> {
        self.errors.last()
    }

    /// True when nothing resolved and every candidate failed outright
    pub fn all_failed(&self, attempted: usize) -> bool {
        !self.is_resolved() && attempted > 0 && self.errors.len() == attempted
    }
}

/// Try each candidate in order. Empty payloads, header failures and
/// transport errors all move on to the next candidate; nothing after the
/// resolving candidate is sent.
pub async fn try_in_order(
    client: &ApiClient,
    plan: &FallbackPlan,
    rules: &UnwrapRules,
) -> FallbackOutcome {
    let mut errors = Vec::new();

    for (index, candidate) in plan.candidates().iter().enumerate() {
        debug!(attempt = index + 1, endpoint = %candidate.endpoint, "Trying candidate");
        match fetch_payload(client, candidate, rules).await {
            Ok(Payload::Empty) => {
                debug!(attempt = index + 1, endpoint = %candidate.endpoint, "Candidate returned no data");
            }
            Ok(payload) => {
                info!(
                    attempt = index + 1,
                    endpoint = %candidate.endpoint,
                    items = payload.len(),
                    "Candidate resolved"
                );
                return FallbackOutcome {
                    payload,
                    resolved_by: Some(index),
                    errors,
                };
            }
            Err(err) => {
                debug!(attempt = index + 1, endpoint = %candidate.endpoint, error = %err, "Candidate failed");
                errors.push(err);
            }
        }
    }

    FallbackOutcome {
        payload: Payload::Empty,
        resolved_by: None,
        errors,
    }
}
