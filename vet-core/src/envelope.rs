//! Locating the payload inside the backend's inconsistent response shapes.
//!
//! The backend wraps data as `{header: {result, statusCode, message}, body}`,
//! as `{data}`, or not at all (a bare array), and signals "no results" with
//! the integer `0`. [`unwrap_with`] is the only place these shapes are
//! interpreted; everything downstream sees a [`ResponseEnvelope`].

use serde_json::{Map, Value};

pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// What a successful response carried
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    List(Vec<Value>),
    Single(Value),
}

impl Payload {
    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// Raw items in order; a single object becomes a one-item list
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Payload::Empty => Vec::new(),
            Payload::List(items) => items,
            Payload::Single(item) => vec![item],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Payload::Empty => 0,
            Payload::List(items) => items.len(),
            Payload::Single(_) => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    Success(Payload),
    Failure {
        message: String,
        status_code: Option<u16>,
    },
}

impl ResponseEnvelope {
    pub fn is_failure(&self) -> bool {
        matches!(self, ResponseEnvelope::Failure { .. })
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ResponseEnvelope::Success(payload) => Some(payload),
            ResponseEnvelope::Failure { .. } => None,
        }
    }
}

/// Per-endpoint adjustments to the unwrapping rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwrapRules {
    /// Keys searched one level inside an object payload for the actual list
    pub nested_list_keys: &'static [&'static str],
    /// Treat an explicit `header.statusCode` other than 200 as failure
    pub require_ok_status: bool,
    /// Use the whole response as the payload when it has no `body`/`data`
    pub bare_object: bool,
    /// Message used when a failing header carries none
    pub failure_message: &'static str,
}

impl Default for UnwrapRules {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl UnwrapRules {
    pub const DEFAULT: UnwrapRules = UnwrapRules {
        nested_list_keys: &[],
        require_ok_status: false,
        bare_object: false,
        failure_message: DEFAULT_FAILURE_MESSAGE,
    };

    pub const fn nested(mut self, keys: &'static [&'static str]) -> Self {
        self.nested_list_keys = keys;
        self
    }

    pub const fn strict_status(mut self) -> Self {
        self.require_ok_status = true;
        self
    }

    pub const fn bare_object(mut self) -> Self {
        self.bare_object = true;
        self
    }

    pub const fn failure_message(mut self, message: &'static str) -> Self {
        self.failure_message = message;
        self
    }
}

/// Unwrap with the default rules
pub fn unwrap(raw: &Value) -> ResponseEnvelope {
    unwrap_with(raw, &UnwrapRules::DEFAULT)
}

pub fn unwrap_with(raw: &Value, rules: &UnwrapRules) -> ResponseEnvelope {
    if let Some(header) = raw.get("header").and_then(Value::as_object) {
        if let Some(failure) = header_failure(header, rules) {
            return failure;
        }
    }

    let payload = match extract(raw, rules) {
        Some(value) => classify(value, rules),
        None => Payload::Empty,
    };
    ResponseEnvelope::Success(payload)
}

fn header_failure(header: &Map<String, Value>, rules: &UnwrapRules) -> Option<ResponseEnvelope> {
    let status_code = header
        .get("statusCode")
        .and_then(as_status_code);

    let explicit_false = header.get("result").is_some_and(is_explicit_false);
    let bad_status = rules.require_ok_status && matches!(status_code, Some(code) if code != 200);

    if !explicit_false && !bad_status {
        return None;
    }

    let message = header
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(rules.failure_message)
        .to_string();

    Some(ResponseEnvelope::Failure {
        message,
        status_code,
    })
}

fn is_explicit_false(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().eq_ignore_ascii_case("false"),
        _ => false,
    }
}

fn as_status_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn extract<'a>(raw: &'a Value, rules: &UnwrapRules) -> Option<&'a Value> {
    match raw {
        Value::Object(map) => {
            if let Some(body) = map.get("body") {
                Some(body)
            } else if let Some(data) = map.get("data") {
                Some(data)
            } else if rules.bare_object && !map.contains_key("header") {
                Some(raw)
            } else {
                None
            }
        }
        Value::Array(_) => Some(raw),
        _ => None,
    }
}

fn classify(value: &Value, rules: &UnwrapRules) -> Payload {
    match value {
        Value::Array(items) if items.is_empty() => Payload::Empty,
        Value::Array(items) => Payload::List(items.clone()),
        Value::Object(map) => {
            let nested = rules
                .nested_list_keys
                .iter()
                .find_map(|key| map.get(*key).filter(|v| v.is_array()));
            match nested {
                Some(Value::Array(items)) if items.is_empty() => Payload::Empty,
                Some(Value::Array(items)) => Payload::List(items.clone()),
                _ if map.is_empty() => Payload::Empty,
                _ => Payload::Single(value.clone()),
            }
        }
        // Sentinel zero, null, false, strings: nothing to show
        _ => Payload::Empty,
    }
}
