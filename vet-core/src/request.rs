use serde::Serialize;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether a form body is sent with this method
    pub fn carries_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered key-value pairs sent as a form body or query string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field; later duplicates are sent as repeated keys
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    /// Append a field only when the value is present and not blank
    pub fn with_opt(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value.map(Into::into) {
            Some(Value::String(s)) if s.is_empty() => self,
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Flatten a serializable struct into top-level fields
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self(map.into_iter().collect())),
            Value::Null => Ok(Self::default()),
            other => Ok(Self(vec![("value".to_string(), other)])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// URL-encode as `k=v&...`.
    ///
    /// Nulls are skipped, strings are sent raw, other scalars use their JSON
    /// text and arrays/objects are JSON-stringified into a single field.
    pub fn encode(&self) -> Result<String, serde_urlencoded::ser::Error> {
        let pairs: Vec<(&str, String)> = self
            .0
            .iter()
            .filter_map(|(key, value)| form_value(value).map(|v| (key.as_str(), v)))
            .collect();
        serde_urlencoded::to_string(pairs)
    }
}

fn form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested => Some(nested.to_string()),
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Percent-encode `raw` so it stays a single path segment.
pub fn path_segment(raw: &str) -> String {
    // form encoding turns spaces into '+' and a literal '+' into "%2B"
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// One API call as described by the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestEnvelope {
    pub method: Method,
    pub endpoint: String,
    pub body: Option<Fields>,
    pub params: Option<Fields>,
}

impl RequestEnvelope {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            params: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn body(mut self, fields: Fields) -> Self {
        self.body = Some(fields);
        self
    }

    pub fn params(mut self, fields: Fields) -> Self {
        self.params = Some(fields);
        self
    }

    /// Add a single body field, creating the body if needed
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.get_or_insert_with(Fields::new).push(key, value);
        self
    }

    /// `?a=1&b=2`, or an empty string when there are no parameters
    pub fn query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        match &self.params {
            Some(params) => {
                let encoded = params.encode()?;
                if encoded.is_empty() {
                    Ok(String::new())
                } else {
                    Ok(format!("?{}", encoded))
                }
            }
            None => Ok(String::new()),
        }
    }

    /// Encoded form body, only for methods that carry one
    pub fn form_body(&self) -> Result<Option<String>, serde_urlencoded::ser::Error> {
        match (&self.body, self.method.carries_body()) {
            (Some(fields), true) => fields.encode().map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_segment_escapes_separators() {
        assert_eq!(path_segment("12"), "12");
        assert_eq!(path_segment("a/b c?d"), "a%2Fb%20c%3Fd");
        assert_eq!(path_segment("1+1"), "1%2B1");
    }

    #[test]
    fn test_form_encoding_rules() {
        let fields = Fields::new()
            .with("type", 1)
            .with("lang", "en")
            .with("skip", Value::Null)
            .with("active", true)
            .with("seats", json!(["A1", "A2"]))
            .with("note", "a b&c");

        assert_eq!(
            fields.encode().unwrap(),
            "type=1&lang=en&active=true&seats=%5B%22A1%22%2C%22A2%22%5D&note=a+b%26c"
        );
    }

    #[test]
    fn test_with_opt_skips_blank() {
        let fields = Fields::new()
            .with_opt("date", Some("2026-03-01"))
            .with_opt("empty", Some(""))
            .with_opt("none", None::<String>);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("date"), Some(&json!("2026-03-01")));
    }

    #[test]
    fn test_query_string() {
        let request = RequestEnvelope::get("/destination/list")
            .params(Fields::new().with("q", "Siem Reap").with("page", 2));
        assert_eq!(request.query_string().unwrap(), "?q=Siem+Reap&page=2");
        assert_eq!(RequestEnvelope::get("/x").query_string().unwrap(), "");
    }

    #[test]
    fn test_body_only_for_writes() {
        let post = RequestEnvelope::post("/seat/layout").field("journey", "42");
        assert_eq!(post.form_body().unwrap().as_deref(), Some("journey=42"));

        let mut get = RequestEnvelope::get("/seat/layout").field("journey", "42");
        assert_eq!(get.form_body().unwrap(), None);
        get.method = Method::Delete;
        assert_eq!(get.form_body().unwrap(), None);
    }

    #[test]
    fn test_fields_from_struct() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            seat_num: Vec<String>,
            total_amount: f64,
        }

        let fields = Fields::from_serialize(&Payload {
            seat_num: vec!["A1".into()],
            total_amount: 25.5,
        })
        .unwrap();
        assert_eq!(fields.get("seatNum"), Some(&json!(["A1"])));
        assert_eq!(fields.get("totalAmount"), Some(&json!(25.5)));
    }
}
