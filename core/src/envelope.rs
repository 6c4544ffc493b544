//! Response body decoding and envelope unwrapping.
//!
//! # Design
//! The backend may wrap a payload as `{ data, statusCode, timestamp, path }`
//! or return it bare. `Payload::classify` makes that distinction explicit and
//! `unwrap` is the pure function the request path uses, so both shapes are
//! testable without a network.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// A parsed response body: JSON when the server declared it, text otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Decode according to the declared content type.
    ///
    /// # Errors
    ///
    /// A body declared as JSON that fails to parse is a transport fault.
    pub fn from_response(response: &HttpResponse) -> Result<Self, ApiError> {
        let is_json = response
            .header("content-type")
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
        if is_json {
            serde_json::from_str(&response.body)
                .map(Self::Json)
                .map_err(|e| ApiError::Transport(format!("invalid JSON response body: {e}")))
        } else {
            Ok(Self::Text(response.body.clone()))
        }
    }

    /// Convert into a JSON value. Empty text becomes `null`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) if text.is_empty() => Value::Null,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// The success envelope some backend services wrap responses in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// A successful body, either enveloped or raw.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload<T> {
    Envelope(Envelope<T>),
    Raw(T),
}

impl Payload<Value> {
    /// Any JSON object with a `data` key counts as an envelope; the metadata
    /// fields are picked up when present and well-typed.
    pub fn classify(body: Value) -> Self {
        match body {
            Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                Self::Envelope(Envelope {
                    data,
                    status_code: map
                        .get("statusCode")
                        .and_then(Value::as_u64)
                        .and_then(|n| u16::try_from(n).ok()),
                    timestamp: map.get("timestamp").and_then(Value::as_str).map(str::to_string),
                    path: map.get("path").and_then(Value::as_str).map(str::to_string),
                })
            }
            other => Self::Raw(other),
        }
    }
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Envelope(envelope) => envelope.data,
            Self::Raw(value) => value,
        }
    }
}

/// Strip the envelope from a successful body, if there is one.
pub fn unwrap(body: Value) -> Value {
    Payload::classify(body).into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(content_type: Option<&str>, body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: content_type
                .map(|ct| vec![("content-type".to_string(), ct.to_string())])
                .unwrap_or_default(),
            body: body.to_string(),
        }
    }

    #[test]
    fn unwraps_full_envelope() {
        let body = json!({
            "data": {"jobPostingId": 1},
            "statusCode": 200,
            "timestamp": "2024-01-01T00:00:00Z",
            "path": "/api/v1/recruitment-service/job-postings/1"
        });
        assert_eq!(unwrap(body), json!({"jobPostingId": 1}));
    }

    #[test]
    fn classify_keeps_envelope_metadata() {
        let payload = Payload::classify(json!({"data": [], "statusCode": 200, "path": "/x"}));
        match payload {
            Payload::Envelope(env) => {
                assert_eq!(env.status_code, Some(200));
                assert_eq!(env.path.as_deref(), Some("/x"));
                assert!(env.timestamp.is_none());
            }
            Payload::Raw(_) => panic!("expected envelope"),
        }
    }

    #[test]
    fn bare_object_passes_through() {
        let body = json!({"jobPostingId": 1, "title": "Engineer"});
        assert_eq!(unwrap(body.clone()), body);
    }

    #[test]
    fn null_data_is_still_unwrapped() {
        assert_eq!(unwrap(json!({"data": null})), Value::Null);
    }

    #[test]
    fn arrays_and_scalars_pass_through() {
        assert_eq!(unwrap(json!([{"data": 1}])), json!([{"data": 1}]));
        assert_eq!(unwrap(json!("ok")), json!("ok"));
    }

    #[test]
    fn json_content_type_with_charset_is_parsed() {
        let body = ResponseBody::from_response(&response(
            Some("application/json; charset=utf-8"),
            r#"{"a":1}"#,
        ))
        .unwrap();
        assert_eq!(body, ResponseBody::Json(json!({"a": 1})));
    }

    #[test]
    fn other_content_types_are_text() {
        let body = ResponseBody::from_response(&response(Some("text/html"), "<p>hi</p>")).unwrap();
        assert_eq!(body, ResponseBody::Text("<p>hi</p>".to_string()));
        let body = ResponseBody::from_response(&response(None, r#"{"a":1}"#)).unwrap();
        assert!(matches!(body, ResponseBody::Text(_)));
    }

    #[test]
    fn malformed_json_is_a_transport_fault() {
        let err = ResponseBody::from_response(&response(Some("application/json"), "{oops")).unwrap_err();
        assert_eq!(err.status(), 0);
    }

    #[test]
    fn empty_text_becomes_null() {
        assert_eq!(ResponseBody::Text(String::new()).into_value(), Value::Null);
        assert_eq!(ResponseBody::Text("x".into()).into_value(), json!("x"));
    }
}
