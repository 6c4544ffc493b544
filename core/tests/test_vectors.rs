//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file describes inputs and expected results. Comparing parsed
//! JSON (not raw strings) avoids false negatives from field ordering.

use careers_core::query::build_url;
use careers_core::{
    parse_response, Body, CareersClient, ClientConfig, ErrorClass, HttpMethod, HttpResponse,
    QueryParams, QueryValue, RequestBody, RequestOptions,
};
use serde_json::Value;
use url::Url;

const BASE_URL: &str = "http://localhost:3030";

fn client() -> CareersClient {
    CareersClient::new(ClientConfig::new(BASE_URL).unwrap()).unwrap()
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn query_value(value: &Value) -> QueryValue {
    match value {
        Value::Null => QueryValue::Null,
        Value::Bool(b) => QueryValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => QueryValue::Int(i),
            None => QueryValue::Float(n.as_f64().unwrap()),
        },
        Value::String(s) => QueryValue::Str(s.clone()),
        Value::Array(items) => QueryValue::List(items.iter().map(query_value).collect()),
        Value::Object(_) => panic!("objects are not query values"),
    }
}

fn string_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn response(case: &Value, status: u16) -> HttpResponse {
    HttpResponse {
        status,
        headers: case["contentType"]
            .as_str()
            .map(|ct| vec![("content-type".to_string(), ct.to_string())])
            .unwrap_or_default(),
        body: case["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// URLs
// ---------------------------------------------------------------------------

#[test]
fn url_test_vectors() {
    for case in load(include_str!("../../test-vectors/urls.json")) {
        let name = case["name"].as_str().unwrap();
        let base = Url::parse(case["base"].as_str().unwrap()).unwrap();
        let params: QueryParams = case["params"]
            .as_array()
            .unwrap()
            .iter()
            .map(|pair| (pair[0].as_str().unwrap().to_string(), query_value(&pair[1])))
            .collect();

        let url = build_url(&base, case["path"].as_str().unwrap(), &params).unwrap();
        assert_eq!(url.as_str(), case["expected"].as_str().unwrap(), "{name}");
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/requests.json")) {
        let name = case["name"].as_str().unwrap();
        let method = parse_method(case["method"].as_str().unwrap());
        let options = string_pairs(&case["headers"])
            .into_iter()
            .fold(RequestOptions::new(), |options, (k, v)| options.header(k, v))
            .body(Body::Json(case["body"].clone()));

        let req = c
            .build_request(method, case["path"].as_str().unwrap(), options)
            .unwrap();
        let expected = &case["expected"];

        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url.as_str(), expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, string_pairs(&expected["headers"]), "{name}: headers");
        match (&req.body, &expected["body"]) {
            (None, Value::Null) => {}
            (Some(RequestBody::Json(body)), expected_body) => {
                let body: Value = serde_json::from_str(body).unwrap();
                assert_eq!(&body, expected_body, "{name}: body");
            }
            (other, expected_body) => {
                panic!("{name}: body {other:?} does not match {expected_body}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

fn parse_class(s: &str) -> ErrorClass {
    match s {
        "Validation" => ErrorClass::Validation,
        "Auth" => ErrorClass::Auth,
        "NotFound" => ErrorClass::NotFound,
        "Server" => ErrorClass::Server,
        "OtherHttp" => ErrorClass::OtherHttp,
        "Timeout" => ErrorClass::Timeout,
        "Network" => ErrorClass::Network,
        other => panic!("unknown error class: {other}"),
    }
}

#[test]
fn error_test_vectors() {
    for case in load(include_str!("../../test-vectors/errors.json")) {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let expected = &case["expected"];

        let err = parse_response(&response(&case, status)).unwrap_err();
        assert_eq!(u64::from(err.status()), expected["status"].as_u64().unwrap(), "{name}: status");
        assert_eq!(err.class(), parse_class(expected["class"].as_str().unwrap()), "{name}: class");
        if let Some(message) = expected["message"].as_str() {
            assert_eq!(err.message(), message, "{name}: message");
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[test]
fn envelope_test_vectors() {
    for case in load(include_str!("../../test-vectors/envelopes.json")) {
        let name = case["name"].as_str().unwrap();
        let value = parse_response(&response(&case, 200)).unwrap();
        assert_eq!(value, case["expected"], "{name}");
    }
}
