//! Async HTTP client for the careers backend.
//!
//! # Design
//! `CareersClient` holds an explicit `ClientConfig` and a pooled
//! `reqwest::Client`, and carries no other state between calls. Every call
//! goes through `request`, which is split into three steps:
//!
//! - `build_request` turns a method, path and `RequestOptions` into an
//!   `HttpRequest` (pure).
//! - `execute` performs the single network round trip under a timeout.
//! - `parse_response` classifies errors and unwraps the envelope (pure).
//!
//! The client never retries and never caches.

use std::time::{Duration, Instant};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::envelope::{self, ResponseBody};
use crate::error::ApiError;
use crate::http::{FilePayload, HttpMethod, HttpRequest, HttpResponse, MultipartForm, RequestBody};
use crate::query::{build_url, QueryParams};

/// A request body before serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Multipart(MultipartForm),
}

/// Per-call options. Anything left unset uses the client's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub params: QueryParams,
    pub body: Option<Body>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for the recruitment and company services.
///
/// Cheap to clone: clones share one connection pool and cookie store. Holds
/// no other state, so concurrent calls are independent.
#[derive(Debug, Clone)]
pub struct CareersClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl CareersClient {
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }

    /// Build a client from `CAREERS_API_URL` / `CAREERS_API_TIMEOUT_MS`.
    ///
    /// # Errors
    ///
    /// Fails on invalid environment values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Describe the request `request` would send, without sending it.
    ///
    /// JSON is the default content type and caller headers override it by
    /// name. GET requests never carry a body, and a multipart body drops the
    /// content type so the transport can add its boundary.
    ///
    /// # Errors
    ///
    /// Fails if the URL cannot be built or the body cannot be serialized.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let url = build_url(&self.config.base_url, path, &options.params)?;

        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        for (name, value) in options.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
                Some(existing) => existing.1 = value,
                None => headers.push((name, value)),
            }
        }

        let body = match options.body {
            _ if method == HttpMethod::Get => None,
            None | Some(Body::Json(Value::Null)) => None,
            Some(Body::Json(value)) => Some(RequestBody::Json(
                serde_json::to_string(&value).map_err(ApiError::transport)?,
            )),
            Some(Body::Multipart(form)) => Some(RequestBody::Multipart(form)),
        };
        if matches!(body, Some(RequestBody::Multipart(_))) {
            headers.retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Perform one round trip. The whole exchange, body included, must
    /// finish within `timeout`; when it does not, the in-flight request is
    /// dropped and the call fails with `ApiError::Timeout`.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` or `Transport`; HTTP error statuses are returned as
    /// ordinary responses.
    pub async fn execute(
        &self,
        request: HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, ApiError> {
        match tokio::time::timeout(timeout, self.send(request)).await {
            Ok(result) => result,
            Err(_) => Err(ApiError::Timeout),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = self.http.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Json(json)) => builder.body(json),
            Some(RequestBody::Multipart(form)) => {
                builder.multipart(form.into_reqwest().map_err(from_reqwest)?)
            }
            None => builder,
        };

        let response = builder.send().await.map_err(from_reqwest)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await.map_err(from_reqwest)?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Issue a request and decode the unwrapped payload as `T`.
    ///
    /// # Errors
    ///
    /// See `ApiError` for the failure taxonomy. A payload that does not
    /// match `T` is reported as a transport fault.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let request = self.build_request(method, path, options)?;
        let url = request.url.clone();
        let path = url.path().to_string();

        debug!(%method, %url, "sending request");
        let started = Instant::now();
        let response = match self.execute(request, timeout).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, %path, status = err.status(), error = %err, "request failed");
                return Err(err);
            }
        };
        debug!(
            %method,
            %url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        let value = parse_response(&response)?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::Transport(format!("unexpected response from {path}: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, options).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let options = options.body(json_body(body)?);
        self.request(HttpMethod::Post, path, options).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let options = options.body(json_body(body)?);
        self.request(HttpMethod::Put, path, options).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let options = options.body(json_body(body)?);
        self.request(HttpMethod::Patch, path, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Delete, path, options).await
    }

    /// POST `file` as a multipart `file` part, with every extra field
    /// stringified alongside it.
    pub async fn upload<T, I, K, V>(
        &self,
        path: &str,
        file: FilePayload,
        fields: I,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let form = fields
            .into_iter()
            .fold(MultipartForm::new(file), |form, (name, value)| form.field(name, value));
        let options = RequestOptions::new().body(Body::Multipart(form));
        self.request(HttpMethod::Post, path, options).await
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Body, ApiError> {
    serde_json::to_value(body)
        .map(Body::Json)
        .map_err(ApiError::transport)
}

fn from_reqwest(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::transport(err.without_url())
    }
}

/// Interpret a raw response: non-2xx becomes `ApiError::Http`, success is
/// decoded and stripped of its envelope.
///
/// # Errors
///
/// `Http` for error statuses, `Transport` for an undecodable JSON body.
pub fn parse_response(response: &HttpResponse) -> Result<Value, ApiError> {
    let body = ResponseBody::from_response(response)?;
    if !response.is_success() {
        return Err(ApiError::http(response.status, body));
    }
    Ok(envelope::unwrap(body.into_value()))
}
