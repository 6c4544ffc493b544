//! Error types for the careers API client.
//!
//! # Design
//! Every failure reaches the caller as one `ApiError` carrying an
//! HTTP-status-like code: the real status for HTTP errors, 408 for timeouts
//! and 0 for any other transport fault. Callers branch on `class()` to pick
//! user-facing copy. Error-message extraction lives in `ErrorBody` so its
//! precedence rules can be tested on their own.

use serde_json::Value;
use thiserror::Error;

use crate::envelope::ResponseBody;

pub const TIMEOUT_STATUS: u16 = 408;
pub const TRANSPORT_STATUS: u16 = 0;

const TIMEOUT_MESSAGE: &str = "Request timeout";
const UNKNOWN_MESSAGE: &str = "Unknown error occurred";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server answered with a status of 400 or above.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        data: Option<ResponseBody>,
    },

    /// No response arrived within the request's timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection, DNS, decoding or any other fault before a usable response.
    #[error("{0}")]
    Transport(String),
}

/// Coarse grouping callers use to choose user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Auth,
    NotFound,
    Server,
    OtherHttp,
    Timeout,
    Network,
}

impl ApiError {
    pub fn http(status: u16, body: ResponseBody) -> Self {
        let parsed = ErrorBody::parse(status, &body);
        Self::Http {
            status,
            message: parsed.message,
            data: Some(parsed.raw),
        }
    }

    /// Build a transport fault from any error, falling back to a generic
    /// message when the source has none.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        let message = err.to_string();
        if message.trim().is_empty() {
            Self::Transport(UNKNOWN_MESSAGE.to_string())
        } else {
            Self::Transport(message)
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } => *status,
            Self::Timeout => TIMEOUT_STATUS,
            Self::Transport(_) => TRANSPORT_STATUS,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Http { message, .. } => message,
            Self::Timeout => TIMEOUT_MESSAGE,
            Self::Transport(message) => message,
        }
    }

    /// The raw parsed error body, when the server sent one.
    pub fn data(&self) -> Option<&ResponseBody> {
        match self {
            Self::Http { data, .. } => data.as_ref(),
            Self::Timeout | Self::Transport(_) => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Timeout => ErrorClass::Timeout,
            Self::Transport(_) => ErrorClass::Network,
            Self::Http { status, .. } => match *status {
                400 | 422 => ErrorClass::Validation,
                401 | 403 => ErrorClass::Auth,
                404 => ErrorClass::NotFound,
                s if s >= 500 => ErrorClass::Server,
                _ => ErrorClass::OtherHttp,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.class() == ErrorClass::NotFound
    }

    /// Timeouts and network faults can be retried by the caller as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(self.class(), ErrorClass::Timeout | ErrorClass::Network)
    }

    /// Compatibility shim for the candidate service, which reports a reused
    /// email only as free text: a 400 whose message mentions "email" or
    /// "duplicate". Any change to the backend wording breaks this match.
    pub fn is_duplicate_email(&self) -> bool {
        if self.status() != 400 {
            return false;
        }
        let message = self.message().to_lowercase();
        message.contains("email") || message.contains("duplicate")
    }
}

/// The message and raw payload extracted from an error response.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub raw: ResponseBody,
}

impl ErrorBody {
    /// `message` wins over `error`. Either may be a string or a list of
    /// strings (joined with ", "); empty or non-string values are skipped.
    /// Without either, the message is `"HTTP <status>"`.
    pub fn parse(status: u16, body: &ResponseBody) -> Self {
        let message = match body {
            ResponseBody::Json(Value::Object(map)) => ["message", "error"]
                .iter()
                .find_map(|key| map.get(*key).and_then(message_text)),
            _ => None,
        };
        Self {
            message: message.unwrap_or_else(|| format!("HTTP {status}")),
            raw: body.clone(),
        }
    }
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}
