//! Explicit client configuration.
//!
//! # Design
//! There is no process-wide client. Callers build a `ClientConfig` (usually
//! via `from_env`) and hand it to `CareersClient::new`, which makes it easy to
//! point a client at a mock server in tests.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "CAREERS_API_URL";

/// Environment variable holding the default per-request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "CAREERS_API_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3030";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

const DEFAULT_USER_AGENT: &str = concat!("careers-core/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {input:?}: {source}")]
    InvalidUrl {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} cannot be a base URL")]
    CannotBeBase(Url),

    #[error("invalid CAREERS_API_TIMEOUT_MS value {0:?}, expected milliseconds")]
    InvalidTimeout(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connection settings shared by every request a `CareersClient` makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// # Errors
    ///
    /// Fails if `base_url` does not parse or cannot be a base, since paths
    /// are joined onto it.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url).map_err(|source| ConfigError::InvalidUrl {
            input: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::CannotBeBase(base_url));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Read `CAREERS_API_URL` and `CAREERS_API_TIMEOUT_MS`, falling back to
    /// the local development defaults when unset.
    ///
    /// # Errors
    ///
    /// Fails if either variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup(BASE_URL_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base.trim())?;
        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.timeout = Duration::from_millis(millis);
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_env_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3030/");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn env_overrides_url_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://careers.example.com/backend"),
            (TIMEOUT_ENV, "2500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://careers.example.com/backend");
        assert_eq!(config.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        let config = ClientConfig::from_lookup(lookup(&[(BASE_URL_ENV, "  ")])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3030/");
    }

    #[test]
    fn rejects_bad_timeout() {
        let err = ClientConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(_)));
    }

    #[test]
    fn rejects_relative_url() {
        let err = ClientConfig::new("/api").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn rejects_cannot_be_base_url() {
        let err = ClientConfig::new("mailto:jobs@example.com").unwrap_err();
        assert!(matches!(err, ConfigError::CannotBeBase(_)));
    }

    #[test]
    fn builders_replace_fields() {
        let config = ClientConfig::new("http://127.0.0.1:9000")
            .unwrap()
            .with_timeout(Duration::from_millis(50))
            .with_user_agent("tests");
        assert_eq!(config.timeout, Duration::from_millis(50));
        assert_eq!(config.user_agent, "tests");
    }
}
