//! URL construction and query-parameter encoding.
//!
//! Parameters keep insertion order. A list value becomes one `key=value`
//! pair per element and a null value is dropped entirely, never sent as an
//! empty string or `"null"`.

use url::Url;

use crate::error::ApiError;

/// A single query-parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<QueryValue>),
}

impl QueryValue {
    fn append_to(&self, key: &str, pairs: &mut Vec<(String, String)>) {
        match self {
            Self::Null => {}
            Self::Str(s) => pairs.push((key.to_string(), s.clone())),
            Self::Int(n) => pairs.push((key.to_string(), n.to_string())),
            Self::Float(n) => pairs.push((key.to_string(), n.to_string())),
            Self::Bool(b) => pairs.push((key.to_string(), b.to_string())),
            Self::List(items) => items.iter().for_each(|item| item.append_to(key, pairs)),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

macro_rules! int_query_value {
    ($($t:ty),*) => {
        $(impl From<$t> for QueryValue {
            fn from(value: $t) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

int_query_value!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(Vec<(String, QueryValue)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. `None` and `QueryValue::Null` are kept here but
    /// never reach the URL.
    pub fn push(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flatten into the `key=value` pairs that will be written to the URL.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            value.append_to(key, &mut pairs);
        }
        pairs
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Resolve `path` against `base` and append `params`.
///
/// The base is treated as a directory, so `http://host/backend` joined with
/// `/api/v1/jobs` yields `http://host/backend/api/v1/jobs`.
///
/// # Errors
///
/// Fails with a transport error if the joined URL does not parse.
pub fn build_url(base: &Url, path: &str, params: &QueryParams) -> Result<Url, ApiError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    let mut url = base
        .join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::Transport(format!("invalid request URL for {path:?}: {e}")))?;

    let pairs = params.pairs();
    if !pairs.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in &pairs {
            query.append_pair(key, value);
        }
    }
    Ok(url)
}
