//! Query string parameters.
//!
//! [`QueryParams`] is what an input's [`DecodeParams`](crate::DecodeParams)
//! implementation sees: the decoded `key=value` pairs of the request URI, in
//! the order they appeared.

use crate::{DecodeError, DecodeSource};
use http::Uri;
use serde::de::DeserializeOwned;
use std::fmt::Display;
use std::str::FromStr;

/// Decoded query string parameters.
///
/// Repeated keys are kept; [`get`](Self::get) returns the first value, like
/// most query APIs, and [`get_all`](Self::get_all) returns every value.
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::QueryParams;
///
/// let params = QueryParams::from_query_str("id=42&tag=a&tag=b").unwrap();
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.parse::<u32>("id").unwrap(), 42);
/// assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    raw: String,
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (without the leading `?`).
    pub fn from_query_str(query: &str) -> Result<Self, DecodeError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| DecodeError::deserialization_failed(DecodeSource::Query, e))?;

        Ok(Self {
            raw: query.to_string(),
            pairs,
        })
    }

    /// Parses the query component of a URI. A URI without one yields an empty set.
    pub fn from_uri(uri: &Uri) -> Result<Self, DecodeError> {
        Self::from_query_str(uri.query().unwrap_or(""))
    }

    /// Appends a parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        if !self.raw.is_empty() {
            self.raw.push('&');
        }
        // Keep the raw form in sync for `deserialize`
        let pair = [(name.as_str(), value.as_str())];
        if let Ok(encoded) = serde_urlencoded::to_string(&pair[..]) {
            self.raw.push_str(&encoded);
        }
        self.pairs.push((name, value));
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `name`, in request order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `name` appears at least once.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == name)
    }

    /// Parses the first value for `name` into `T`.
    ///
    /// A missing parameter is an error; use
    /// [`parse_optional`](Self::parse_optional) when absence is allowed.
    pub fn parse<T>(&self, name: &str) -> Result<T, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self
            .get(name)
            .ok_or_else(|| DecodeError::missing(DecodeSource::Query, name))?;

        raw.parse()
            .map_err(|e| DecodeError::invalid_type(DecodeSource::Query, name, e))
    }

    /// Parses the first value for `name` into `T`, or `None` if absent.
    pub fn parse_optional<T>(&self, name: &str) -> Result<Option<T>, DecodeError>
    where
        T: FromStr,
        T::Err: Display,
    {
        if self.contains(name) {
            self.parse(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Deserializes the whole parameter set into a serde struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        serde_urlencoded::from_str(&self.raw)
            .map_err(|e| DecodeError::deserialization_failed(DecodeSource::Query, e))
    }

    /// Returns the raw query string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of parameters, counting repeats.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over all `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
