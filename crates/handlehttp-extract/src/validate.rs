//! Validation contract.
//!
//! Input types implement [`Validator`] and report what is wrong with them as a
//! [`Problems`] set. An empty set means the value is valid.

use crate::RequestContext;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Field-to-description mapping produced by validation.
///
/// Problems keep the order in which they were added, so the combined message
/// is stable for a given validator.
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::Problems;
///
/// let mut problems = Problems::new();
/// problems.add("name", "must not be empty");
/// problems.add("age", "must be positive");
///
/// assert_eq!(problems.len(), 2);
/// assert_eq!(problems.to_string(), "name: must not be empty\nage: must be positive\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Problems(IndexMap<String, String>);

impl Problems {
    /// Creates an empty problem set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a problem for `field`. A later problem for the same field
    /// replaces the earlier description.
    pub fn add(&mut self, field: impl Into<String>, description: impl Into<String>) -> &mut Self {
        self.0.insert(field.into(), description.into());
        self
    }

    /// Records a problem only when `condition` holds.
    pub fn check(
        &mut self,
        condition: bool,
        field: impl Into<String>,
        description: impl Into<String>,
    ) -> &mut Self {
        if condition {
            self.add(field, description);
        }
        self
    }

    /// Returns the description for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns `true` if no problems were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(field, description)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One `field: description` line per problem.
impl fmt::Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, description) in &self.0 {
            writeln!(f, "{field}: {description}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Problems {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Problems {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A value that can check itself.
///
/// Called once per request, after the body and query parameters have been
/// merged, and before the business function runs.
///
/// # Example
///
/// ```rust
/// use handlehttp_extract::{Problems, RequestContext, Validator};
///
/// struct Greeting {
///     message: String,
/// }
///
/// impl Validator for Greeting {
///     fn valid(&self, _ctx: &RequestContext) -> Problems {
///         let mut problems = Problems::new();
///         problems.check(self.message.is_empty(), "message", "must not be empty");
///         problems
///     }
/// }
///
/// let ctx = RequestContext::default();
/// assert!(Greeting { message: "hi".into() }.valid(&ctx).is_empty());
/// assert_eq!(Greeting { message: String::new() }.valid(&ctx).len(), 1);
/// ```
pub trait Validator {
    /// Returns every problem with this value; empty means valid.
    fn valid(&self, ctx: &RequestContext) -> Problems;
}
