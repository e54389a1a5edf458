//! Caller-supplied data attached to routes.
//!
//! A [`RouteInfo`] is an ordered bag of primitive values. The router only
//! looks at three fields:
//!
//! - `exact` - the route only reports `matches: true` when the input ends at it
//! - `fallback` - records for the route are ordered after all others
//! - `key` - the route's identifier; never copied into inherited layout info

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single field value inside [`RouteInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl InfoValue {
    /// Truthiness as used by the `exact` and `fallback` flags.
    pub fn is_truthy(&self) -> bool {
        match self {
            InfoValue::Null => false,
            InfoValue::Bool(b) => *b,
            InfoValue::Int(i) => *i != 0,
            InfoValue::Float(f) => *f != 0.0 && !f.is_nan(),
            InfoValue::Str(s) => !s.is_empty(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for InfoValue {
    fn from(value: bool) -> Self {
        InfoValue::Bool(value)
    }
}

impl From<i64> for InfoValue {
    fn from(value: i64) -> Self {
        InfoValue::Int(value)
    }
}

impl From<i32> for InfoValue {
    fn from(value: i32) -> Self {
        InfoValue::Int(i64::from(value))
    }
}

impl From<f64> for InfoValue {
    fn from(value: f64) -> Self {
        InfoValue::Float(value)
    }
}

impl From<&str> for InfoValue {
    fn from(value: &str) -> Self {
        InfoValue::Str(value.to_string())
    }
}

impl From<String> for InfoValue {
    fn from(value: String) -> Self {
        InfoValue::Str(value)
    }
}

impl<T: Into<InfoValue>> From<Option<T>> for InfoValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(InfoValue::Null, Into::into)
    }
}

/// Data attached to a route via [`Router::add`](crate::Router::add).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteInfo(BTreeMap<String, InfoValue>);

impl RouteInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// ```
    /// use nestroute::RouteInfo;
    ///
    /// let info = RouteInfo::new().with("component", "Home").with("exact", true);
    /// assert!(info.exact());
    /// ```
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<InfoValue>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<InfoValue>) {
        self.0.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&InfoValue> {
        self.0.get(field)
    }

    pub fn exact(&self) -> bool {
        self.flag("exact")
    }

    pub fn fallback(&self) -> bool {
        self.flag("fallback")
    }

    pub fn nested(&self) -> bool {
        self.flag("nested")
    }

    pub fn key(&self) -> Option<&str> {
        self.0.get("key").and_then(InfoValue::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InfoValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Later-declared fields win; fields absent from `other` are kept.
    pub(crate) fn merge(&mut self, other: RouteInfo) {
        self.0.extend(other.0);
    }

    /// Copy handed to a parent node as its layout info.
    ///
    /// The `key` is dropped unless the route is flagged `nested`.
    pub(crate) fn as_layout(&self) -> RouteInfo {
        let mut copy = self.clone();
        if !self.nested() {
            copy.0.remove("key");
        }
        copy
    }

    fn flag(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(InfoValue::is_truthy)
    }
}

impl<K: Into<String>, V: Into<InfoValue>> FromIterator<(K, V)> for RouteInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        RouteInfo(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
