use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Maximum number of parameters stored inline before spilling to the heap.
/// Nested view routes rarely carry more than a handful of captures.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Inline parameter storage.
///
/// Names are `Arc<str>` shared with the compiled matcher that produced them;
/// values are `None` when an optional group did not participate in the match.
pub type ParamVec = SmallVec<[(Arc<str>, Option<String>); MAX_INLINE_PARAMS]>;

/// Ordered parameter mapping accumulated while resolving a path.
///
/// Inserting a name that is already present replaces its value in place, so a
/// deeper segment reusing a parameter name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(ParamVec);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Arc<str>, value: Option<String>) {
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn merge(&mut self, other: Params) {
        for (name, value) in other.0 {
            self.insert(name, value);
        }
    }

    /// Value of a parameter that captured something.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.get_raw(name).flatten()
    }

    /// Distinguishes a missing parameter (`None`) from one whose optional
    /// group did not match (`Some(None)`).
    #[must_use]
    pub fn get_raw(&self, name: &str) -> Option<Option<&str>> {
        self.0
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_deref()))
    }

    /// Allocating view for callers that want a plain map.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        self.0
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name.as_ref(), value)?;
        }
        map.end()
    }
}
