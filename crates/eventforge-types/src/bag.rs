//! The caller-supplied name -> value input of a synthesis call.

use std::collections::HashMap;

use crate::names::PropertyName;
use crate::value::Value;

/// A mapping from property name to value.
///
/// The bag is never retained by the engine. Extra keys that the target
/// interface does not declare are tolerated, so one bag can feed several
/// sibling event variants.
///
/// # Examples
///
/// ```
/// use eventforge_types::{PropertyBag, Value};
///
/// let bag = PropertyBag::new()
///     .with("targetWorld", "overworld")
///     .with("note", Value::Absent);
///
/// assert_eq!(bag.len(), 2);
/// assert_eq!(bag.get("targetWorld"), Some(&Value::from("overworld")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: HashMap<PropertyName, Value>,
}

impl PropertyBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry and return the bag, for chained construction.
    #[must_use]
    pub fn with(mut self, name: impl Into<PropertyName>, value: impl Into<Value>) -> Self {
        self.entries.insert(name.into(), value.into());
        self
    }

    /// Insert an entry, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<PropertyName>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(name.into(), value.into())
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Look up an entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Whether an entry exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Drop every entry so the bag can be refilled.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &Value)> {
        self.entries.iter()
    }
}

impl<N: Into<PropertyName>, V: Into<Value>> FromIterator<(N, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl<N: Into<PropertyName>, V: Into<Value>> Extend<(N, V)> for PropertyBag {
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.entries.insert(name.into(), value.into());
        }
    }
}
