//! Compositional addresses
//!
//! A `Context` is the address of a topology node (or the routing filter of a
//! management call): an immutable, insertion-ordered set of unique string
//! key/value pairs. Contexts combine by union and match by subset containment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable ordered set of key/value address attributes.
///
/// Combining never mutates: `with` and `with_all` return a new context.
/// Equality is by content (order-insensitive), never by identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Context {
    entries: Vec<(String, String)>,
}

impl Context {
    /// The empty context.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a new context with `key` set to `value`.
    ///
    /// A key already present keeps its original position; its value is
    /// replaced.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Returns the union of `self` and `other`; `other` wins on key collision.
    pub fn with_all(&self, other: &Context) -> Context {
        let mut merged = self.clone();
        for (key, value) in &other.entries {
            merged = merged.with(key.clone(), value.clone());
        }
        merged
    }

    /// Subset containment: true when every pair of `other` is present in
    /// `self` with an equal value.
    pub fn contains(&self, other: &Context) -> bool {
        other
            .entries
            .iter()
            .all(|(key, value)| self.get(key) == Some(value.as_str()))
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.contains(other)
    }
}

impl Eq for Context {}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        write!(f, "}}")
    }
}

/// Root of a party's exposed context tree: the top-level name under which a
/// management registry scopes its capabilities, with optional nested scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextContainer {
    pub kind: String,
    pub value: String,
    pub sub_containers: Vec<ContextContainer>,
}

impl ContextContainer {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            sub_containers: Vec::new(),
        }
    }

    pub fn with_sub_container(mut self, sub: ContextContainer) -> Self {
        self.sub_containers.push(sub);
        self
    }
}
