//! A party's exposed management surface.

use crate::context::ContextContainer;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One management capability exposed by a registry. What a capability
/// computes is outside this crate; only its identity and advertised
/// properties matter here, for value comparison.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    name: String,
    properties: BTreeMap<String, String>,
}

impl Capability {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

/// The management surface a party exposes: its context container plus the set
/// of capabilities. Compared by value to decide whether a re-exposure is an
/// AVAILABLE, an UPDATED, or a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagementRegistry {
    context_container: ContextContainer,
    capabilities: BTreeSet<Capability>,
}

impl ManagementRegistry {
    pub fn new(context_container: ContextContainer) -> Self {
        Self {
            context_container,
            capabilities: BTreeSet::new(),
        }
    }

    pub fn add_capability(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    pub fn add_capabilities(&mut self, capabilities: impl IntoIterator<Item = Capability>) {
        self.capabilities.extend(capabilities);
    }

    pub fn context_container(&self) -> &ContextContainer {
        &self.context_container
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.iter()
    }
}
