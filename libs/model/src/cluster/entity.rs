//! A server-hosted entity instance.

use super::registry::ManagementRegistry;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a hosted entity: name plus type, stable across failover.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerEntityIdentifier {
    name: String,
    type_name: String,
}

impl ServerEntityIdentifier {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> String {
        format!("{}:{}", self.name, self.type_name)
    }
}

impl fmt::Display for ServerEntityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.type_name)
    }
}

/// A hosted entity. Created on `serverEntityCreated`, removed on
/// `serverEntityDestroyed`. The consumer id is the numeric identity the
/// platform hands to the hosting server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEntity {
    identifier: ServerEntityIdentifier,
    consumer_id: u64,
    context: Context,
    registry: Option<ManagementRegistry>,
}

impl ServerEntity {
    pub fn new(identifier: ServerEntityIdentifier, consumer_id: u64) -> Self {
        Self {
            identifier,
            consumer_id,
            context: Context::empty(),
            registry: None,
        }
    }

    pub fn identifier(&self) -> &ServerEntityIdentifier {
        &self.identifier
    }

    pub fn consumer_id(&self) -> u64 {
        self.consumer_id
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn registry(&self) -> Option<&ManagementRegistry> {
        self.registry.as_ref()
    }

    pub fn set_registry(&mut self, registry: ManagementRegistry) {
        self.registry = Some(registry);
    }

    /// Manageable means the exposed registry context can be resolved, making
    /// the entity eligible for management-call routing.
    pub fn is_manageable(&self) -> bool {
        self.registry.is_some()
    }

    /// Called by the owning server when this node is inserted.
    pub(super) fn attach(&mut self, server_context: &Context) {
        self.context = server_context
            .clone()
            .with("entityId", self.identifier.id())
            .with("entityName", self.identifier.name.clone())
            .with("entityType", self.identifier.type_name.clone())
            .with("consumerId", self.consumer_id.to_string());
    }
}
