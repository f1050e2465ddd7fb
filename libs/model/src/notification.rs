//! Topology transition notifications
//!
//! Every topology transition becomes a `ContextualNotification` on the
//! monitoring stream. The core vocabulary is closed (`NotificationKind`);
//! managed parties may additionally push domain notifications of their own,
//! which is why the wire kind stays an open string.

use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The exhaustive vocabulary of core topology notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    ServerJoined,
    ServerLeft,
    ServerStateChanged,
    ServerEntityCreated,
    ServerEntityDestroyed,
    ServerEntityFailoverCompleted,
    ServerEntityFetched,
    ServerEntityUnfetched,
    ClientConnected,
    ClientDisconnected,
    ClientTagsUpdated,
    ClientRegistryAvailable,
    ClientRegistryUpdated,
    EntityRegistryAvailable,
    EntityRegistryUpdated,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::ServerJoined => "SERVER_JOINED",
            NotificationKind::ServerLeft => "SERVER_LEFT",
            NotificationKind::ServerStateChanged => "SERVER_STATE_CHANGED",
            NotificationKind::ServerEntityCreated => "SERVER_ENTITY_CREATED",
            NotificationKind::ServerEntityDestroyed => "SERVER_ENTITY_DESTROYED",
            NotificationKind::ServerEntityFailoverCompleted => "SERVER_ENTITY_FAILOVER_COMPLETED",
            NotificationKind::ServerEntityFetched => "SERVER_ENTITY_FETCHED",
            NotificationKind::ServerEntityUnfetched => "SERVER_ENTITY_UNFETCHED",
            NotificationKind::ClientConnected => "CLIENT_CONNECTED",
            NotificationKind::ClientDisconnected => "CLIENT_DISCONNECTED",
            NotificationKind::ClientTagsUpdated => "CLIENT_TAGS_UPDATED",
            NotificationKind::ClientRegistryAvailable => "CLIENT_REGISTRY_AVAILABLE",
            NotificationKind::ClientRegistryUpdated => "CLIENT_REGISTRY_UPDATED",
            NotificationKind::EntityRegistryAvailable => "ENTITY_REGISTRY_AVAILABLE",
            NotificationKind::EntityRegistryUpdated => "ENTITY_REGISTRY_UPDATED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification carrying the full composed address of its originating
/// entity, plus optional string attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualNotification {
    context: Context,
    kind: String,
    attributes: BTreeMap<String, String>,
}

impl ContextualNotification {
    pub fn new(context: Context, kind: impl Into<String>) -> Self {
        Self {
            context,
            kind: kind.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn of(context: Context, kind: NotificationKind) -> Self {
        Self::new(context, kind.as_str())
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Unions `extra` into the carried context; existing pairs win.
    pub fn extend_context(&mut self, extra: &Context) {
        self.context = self.context.with_all(extra);
    }
}
