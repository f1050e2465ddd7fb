//! One cluster node and the entities it hosts.

use super::entity::{ServerEntity, ServerEntityIdentifier};
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state of a server, as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerState {
    Uninitialized,
    Synchronizing,
    Passive,
    Active,
    Unreachable,
    Unknown,
}

impl ServerState {
    /// Maps a platform state string onto a known state. The platform reports
    /// decorated names such as `ACTIVE-COORDINATOR` or `PASSIVE-STANDBY`;
    /// anything unrecognized maps to `Unknown`.
    pub fn parse(state: &str) -> Self {
        let normalized = state.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "UNINITIALIZED" => ServerState::Uninitialized,
            "SYNCHRONIZING" => ServerState::Synchronizing,
            "PASSIVE" => ServerState::Passive,
            "ACTIVE" => ServerState::Active,
            "UNREACHABLE" => ServerState::Unreachable,
            _ if normalized.starts_with("ACTIVE") => ServerState::Active,
            _ if normalized.starts_with("PASSIVE") => ServerState::Passive,
            _ => ServerState::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerState::Uninitialized => "UNINITIALIZED",
            ServerState::Synchronizing => "SYNCHRONIZING",
            ServerState::Passive => "PASSIVE",
            ServerState::Active => "ACTIVE",
            ServerState::Unreachable => "UNREACHABLE",
            ServerState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cluster node. Created on `serverDidJoinStripe`, removed on
/// `serverDidLeaveStripe`; starts `Uninitialized` until the platform reports a
/// state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    name: String,
    context: Context,
    entities: BTreeMap<String, ServerEntity>,
    pub host_name: String,
    pub host_address: String,
    pub bind_address: String,
    pub bind_port: u32,
    pub group_port: u32,
    pub build_id: String,
    pub version: String,
    pub start_time: u64,
    pub activate_time: u64,
    pub state: ServerState,
}

impl Server {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: Context::empty(),
            entities: BTreeMap::new(),
            host_name: String::new(),
            host_address: String::new(),
            bind_address: String::new(),
            bind_port: 0,
            group_port: 0,
            build_id: String::new(),
            version: String::new(),
            start_time: 0,
            activate_time: 0,
            state: ServerState::Uninitialized,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn is_active(&self) -> bool {
        self.state == ServerState::Active
    }

    /// Called by the owning stripe when this node is inserted.
    pub(super) fn attach(&mut self, stripe_context: &Context) {
        self.context = stripe_context
            .clone()
            .with("serverId", self.name.clone())
            .with("serverName", self.name.clone());
    }

    /// Attaches a hosted entity, composing its context from this server's. An
    /// entity with the same identifier is replaced.
    pub fn add_entity(&mut self, mut entity: ServerEntity) {
        entity.attach(&self.context);
        self.entities.insert(entity.identifier().id(), entity);
    }

    pub fn entity(&self, identifier: &ServerEntityIdentifier) -> Option<&ServerEntity> {
        self.entities.get(&identifier.id())
    }

    pub fn entity_mut(&mut self, identifier: &ServerEntityIdentifier) -> Option<&mut ServerEntity> {
        self.entities.get_mut(&identifier.id())
    }

    pub fn entity_by_consumer(&self, consumer_id: u64) -> Option<&ServerEntity> {
        self.entities.values().find(|e| e.consumer_id() == consumer_id)
    }

    pub fn entity_by_consumer_mut(&mut self, consumer_id: u64) -> Option<&mut ServerEntity> {
        self.entities
            .values_mut()
            .find(|e| e.consumer_id() == consumer_id)
    }

    pub fn remove_entity(&mut self, identifier: &ServerEntityIdentifier) -> Option<ServerEntity> {
        self.entities.remove(&identifier.id())
    }

    pub fn entities(&self) -> impl Iterator<Item = &ServerEntity> {
        self.entities.values()
    }
}
