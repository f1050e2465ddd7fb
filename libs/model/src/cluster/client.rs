//! A connected client process and its identity.

use super::connection::{Connection, Endpoint};
use super::registry::ManagementRegistry;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Identity of a client process: pid, host address, logical name and the uuid
/// of its platform connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientIdentifier {
    pid: u64,
    host_address: String,
    name: String,
    connection_uid: String,
}

impl ClientIdentifier {
    /// An empty logical name normalizes to `UNKNOWN`.
    pub fn new(
        pid: u64,
        host_address: impl Into<String>,
        name: impl Into<String>,
        connection_uid: impl Into<String>,
    ) -> Self {
        let name = name.into();
        Self {
            pid,
            host_address: host_address.into(),
            name: if name.is_empty() {
                "UNKNOWN".to_string()
            } else {
                name
            },
            connection_uid: connection_uid.into(),
        }
    }

    pub fn pid(&self) -> u64 {
        self.pid
    }

    pub fn host_address(&self) -> &str {
        &self.host_address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn connection_uid(&self) -> &str {
        &self.connection_uid
    }

    /// The logical id string clients are keyed by across the cluster.
    pub fn client_id(&self) -> String {
        format!(
            "{}@{}:{}:{}",
            self.pid, self.host_address, self.name, self.connection_uid
        )
    }
}

impl fmt::Display for ClientIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.client_id())
    }
}

/// A connected client. Created on `clientConnected`, removed on
/// `clientDisconnected`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    identifier: ClientIdentifier,
    context: Context,
    pub host_name: String,
    tags: BTreeSet<String>,
    registry: Option<ManagementRegistry>,
    connections: BTreeMap<String, Connection>,
}

impl Client {
    pub fn new(identifier: ClientIdentifier) -> Self {
        let context = Context::empty()
            .with("clientId", identifier.client_id())
            .with("clientName", identifier.name.clone());
        Self {
            identifier,
            context,
            host_name: String::new(),
            tags: BTreeSet::new(),
            registry: None,
            connections: BTreeMap::new(),
        }
    }

    pub fn identifier(&self) -> &ClientIdentifier {
        &self.identifier
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn add_connection(&mut self, connection: Connection) {
        self.connections.insert(connection.key(), connection);
    }

    /// Resolves the session with `server_name` over `endpoint`.
    pub fn connection(&self, server_name: &str, endpoint: &Endpoint) -> Option<&Connection> {
        self.connections
            .values()
            .find(|c| c.matches(server_name, endpoint))
    }

    pub fn connection_mut(
        &mut self,
        server_name: &str,
        endpoint: &Endpoint,
    ) -> Option<&mut Connection> {
        self.connections
            .values_mut()
            .find(|c| c.matches(server_name, endpoint))
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = String>) {
        self.tags = tags.into_iter().collect();
    }

    pub fn registry(&self) -> Option<&ManagementRegistry> {
        self.registry.as_ref()
    }

    pub fn set_registry(&mut self, registry: ManagementRegistry) {
        self.registry = Some(registry);
    }

    /// Manageable means the exposed registry context can be resolved, making
    /// the client eligible for management-call routing.
    pub fn is_manageable(&self) -> bool {
        self.registry.is_some()
    }
}
