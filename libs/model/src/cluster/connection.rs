//! A client↔server session and the entities fetched over it.

use super::entity::ServerEntityIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Remote address/port pair of a platform connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// One client↔server session. Fetches are established and torn down
/// independently of the connection itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    logical_uid: String,
    server_name: String,
    endpoint: Endpoint,
    fetched: BTreeSet<String>,
}

impl Connection {
    pub fn new(
        logical_uid: impl Into<String>,
        server_name: impl Into<String>,
        endpoint: Endpoint,
    ) -> Self {
        Self {
            logical_uid: logical_uid.into(),
            server_name: server_name.into(),
            endpoint,
            fetched: BTreeSet::new(),
        }
    }

    pub fn logical_uid(&self) -> &str {
        &self.logical_uid
    }

    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub(super) fn key(&self) -> String {
        format!("{}:{}:{}", self.logical_uid, self.server_name, self.endpoint)
    }

    pub fn matches(&self, server_name: &str, endpoint: &Endpoint) -> bool {
        self.server_name == server_name && self.endpoint == *endpoint
    }

    /// Records a fetch. Returns false on a duplicate.
    pub fn fetch(&mut self, identifier: &ServerEntityIdentifier) -> bool {
        self.fetched.insert(identifier.id())
    }

    /// Removes a fetch. Returns false when the entity was not fetched.
    pub fn unfetch(&mut self, identifier: &ServerEntityIdentifier) -> bool {
        self.fetched.remove(&identifier.id())
    }

    pub fn has_fetched(&self, identifier: &ServerEntityIdentifier) -> bool {
        self.fetched.contains(&identifier.id())
    }

    pub fn fetched_entity_ids(&self) -> impl Iterator<Item = &str> {
        self.fetched.iter().map(|s| s.as_str())
    }
}
