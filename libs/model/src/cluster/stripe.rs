//! A stripe groups the servers forming one active/passive replication unit.

use super::server::Server;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stripe {
    name: String,
    context: Context,
    servers: BTreeMap<String, Server>,
}

impl Stripe {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let context = Context::empty()
            .with("stripeId", name.clone())
            .with("stripeName", name.clone());
        Self {
            name,
            context,
            servers: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Attaches a server, composing its context from this stripe's. A server
    /// with the same name is replaced.
    pub fn add_server(&mut self, mut server: Server) {
        server.attach(&self.context);
        self.servers.insert(server.name().to_string(), server);
    }

    pub fn server(&self, name: &str) -> Option<&Server> {
        self.servers.get(name)
    }

    pub fn server_mut(&mut self, name: &str) -> Option<&mut Server> {
        self.servers.get_mut(name)
    }

    pub fn remove_server(&mut self, name: &str) -> Option<Server> {
        self.servers.remove(name)
    }

    pub fn servers(&self) -> impl Iterator<Item = &Server> {
        self.servers.values()
    }
}
