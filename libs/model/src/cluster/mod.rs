//! Topology tree value objects
//!
//! Cluster → Stripe → Server → ServerEntity on the server side, and
//! Cluster → Client → Connection → fetched entities on the client side.
//! Every node owns the `Context` derived from its identity and position;
//! contexts are composed once, when a node is inserted, and never change.
//!
//! All nodes are plain values: `Clone` is a deep structural clone, which is
//! what makes `TopologyCore::cluster_snapshot` safe to hand out.

mod client;
mod connection;
mod entity;
mod registry;
mod server;
mod stripe;

pub use client::{Client, ClientIdentifier};
pub use connection::{Connection, Endpoint};
pub use entity::{ServerEntity, ServerEntityIdentifier};
pub use registry::{Capability, ManagementRegistry};
pub use server::{Server, ServerState};
pub use stripe::Stripe;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Root of the topology tree. Created once at service start, never destroyed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    stripes: BTreeMap<String, Stripe>,
    clients: BTreeMap<String, Client>,
}

impl Cluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and attaches a stripe. Returns a reference to the new node.
    pub fn add_stripe(&mut self, name: impl Into<String>) -> &mut Stripe {
        let name = name.into();
        self.stripes
            .entry(name.clone())
            .or_insert_with(|| Stripe::new(name))
    }

    pub fn stripe(&self, name: &str) -> Option<&Stripe> {
        self.stripes.get(name)
    }

    pub fn stripe_mut(&mut self, name: &str) -> Option<&mut Stripe> {
        self.stripes.get_mut(name)
    }

    pub fn stripes(&self) -> impl Iterator<Item = &Stripe> {
        self.stripes.values()
    }

    /// Attaches a client, keyed by its logical client id. An existing client
    /// with the same identity is replaced.
    pub fn add_client(&mut self, client: Client) {
        self.clients.insert(client.identifier().client_id(), client);
    }

    pub fn client(&self, identifier: &ClientIdentifier) -> Option<&Client> {
        self.clients.get(&identifier.client_id())
    }

    pub fn client_mut(&mut self, identifier: &ClientIdentifier) -> Option<&mut Client> {
        self.clients.get_mut(&identifier.client_id())
    }

    pub fn remove_client(&mut self, identifier: &ClientIdentifier) -> Option<Client> {
        self.clients.remove(&identifier.client_id())
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }
}
