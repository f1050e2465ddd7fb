//! # Lattice Cluster Model
//!
//! Value types for the cluster topology monitoring system: compositional
//! `Context` addresses, the topology tree (stripes, servers, hosted entities,
//! clients, connections), management registries, and the message types that
//! flow to the monitoring front-end.
//!
//! Everything in this crate is a plain value: immutable contexts combined by
//! union, tree nodes whose `Clone` is a deep structural copy, and
//! serde-serializable messages. The state machine that mutates the tree lives
//! in the `topology` crate; this crate stays free of locks and side effects.

pub mod call;
pub mod cluster;
pub mod context;
pub mod message;
pub mod notification;
pub mod stats;

pub use call::{CallOutcome, ContextualReturn};
pub use cluster::{
    Capability, Client, ClientIdentifier, Cluster, Connection, Endpoint, ManagementRegistry,
    Server, ServerEntity, ServerEntityIdentifier, ServerState, Stripe,
};
pub use context::{Context, ContextContainer};
pub use message::{ManagementCall, ManagementMessage};
pub use notification::{ContextualNotification, NotificationKind};
pub use stats::ContextualStatistics;
