//! # Lattice Topology Core
//!
//! The live topology of a clustered active/passive deployment, maintained as
//! a state machine over the `model` tree. The hosting platform feeds
//! lifecycle callbacks in; every transition becomes an ordered notification
//! on the [`EventService`] sink, and layered monitoring services read
//! contexts and snapshots back out.
//!
//! ## Concurrency model
//!
//! Callbacks may arrive on any thread but are serialized by one coarse
//! exclusive lock per [`TopologyCore`]. Nothing blocks while the lock is
//! held: event publication and [`EntityListener`] dispatch are synchronous,
//! and a listener failure is isolated so it cannot corrupt the tracked model.
//! Readers that need a stable multi-node view take
//! [`TopologyCore::cluster_snapshot`], a deep copy with no shared mutable
//! state; point lookups resolve single contexts under the lock.
//!
//! ## Failure policy
//!
//! A referenced node that should exist but does not, or an active/passive
//! sender mismatch on entity lifecycle events, is a fatal
//! [`TopologyError::Inconsistent`]: the callback aborts and the error carries
//! the current active server plus a dump of the tracked cluster.

pub mod core;
pub mod error;
pub mod event;
pub mod listener;
pub mod platform;
pub mod time;

pub use crate::core::TopologyCore;
pub use error::{TopologyError, TopologyResult};
pub use event::{EventService, RecordingEventService};
pub use listener::EntityListener;
pub use platform::{
    ClientDescriptor, PlatformClientInfo, PlatformEntityInfo, PlatformServerInfo, ServerStateInfo,
};
pub use time::{ManualTimeSource, SystemTimeSource, TimeSource};
