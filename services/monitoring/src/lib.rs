//! # Lattice Monitoring Service
//!
//! Per-entity monitoring façades layered on the `topology` core, plus the
//! plumbing around them:
//!
//! - [`ActiveEntityMonitoringService`]: an active entity's own pushes,
//!   re-addressed with the entity's resolved context.
//! - [`ClientMonitoringService`]: pushes attributed to a fetched client,
//!   the manageable-clients index and the management-call router.
//! - [`PassiveEntityMonitoringService`]: passive-side pushes written into a
//!   [`MonitoringTree`] under structural keys instead of a network fan-out.
//! - [`RingBufferEventService`]: the bounded, non-blocking event sink the
//!   monitoring front-end drains, with a correlation map for call answers.
//! - [`MonitoringConfig`]: static configuration with TOML loading.
//!
//! Pushes that no longer resolve to a context are dropped silently: they
//! reflect benign races between a disconnect and in-flight data, never an
//! error.

pub mod active_entity;
pub mod buffer;
pub mod client;
pub mod config;
pub mod error;
pub mod messenger;
pub mod passive_entity;
pub mod producer;
pub mod tree;

pub use active_entity::ActiveEntityMonitoringService;
pub use buffer::{MonitoringMessage, RingBufferEventService};
pub use client::ClientMonitoringService;
pub use config::MonitoringConfig;
pub use error::{MonitoringError, MonitoringResult};
pub use messenger::{ClientMessenger, RecordingMessenger};
pub use passive_entity::PassiveEntityMonitoringService;
pub use producer::{
    MonitoringProducer, TOPIC_SERVER_ENTITY_NOTIFICATION, TOPIC_SERVER_ENTITY_STATISTICS,
};
pub use tree::MonitoringTree;

use std::sync::Arc;
use topology::{EventService, TimeSource, TopologyCore};

/// Builds the topology core for one configured server.
pub fn new_topology(
    config: &MonitoringConfig,
    event_service: Arc<dyn EventService>,
    time_source: Arc<dyn TimeSource>,
) -> TopologyCore {
    TopologyCore::new(
        &config.stripe_name,
        &config.server_name,
        event_service,
        time_source,
    )
}
