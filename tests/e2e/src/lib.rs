//! Shared fixtures for the end-to-end scenarios: a fully wired monitoring
//! stack (topology core + ring-buffer sink + façades) driven the way the
//! hosting platform would drive it.

use monitoring_service::{MonitoringConfig, MonitoringMessage, RingBufferEventService};
use std::sync::Arc;
use topology::{
    ManualTimeSource, PlatformClientInfo, PlatformEntityInfo, PlatformServerInfo, TopologyCore,
};

pub struct ClusterFixture {
    pub config: MonitoringConfig,
    pub buffer: Arc<RingBufferEventService>,
    pub clock: Arc<ManualTimeSource>,
    pub topology: Arc<TopologyCore>,
}

impl ClusterFixture {
    pub fn new(server_name: &str) -> Self {
        init_tracing();
        let config = MonitoringConfig::new(server_name);
        let buffer = Arc::new(RingBufferEventService::with_capacity(
            config.event_buffer_capacity,
        ));
        let clock = Arc::new(ManualTimeSource::at(1_000));
        let topology = Arc::new(monitoring_service::new_topology(
            &config,
            buffer.clone(),
            clock.clone(),
        ));
        tracing::info!(server = %config.server_name, "cluster fixture wired");
        Self {
            config,
            buffer,
            clock,
            topology,
        }
    }

    /// Drains the buffer and returns only the notification kinds, in order.
    pub fn drain_notification_kinds(&self) -> Vec<String> {
        self.buffer
            .drain()
            .into_iter()
            .filter_map(|message| match message {
                MonitoringMessage::Notification(n) => Some(n.kind().to_string()),
                MonitoringMessage::Statistics(_) => None,
            })
            .collect()
    }

    /// Drains and discards anything buffered so far.
    pub fn discard_buffered(&self) {
        let _ = self.buffer.drain();
    }
}

pub fn server(name: &str) -> PlatformServerInfo {
    PlatformServerInfo {
        server_name: name.to_string(),
        host_name: format!("host-{name}"),
        host_address: "10.0.0.1".to_string(),
        bind_address: "0.0.0.0".to_string(),
        bind_port: 9410,
        group_port: 9430,
        build_id: "build-1".to_string(),
        version: "1.0".to_string(),
        start_time: 500,
    }
}

pub fn cache_entity(consumer_id: u64, is_active: bool) -> PlatformEntityInfo {
    PlatformEntityInfo {
        name: "pets".to_string(),
        type_name: "CacheEntity".to_string(),
        consumer_id,
        is_active,
    }
}

pub fn client(name: &str) -> PlatformClientInfo {
    PlatformClientInfo {
        pid: 4200,
        name: name.to_string(),
        uuid: format!("uid-{name}"),
        host_name: "client-host".to_string(),
        remote_address: "10.0.0.8".to_string(),
        remote_port: 61000,
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
