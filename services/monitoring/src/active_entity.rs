//! Active-side, entity-facing monitoring façade
//!
//! One instance per hosted entity on the active server, for the entity's own
//! pushes (as opposed to pushes attributed to one of its clients, which go
//! through `ClientMonitoringService`). Pushes are re-addressed with the
//! entity's resolved context; an entity that no longer resolves raced its
//! own teardown and its pushes are dropped silently.

use model::{
    Capability, Context, ContextContainer, ContextualNotification, ContextualReturn,
    ContextualStatistics, ManagementRegistry,
};
use std::sync::Arc;
use topology::{EventService, TopologyCore};
use tracing::trace;

pub struct ActiveEntityMonitoringService {
    consumer_id: u64,
    topology: Arc<TopologyCore>,
    event_service: Arc<dyn EventService>,
}

impl ActiveEntityMonitoringService {
    pub fn new(
        consumer_id: u64,
        topology: Arc<TopologyCore>,
        event_service: Arc<dyn EventService>,
    ) -> Self {
        Self {
            consumer_id,
            topology,
            event_service,
        }
    }

    pub fn consumer_id(&self) -> u64 {
        self.consumer_id
    }

    /// Records the entity's management surface on the hosting server's node.
    pub fn expose_management_registry(
        &self,
        context_container: ContextContainer,
        capabilities: Vec<Capability>,
    ) {
        trace!(consumer_id = self.consumer_id, "expose_management_registry");
        let mut registry = ManagementRegistry::new(context_container);
        registry.add_capabilities(capabilities);
        let server_name = self.topology.current_server_name().to_string();
        self.topology
            .set_entity_management_registry(self.consumer_id, &server_name, registry);
    }

    pub fn push_notification(&self, mut notification: ContextualNotification) {
        trace!(consumer_id = self.consumer_id, kind = notification.kind(), "push_notification");
        if let Some(context) = self.entity_context() {
            notification.extend_context(&context);
            self.event_service.fire_notification(notification);
        }
    }

    pub fn push_statistics(&self, statistics: Vec<ContextualStatistics>) {
        if statistics.is_empty() {
            return;
        }
        trace!(consumer_id = self.consumer_id, count = statistics.len(), "push_statistics");
        if let Some(context) = self.entity_context() {
            let enriched = statistics
                .into_iter()
                .map(|mut statistic| {
                    statistic.extend_context(&context);
                    statistic
                })
                .collect();
            self.event_service.fire_statistics(enriched);
        }
    }

    pub fn answer_management_call(&self, call_id: &str, answer: ContextualReturn) {
        trace!(
            consumer_id = self.consumer_id,
            call_id,
            failed = answer.has_failed(),
            "answer_management_call"
        );
        self.event_service.fire_management_call_answer(call_id, answer);
    }

    fn entity_context(&self) -> Option<Context> {
        self.topology
            .entity_context(self.topology.current_server_name(), self.consumer_id)
    }
}
