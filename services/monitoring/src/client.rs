//! Active-side, client-facing monitoring façade
//!
//! One instance per hosted entity on the active server. Accepts inbound
//! pushes from the entity's fetched clients, enriches them with the client's
//! resolved context before forwarding to the event sink, and routes outbound
//! management calls back to the right client by context containment.

use crate::error::{MonitoringError, MonitoringResult};
use crate::messenger::ClientMessenger;
use dashmap::DashMap;
use model::{
    Capability, Context, ContextContainer, ContextualNotification, ContextualReturn,
    ContextualStatistics, ManagementMessage, ManagementRegistry,
};
use std::sync::Arc;
use topology::{ClientDescriptor, EntityListener, EventService, TopologyCore};
use tracing::{error, trace};

pub struct ClientMonitoringService {
    consumer_id: u64,
    topology: Arc<TopologyCore>,
    event_service: Arc<dyn EventService>,
    messenger: Arc<dyn ClientMessenger>,
    /// Fetched clients whose registry context resolved, eligible for
    /// management-call routing.
    manageable_clients: DashMap<ClientDescriptor, Context>,
}

impl ClientMonitoringService {
    pub fn new(
        consumer_id: u64,
        topology: Arc<TopologyCore>,
        event_service: Arc<dyn EventService>,
        messenger: Arc<dyn ClientMessenger>,
    ) -> Self {
        Self {
            consumer_id,
            topology,
            event_service,
            messenger,
            manageable_clients: DashMap::new(),
        }
    }

    pub fn consumer_id(&self) -> u64 {
        self.consumer_id
    }

    /// Forwards a client's notification with the client's address attached.
    /// A push that no longer resolves to a context raced a disconnect and is
    /// dropped silently.
    pub fn push_notification(
        &self,
        from: ClientDescriptor,
        mut notification: ContextualNotification,
    ) {
        trace!(consumer_id = self.consumer_id, %from, kind = notification.kind(), "push_notification");
        if let Some(context) = self.topology.client_context(self.consumer_id, from) {
            notification.extend_context(&context);
            self.event_service.fire_notification(notification);
        }
    }

    /// Forwards a client's statistics batch, each sample re-addressed with
    /// the client's context. Empty batches and unresolvable senders are
    /// dropped.
    pub fn push_statistics(&self, from: ClientDescriptor, statistics: Vec<ContextualStatistics>) {
        if statistics.is_empty() {
            return;
        }
        trace!(consumer_id = self.consumer_id, %from, count = statistics.len(), "push_statistics");
        if let Some(context) = self.topology.client_context(self.consumer_id, from) {
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

    /// Attributes a tag set to the pushing client.
    pub fn expose_tags(&self, from: ClientDescriptor, tags: &[String]) {
        trace!(consumer_id = self.consumer_id, %from, ?tags, "expose_tags");
        self.topology.set_client_tags(self.consumer_id, from, tags);
    }

    /// Records the client's management surface and, when its context
    /// resolves, registers it for call routing.
    pub fn expose_management_registry(
        &self,
        from: ClientDescriptor,
        context_container: ContextContainer,
        capabilities: Vec<Capability>,
    ) {
        trace!(consumer_id = self.consumer_id, %from, "expose_management_registry");
        let mut registry = ManagementRegistry::new(context_container);
        registry.add_capabilities(capabilities);
        self.topology
            .set_client_management_registry(self.consumer_id, from, registry);
        if let Some(context) = self
            .topology
            .manageable_client_context_by_descriptor(self.consumer_id, from)
        {
            self.manageable_clients.insert(from, context);
        }
    }

    /// Forwards a client's answer on the management-call correlation channel.
    pub fn answer_management_call(
        &self,
        caller: ClientDescriptor,
        call_id: &str,
        answer: ContextualReturn,
    ) {
        trace!(consumer_id = self.consumer_id, %caller, call_id, "answer_management_call");
        self.event_service.fire_management_call_answer(call_id, answer);
    }

    /// Routes an outbound management call to the first registered client
    /// whose context the call's target context contains. No match means the
    /// call was meant for a different entity's registry and is not an error
    /// here. Selection order is the index's iteration order; client contexts
    /// are unique in practice, so ties do not occur.
    pub fn fire_message(&self, message: &ManagementMessage) -> MonitoringResult<()> {
        match message {
            ManagementMessage::ManagementCall(call) => {
                for entry in self.manageable_clients.iter() {
                    if call.target_context.contains(entry.value()) {
                        self.send(*entry.key(), message);
                        break;
                    }
                }
                Ok(())
            }
            other => Err(MonitoringError::UnsupportedMessage(other.kind().to_string())),
        }
    }

    fn send(&self, descriptor: ClientDescriptor, message: &ManagementMessage) {
        trace!(consumer_id = self.consumer_id, %descriptor, kind = message.kind(), "send");
        if let Err(error) = self.messenger.send(descriptor, message) {
            // best-effort: the client may have gone away mid-route
            error!(
                consumer_id = self.consumer_id,
                %descriptor,
                %error,
                "unable to send management message to client"
            );
        }
    }
}

impl EntityListener for ClientMonitoringService {
    fn on_unfetch(&self, consumer_id: u64, descriptor: ClientDescriptor) {
        if consumer_id == self.consumer_id {
            trace!(consumer_id, %descriptor, "on_unfetch");
            self.manageable_clients.remove(&descriptor);
        }
    }

    fn on_entity_destroyed(&self, consumer_id: u64) {
        if consumer_id == self.consumer_id {
            trace!(consumer_id, "on_entity_destroyed");
            self.manageable_clients.clear();
        }
    }

    fn on_entity_failover(&self, consumer_id: u64) {
        self.on_entity_destroyed(consumer_id);
    }
}
