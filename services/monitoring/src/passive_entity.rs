//! Passive-side, entity-facing monitoring façade
//!
//! On a passive server there is no event sink or network fan-out: pushes are
//! written into the monitoring tree under deterministic structural keys, to
//! be replicated and queried later. Values that fail to serialize are logged
//! and skipped; losing one monitoring datum must never disturb the entity.

use crate::producer::{
    MonitoringProducer, TOPIC_SERVER_ENTITY_NOTIFICATION, TOPIC_SERVER_ENTITY_STATISTICS,
};
use model::{
    Capability, ContextContainer, ContextualNotification, ContextualReturn, ContextualStatistics,
    ManagementRegistry,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{trace, warn};

pub struct PassiveEntityMonitoringService {
    consumer_id: u64,
    producer: Arc<dyn MonitoringProducer>,
}

impl PassiveEntityMonitoringService {
    pub fn new(consumer_id: u64, producer: Arc<dyn MonitoringProducer>) -> Self {
        Self {
            consumer_id,
            producer,
        }
    }

    pub fn consumer_id(&self) -> u64 {
        self.consumer_id
    }

    /// Persists the entity's management surface under the `registry` node.
    pub fn expose_management_registry(
        &self,
        context_container: ContextContainer,
        capabilities: Vec<Capability>,
    ) {
        trace!(consumer_id = self.consumer_id, "expose_management_registry");
        let mut registry = ManagementRegistry::new(context_container);
        registry.add_capabilities(capabilities);
        if let Some(value) = self.to_tree_value(&registry) {
            self.producer.add_node(&[], "registry", value);
        }
    }

    pub fn push_notification(&self, notification: ContextualNotification) {
        trace!(consumer_id = self.consumer_id, kind = notification.kind(), "push_notification");
        if let Some(value) = self.to_tree_value(&notification) {
            self.producer
                .push_best_efforts(TOPIC_SERVER_ENTITY_NOTIFICATION, value);
        }
    }

    pub fn push_statistics(&self, statistics: Vec<ContextualStatistics>) {
        if statistics.is_empty() {
            return;
        }
        trace!(consumer_id = self.consumer_id, count = statistics.len(), "push_statistics");
        if let Some(value) = self.to_tree_value(&statistics) {
            self.producer
                .push_best_efforts(TOPIC_SERVER_ENTITY_STATISTICS, value);
        }
    }

    /// Persists a call answer under `management/answer/<callId>`.
    pub fn answer_management_call(&self, call_id: &str, answer: ContextualReturn) {
        trace!(
            consumer_id = self.consumer_id,
            call_id,
            failed = answer.has_failed(),
            "answer_management_call"
        );
        if let Some(value) = self.to_tree_value(&answer) {
            self.producer
                .add_node(&["management", "answer"], call_id, value);
        }
    }

    fn to_tree_value<T: Serialize>(&self, data: &T) -> Option<Value> {
        match serde_json::to_value(data) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(
                    consumer_id = self.consumer_id,
                    %error,
                    "dropping unserializable monitoring datum"
                );
                None
            }
        }
    }
}
