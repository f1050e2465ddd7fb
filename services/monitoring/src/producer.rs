//! Structural sink for passive-side monitoring data.

use serde_json::Value;

/// Best-effort topic for notifications pushed by passive entities.
pub const TOPIC_SERVER_ENTITY_NOTIFICATION: &str = "server-entity-notification";
/// Best-effort topic for statistics pushed by passive entities.
pub const TOPIC_SERVER_ENTITY_STATISTICS: &str = "server-entity-statistics";

/// Where a passive server's monitoring data goes: durable nodes addressed by
/// a structural key path, plus best-effort topic pushes that may be dropped
/// under pressure. The replication of this data to the active server is the
/// platform's concern, behind this seam.
pub trait MonitoringProducer: Send + Sync {
    /// Creates or replaces the node `name` under the path `parents`,
    /// creating intermediate nodes as needed.
    fn add_node(&self, parents: &[&str], name: &str, value: Value);

    /// Removes the node `name` (and its subtree) under `parents`.
    fn remove_node(&self, parents: &[&str], name: &str);

    /// Publishes onto a best-effort topic.
    fn push_best_efforts(&self, topic: &str, value: Value);
}
