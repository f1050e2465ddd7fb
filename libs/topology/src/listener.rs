//! Observer seam for per-entity monitoring services.

use crate::platform::ClientDescriptor;

/// Notified of fetch/unfetch and entity teardown transitions, synchronously
/// and in registration order, from inside the topology critical section.
///
/// Implementations must be fast and must not call back into the topology
/// core. A panicking listener is isolated by the caller; it cannot corrupt
/// topology state.
pub trait EntityListener: Send + Sync {
    fn on_fetch(&self, consumer_id: u64, descriptor: ClientDescriptor) {
        let _ = (consumer_id, descriptor);
    }

    fn on_unfetch(&self, consumer_id: u64, descriptor: ClientDescriptor) {
        let _ = (consumer_id, descriptor);
    }

    fn on_entity_destroyed(&self, consumer_id: u64) {
        let _ = consumer_id;
    }

    /// A passive entity is transitioning to the new active server. Its new
    /// incarnation is not wired up yet; per-entity state keyed on the old
    /// incarnation must be dropped.
    fn on_entity_failover(&self, consumer_id: u64) {
        let _ = consumer_id;
    }
}
