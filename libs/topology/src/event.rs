//! Sink for notifications, statistics and management-call answers.

use model::{ContextualNotification, ContextualReturn, ContextualStatistics};
use parking_lot::Mutex;

/// Fire-and-forget publish surface towards the monitoring front-end.
///
/// Implementations are called synchronously from inside the topology critical
/// section and must be fast and non-blocking: buffer or drop, never wait.
pub trait EventService: Send + Sync {
    fn fire_notification(&self, notification: ContextualNotification);

    fn fire_statistics(&self, statistics: Vec<ContextualStatistics>);

    /// Correlation channel for management-call answers.
    fn fire_management_call_answer(&self, call_id: &str, answer: ContextualReturn);
}

/// Event service that records everything it receives. Test support.
#[derive(Default)]
pub struct RecordingEventService {
    notifications: Mutex<Vec<ContextualNotification>>,
    statistics: Mutex<Vec<Vec<ContextualStatistics>>>,
    answers: Mutex<Vec<(String, ContextualReturn)>>,
}

impl RecordingEventService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<ContextualNotification> {
        self.notifications.lock().clone()
    }

    /// Kinds of all recorded notifications, in emission order.
    pub fn notification_kinds(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .map(|n| n.kind().to_string())
            .collect()
    }

    pub fn statistics(&self) -> Vec<Vec<ContextualStatistics>> {
        self.statistics.lock().clone()
    }

    pub fn answers(&self) -> Vec<(String, ContextualReturn)> {
        self.answers.lock().clone()
    }

    pub fn clear(&self) {
        self.notifications.lock().clear();
        self.statistics.lock().clear();
        self.answers.lock().clear();
    }
}

impl EventService for RecordingEventService {
    fn fire_notification(&self, notification: ContextualNotification) {
        self.notifications.lock().push(notification);
    }

    fn fire_statistics(&self, statistics: Vec<ContextualStatistics>) {
        self.statistics.lock().push(statistics);
    }

    fn fire_management_call_answer(&self, call_id: &str, answer: ContextualReturn) {
        self.answers.lock().push((call_id.to_string(), answer));
    }
}
