//! Ring-buffer event sink for the monitoring front-end.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use dashmap::DashMap;
use model::{ContextualNotification, ContextualReturn, ContextualStatistics};
use std::sync::atomic::{AtomicU64, Ordering};
use topology::EventService;
use tracing::warn;

/// One buffered monitoring message.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitoringMessage {
    Notification(ContextualNotification),
    Statistics(Vec<ContextualStatistics>),
}

impl MonitoringMessage {
    pub fn kind(&self) -> &str {
        match self {
            MonitoringMessage::Notification(n) => n.kind(),
            MonitoringMessage::Statistics(_) => "STATISTICS",
        }
    }
}

/// Bounded, non-blocking [`EventService`]: producers never wait, a full
/// buffer drops its oldest message, and the front-end drains in publication
/// order. Management-call answers bypass the buffer and sit in a correlation
/// map until claimed.
pub struct RingBufferEventService {
    tx: Sender<MonitoringMessage>,
    rx: Receiver<MonitoringMessage>,
    answers: DashMap<String, ContextualReturn>,
    dropped: AtomicU64,
}

impl RingBufferEventService {
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity.max(1));
        Self {
            tx,
            rx,
            answers: DashMap::new(),
            dropped: AtomicU64::new(0),
        }
    }

    /// Removes and returns everything buffered so far, oldest first.
    pub fn drain(&self) -> Vec<MonitoringMessage> {
        self.rx.try_iter().collect()
    }

    /// Claims the answer for `call_id`, if it has arrived.
    pub fn take_answer(&self, call_id: &str) -> Option<ContextualReturn> {
        self.answers.remove(call_id).map(|(_, answer)| answer)
    }

    /// Messages discarded because the buffer was full.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn offer(&self, message: MonitoringMessage) {
        let mut message = message;
        loop {
            match self.tx.try_send(message) {
                Ok(()) => return,
                Err(TrySendError::Full(returned)) => {
                    message = returned;
                    if self.rx.try_recv().is_ok() {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        warn!("monitoring buffer full, dropped oldest message");
                    }
                    // a concurrent drain may already have made room; retry
                }
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }
}

impl EventService for RingBufferEventService {
    fn fire_notification(&self, notification: ContextualNotification) {
        self.offer(MonitoringMessage::Notification(notification));
    }

    fn fire_statistics(&self, statistics: Vec<ContextualStatistics>) {
        if !statistics.is_empty() {
            self.offer(MonitoringMessage::Statistics(statistics));
        }
    }

    fn fire_management_call_answer(&self, call_id: &str, answer: ContextualReturn) {
        self.answers.insert(call_id.to_string(), answer);
    }
}
