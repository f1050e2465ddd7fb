//! Delivery seam towards the remote-invocation framework.

use model::ManagementMessage;
use parking_lot::Mutex;
use topology::ClientDescriptor;

/// Sends a management message to one connected client. Implemented by the
/// transport layer; delivery is best-effort and a failure is the caller's to
/// log, never to propagate.
pub trait ClientMessenger: Send + Sync {
    fn send(&self, descriptor: ClientDescriptor, message: &ManagementMessage)
        -> anyhow::Result<()>;
}

/// Messenger that records sends and can simulate delivery failure. Test
/// support.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(ClientDescriptor, ManagementMessage)>>,
    fail: Mutex<bool>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(ClientDescriptor, ManagementMessage)> {
        self.sent.lock().clone()
    }

    pub fn fail_next_sends(&self, fail: bool) {
        *self.fail.lock() = fail;
    }
}

impl ClientMessenger for RecordingMessenger {
    fn send(
        &self,
        descriptor: ClientDescriptor,
        message: &ManagementMessage,
    ) -> anyhow::Result<()> {
        if *self.fail.lock() {
            anyhow::bail!("client {descriptor} unreachable");
        }
        self.sent.lock().push((descriptor, message.clone()));
        Ok(())
    }
}
