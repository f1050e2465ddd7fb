//! Out-of-band management messages routed to managed parties.

use crate::call::ContextualReturn;
use crate::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A remote-invoke-and-wait request. The target context is a routing filter:
/// the call is delivered to the first manageable party whose registered
/// context it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagementCall {
    pub call_id: String,
    pub target_context: Context,
    pub capability: String,
    pub method_name: String,
    pub parameters: Vec<Value>,
}

/// Messages flowing through the management-call channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ManagementMessage {
    ManagementCall(ManagementCall),
    ManagementCallReturn {
        call_id: String,
        answer: ContextualReturn,
    },
}

impl ManagementMessage {
    /// Wire-style type tag, used in logs and unsupported-message errors.
    pub fn kind(&self) -> &'static str {
        match self {
            ManagementMessage::ManagementCall(_) => "MANAGEMENT_CALL",
            ManagementMessage::ManagementCallReturn { .. } => "MANAGEMENT_CALL_RETURN",
        }
    }
}
