//! Management-call answers.

use crate::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a remotely invoked capability method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CallOutcome {
    Returned(Value),
    Failed(String),
}

/// The answer a managed party sends back for one management call, correlated
/// to the call by its id on the answer channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualReturn {
    context: Context,
    capability: String,
    method_name: String,
    outcome: CallOutcome,
}

impl ContextualReturn {
    pub fn new(
        context: Context,
        capability: impl Into<String>,
        method_name: impl Into<String>,
        outcome: CallOutcome,
    ) -> Self {
        Self {
            context,
            capability: capability.into(),
            method_name: method_name.into(),
            outcome,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn capability(&self) -> &str {
        &self.capability
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn outcome(&self) -> &CallOutcome {
        &self.outcome
    }

    pub fn has_failed(&self) -> bool {
        matches!(self.outcome, CallOutcome::Failed(_))
    }
}
