//! Statistics samples attached to a context.
//!
//! How statistic values are computed belongs to the capability registry
//! subsystem; this crate only carries named samples with their originating
//! address.

use crate::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualStatistics {
    context: Context,
    statistics: BTreeMap<String, Value>,
}

impl ContextualStatistics {
    pub fn new(context: Context) -> Self {
        Self {
            context,
            statistics: BTreeMap::new(),
        }
    }

    pub fn with_statistic(mut self, name: impl Into<String>, value: Value) -> Self {
        self.statistics.insert(name.into(), value);
        self
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn statistics(&self) -> &BTreeMap<String, Value> {
        &self.statistics
    }

    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    /// Unions `extra` into the carried context; existing pairs win.
    pub fn extend_context(&mut self, extra: &Context) {
        self.context = self.context.with_all(extra);
    }
}
