//! Topology failure taxonomy.
//!
//! A referenced node missing where the platform says it must exist, or an
//! active/passive sender mismatch, means the platform and the tracked model
//! have diverged. That is never retried or swallowed here: the triggering
//! callback aborts and the error carries enough state for a postmortem.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    /// The platform reported something the tracked model cannot reconcile.
    /// Carries the current active server and a textual dump of the cluster
    /// for diagnosis.
    #[error("inconsistent monitoring topology: {detail}\n- current active: {current_active}\n- cluster: {cluster_dump}")]
    Inconsistent {
        detail: String,
        current_active: String,
        cluster_dump: String,
    },
}

impl TopologyError {
    pub fn detail(&self) -> &str {
        match self {
            TopologyError::Inconsistent { detail, .. } => detail,
        }
    }
}

pub type TopologyResult<T> = std::result::Result<T, TopologyError>;
