//! Monitoring-service errors.

use thiserror::Error;
use topology::TopologyError;

#[derive(Debug, Error)]
pub enum MonitoringError {
    /// A message kind the router has no handling for. Fatal for that
    /// message: routing an unknown kind means a protocol mismatch, not a
    /// transient condition.
    #[error("unsupported management message: {0}")]
    UnsupportedMessage(String),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

pub type MonitoringResult<T> = std::result::Result<T, MonitoringError>;
