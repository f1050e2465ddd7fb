//! Monitoring service configuration.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Static configuration of one monitoring-service instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Name of the stripe this server belongs to.
    #[serde(default = "default_stripe_name")]
    pub stripe_name: String,

    /// Name of the local server, as the platform reports it.
    pub server_name: String,

    /// Capacity of the front-end event buffer; the oldest message is dropped
    /// on overflow.
    #[serde(default = "default_event_buffer_capacity")]
    pub event_buffer_capacity: usize,
}

fn default_stripe_name() -> String {
    "SINGLE".to_string()
}

fn default_event_buffer_capacity() -> usize {
    4096
}

impl MonitoringConfig {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            stripe_name: default_stripe_name(),
            server_name: server_name.into(),
            event_buffer_capacity: default_event_buffer_capacity(),
        }
    }

    pub fn from_toml_str(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid monitoring configuration")
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read monitoring configuration {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}
