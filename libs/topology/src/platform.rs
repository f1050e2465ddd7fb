//! Platform callback inputs.
//!
//! The hosting platform delivers one event per call through these value
//! types. They describe what happened on the wire; the topology core decides
//! what it means for the tracked model.

use model::{ClientIdentifier, Endpoint, ServerEntityIdentifier};
use std::fmt;

/// Identity and addresses of a cluster node as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformServerInfo {
    pub server_name: String,
    pub host_name: String,
    pub host_address: String,
    pub bind_address: String,
    pub bind_port: u32,
    pub group_port: u32,
    pub build_id: String,
    pub version: String,
    pub start_time: u64,
}

/// Identity of a hosted entity plus its active/passive flag and consumer id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformEntityInfo {
    pub name: String,
    pub type_name: String,
    pub consumer_id: u64,
    pub is_active: bool,
}

impl PlatformEntityInfo {
    pub fn identifier(&self) -> ServerEntityIdentifier {
        ServerEntityIdentifier::new(&self.name, &self.type_name)
    }
}

impl fmt::Display for PlatformEntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} (consumerId={}, active={})",
            self.name, self.type_name, self.consumer_id, self.is_active
        )
    }
}

/// A connected client process as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformClientInfo {
    pub pid: u64,
    pub name: String,
    pub uuid: String,
    pub host_name: String,
    pub remote_address: String,
    pub remote_port: u16,
}

impl PlatformClientInfo {
    pub fn identifier(&self) -> ClientIdentifier {
        ClientIdentifier::new(self.pid, &self.remote_address, &self.name, &self.uuid)
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.remote_address, self.remote_port)
    }
}

/// A server state transition: raw platform state string plus activation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerStateInfo {
    pub state: String,
    pub activate_time: u64,
}

/// Opaque per-connection handle the platform uses to identify one client's
/// fetch of one entity. Meaningful only as a map key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientDescriptor(pub u64);

impl fmt::Display for ClientDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "descriptor-{}", self.0)
    }
}
