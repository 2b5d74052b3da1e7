//! Orchestration-system collaborator contracts.
//!
//! The reconciler never reaches into process-wide state for its data
//! source; both collaborators are injected at construction.

use async_trait::async_trait;
use fabric_sync_common::SyncResult;
use fabric_types::{LogicalNetwork, LogicalPort, LogicalSubnet};

/// Read-only snapshot queries against the orchestration system's store.
///
/// No ordering guarantee across calls; resync is best-effort and
/// idempotent, so reading entity classes at slightly different times is
/// acceptable.
#[async_trait]
pub trait NetworkData: Send + Sync {
    async fn list_networks(&self) -> SyncResult<Vec<LogicalNetwork>>;
    async fn list_subnets(&self) -> SyncResult<Vec<LogicalSubnet>>;
    async fn list_ports(&self) -> SyncResult<Vec<LogicalPort>>;
    async fn get_network(&self, id: &str) -> SyncResult<LogicalNetwork>;
    async fn get_subnet(&self, id: &str) -> SyncResult<LogicalSubnet>;
    async fn get_port(&self, id: &str) -> SyncResult<LogicalPort>;
}

/// Reference to a router interface, supplied as either the subnet being
/// attached or an existing port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceRef {
    Subnet(String),
    Port(String),
}

impl InterfaceRef {
    pub fn subnet(id: impl Into<String>) -> Self {
        InterfaceRef::Subnet(id.into())
    }

    pub fn port(id: impl Into<String>) -> Self {
        InterfaceRef::Port(id.into())
    }
}

/// Logical-side router interface persistence, owned by the orchestration
/// system.
///
/// The router service commits interface changes here and mirrors them to
/// the fabric; `remove_interface` doubles as the compensating rollback
/// when the fabric-side attach fails after the logical commit.
#[async_trait]
pub trait RouterStore: Send + Sync {
    async fn add_interface(&self, router_id: &str, interface: &InterfaceRef) -> SyncResult<()>;
    async fn remove_interface(&self, router_id: &str, interface: &InterfaceRef) -> SyncResult<()>;
}
