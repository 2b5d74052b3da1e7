//! Fabric controller client contract.
//!
//! The low-level HTTP session and wire protocol live outside this crate;
//! the reconciler only depends on this trait. Every `ensure_*` operation
//! is idempotent (create-if-absent, no-op when already present with
//! matching attributes) and every `delete_*` operation is idempotent
//! (no-op if absent) — resync and live event handling interleave without
//! versioning, so idempotency is what keeps the fabric consistent.

use async_trait::async_trait;
use fabric_sync_common::SyncResult;
use fabric_types::FabricName;
use std::fmt;

/// Batching scope for a related group of fabric operations.
///
/// A scope groups calls that are semantically one unit of fabric
/// configuration (e.g. all gateway-wiring operations for one external
/// attachment). It is not a database transaction: there is no atomicity
/// and no rollback, and ordering within the scope is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionScope(u64);

impl TransactionScope {
    pub fn new(id: u64) -> Self {
        TransactionScope(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn-{}", self.0)
    }
}

/// Fabric-side contract identifier returned by
/// [`FabricClient::get_router_contract`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractId(String);

impl ContractId {
    pub fn new(id: impl Into<String>) -> Self {
        ContractId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations the reconciler issues against the fabric controller.
///
/// Calls are blocking network requests awaited inline by the reconciler;
/// timeouts and retries, if any, belong to the implementation beneath
/// this trait.
#[async_trait]
pub trait FabricClient: Send + Sync {
    /// Opens a new batching scope for a related group of operations.
    fn begin_transaction(&self) -> TransactionScope;

    // Network-level objects

    async fn ensure_bridge_domain_created(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn delete_bridge_domain(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn ensure_epg_created_for_network(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn delete_epg_for_network(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    // Subnet gateways on a network's bridge domain

    async fn ensure_subnet_created(
        &self,
        tenant: &FabricName,
        network: &FabricName,
        gateway: &str,
    ) -> SyncResult<()>;

    async fn ensure_subnet_deleted(
        &self,
        tenant: &FabricName,
        network: &FabricName,
        gateway: &str,
    ) -> SyncResult<()>;

    // Host path attachment

    /// Ensures a static path (host ↔ EPG ↔ switch port) exists for the
    /// given tenant/network/host tuple. `encap` carries the VLAN
    /// segmentation ID when the bound segment is VLAN-typed.
    async fn ensure_path_created_for_port(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
        host: &str,
        encap: Option<u32>,
    ) -> SyncResult<()>;

    // External connectivity

    /// Fetches (creating if needed) the contract governing traffic for a
    /// router.
    async fn get_router_contract(&self, router: &FabricName) -> SyncResult<ContractId>;

    /// Ensures the fabric's routing context exists and is enforced.
    async fn ensure_context_enforced(&self, txn: Option<TransactionScope>) -> SyncResult<()>;

    async fn ensure_external_routed_network_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
    ) -> SyncResult<()>;

    #[allow(clippy::too_many_arguments)]
    async fn ensure_logical_node_profile_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        switch: &str,
        module: &str,
        port: &str,
        encap: Option<&str>,
        address: &str,
    ) -> SyncResult<()>;

    async fn ensure_static_route_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        switch: &str,
        next_hop: &str,
    ) -> SyncResult<()>;

    async fn ensure_external_epg_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn ensure_external_epg_consumed_contract(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        contract: &ContractId,
    ) -> SyncResult<()>;

    async fn ensure_external_epg_provided_contract(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        contract: &ContractId,
    ) -> SyncResult<()>;

    /// Removes the contract association from a network's external EPG.
    async fn delete_external_epg_contract(
        &self,
        router: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn delete_external_routed_network(&self, network: &FabricName) -> SyncResult<()>;

    // Router objects

    async fn add_router_interface(
        &self,
        tenant: &FabricName,
        router: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn remove_router_interface(
        &self,
        tenant: &FabricName,
        router: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()>;

    async fn delete_router(&self, router: &FabricName) -> SyncResult<()>;
}
