//! Shared test doubles.
//!
//! A recording fake fabric client with programmable failures, a static
//! in-memory orchestration store, and a recording router store. These
//! simulate the external collaborators without any HTTP or database
//! machinery.

use crate::client::{ContractId, FabricClient, TransactionScope};
use crate::config::ExternalNetworkConfig;
use crate::data::{InterfaceRef, NetworkData, RouterStore};
use async_trait::async_trait;
use fabric_sync_common::{SyncError, SyncResult};
use fabric_types::{FabricName, LogicalNetwork, LogicalPort, LogicalSubnet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One recorded fabric call: operation name, transaction scope, and the
/// stringified arguments in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FabricCall {
    pub op: &'static str,
    pub txn: Option<TransactionScope>,
    pub args: Vec<String>,
}

/// Fake fabric client journaling every call, with per-operation failure
/// injection.
#[derive(Default)]
pub(crate) struct RecordingClient {
    calls: Mutex<Vec<FabricCall>>,
    /// (operation, optional argument substring) pairs that fail.
    fail_ops: Mutex<Vec<(String, Option<String>)>>,
    next_txn: AtomicU64,
}

impl RecordingClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every call to `op` fail.
    pub fn fail_on(&self, op: &str) {
        self.fail_ops.lock().unwrap().push((op.to_string(), None));
    }

    /// Makes calls to `op` fail when any argument contains `arg`.
    pub fn fail_on_arg(&self, op: &str, arg: &str) {
        self.fail_ops
            .lock()
            .unwrap()
            .push((op.to_string(), Some(arg.to_string())));
    }

    pub fn calls(&self) -> Vec<FabricCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(|c| c.op).collect()
    }

    fn record(
        &self,
        op: &'static str,
        txn: Option<TransactionScope>,
        args: Vec<String>,
    ) -> SyncResult<()> {
        let fail = self.fail_ops.lock().unwrap().iter().any(|(fop, farg)| {
            fop == op
                && farg
                    .as_deref()
                    .map_or(true, |a| args.iter().any(|x| x.contains(a)))
        });
        self.calls.lock().unwrap().push(FabricCall { op, txn, args });
        if fail {
            Err(SyncError::fabric(op, "injected failure"))
        } else {
            Ok(())
        }
    }
}

fn s(name: &FabricName) -> String {
    name.as_str().to_string()
}

#[async_trait]
impl FabricClient for RecordingClient {
    fn begin_transaction(&self) -> TransactionScope {
        TransactionScope::new(self.next_txn.fetch_add(1, Ordering::SeqCst))
    }

    async fn ensure_bridge_domain_created(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record("ensure_bridge_domain_created", txn, vec![s(tenant), s(network)])
    }

    async fn delete_bridge_domain(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record("delete_bridge_domain", txn, vec![s(tenant), s(network)])
    }

    async fn ensure_epg_created_for_network(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record(
            "ensure_epg_created_for_network",
            txn,
            vec![s(tenant), s(network)],
        )
    }

    async fn delete_epg_for_network(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record("delete_epg_for_network", txn, vec![s(tenant), s(network)])
    }

    async fn ensure_subnet_created(
        &self,
        tenant: &FabricName,
        network: &FabricName,
        gateway: &str,
    ) -> SyncResult<()> {
        self.record(
            "ensure_subnet_created",
            None,
            vec![s(tenant), s(network), gateway.to_string()],
        )
    }

    async fn ensure_subnet_deleted(
        &self,
        tenant: &FabricName,
        network: &FabricName,
        gateway: &str,
    ) -> SyncResult<()> {
        self.record(
            "ensure_subnet_deleted",
            None,
            vec![s(tenant), s(network), gateway.to_string()],
        )
    }

    async fn ensure_path_created_for_port(
        &self,
        txn: Option<TransactionScope>,
        tenant: &FabricName,
        network: &FabricName,
        host: &str,
        encap: Option<u32>,
    ) -> SyncResult<()> {
        self.record(
            "ensure_path_created_for_port",
            txn,
            vec![
                s(tenant),
                s(network),
                host.to_string(),
                encap.map_or_else(|| "-".to_string(), |e| e.to_string()),
            ],
        )
    }

    async fn get_router_contract(&self, router: &FabricName) -> SyncResult<ContractId> {
        self.record("get_router_contract", None, vec![s(router)])?;
        Ok(ContractId::new(format!("contract-{}", router)))
    }

    async fn ensure_context_enforced(&self, txn: Option<TransactionScope>) -> SyncResult<()> {
        self.record("ensure_context_enforced", txn, vec![])
    }

    async fn ensure_external_routed_network_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record("ensure_external_routed_network_created", txn, vec![s(network)])
    }

    async fn ensure_logical_node_profile_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        switch: &str,
        module: &str,
        port: &str,
        encap: Option<&str>,
        address: &str,
    ) -> SyncResult<()> {
        self.record(
            "ensure_logical_node_profile_created",
            txn,
            vec![
                s(network),
                switch.to_string(),
                module.to_string(),
                port.to_string(),
                encap.unwrap_or("-").to_string(),
                address.to_string(),
            ],
        )
    }

    async fn ensure_static_route_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        switch: &str,
        next_hop: &str,
    ) -> SyncResult<()> {
        self.record(
            "ensure_static_route_created",
            txn,
            vec![s(network), switch.to_string(), next_hop.to_string()],
        )
    }

    async fn ensure_external_epg_created(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record("ensure_external_epg_created", txn, vec![s(network)])
    }

    async fn ensure_external_epg_consumed_contract(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        contract: &ContractId,
    ) -> SyncResult<()> {
        self.record(
            "ensure_external_epg_consumed_contract",
            txn,
            vec![s(network), contract.to_string()],
        )
    }

    async fn ensure_external_epg_provided_contract(
        &self,
        txn: Option<TransactionScope>,
        network: &FabricName,
        contract: &ContractId,
    ) -> SyncResult<()> {
        self.record(
            "ensure_external_epg_provided_contract",
            txn,
            vec![s(network), contract.to_string()],
        )
    }

    async fn delete_external_epg_contract(
        &self,
        router: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record("delete_external_epg_contract", None, vec![s(router), s(network)])
    }

    async fn delete_external_routed_network(&self, network: &FabricName) -> SyncResult<()> {
        self.record("delete_external_routed_network", None, vec![s(network)])
    }

    async fn add_router_interface(
        &self,
        tenant: &FabricName,
        router: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record(
            "add_router_interface",
            None,
            vec![s(tenant), s(router), s(network)],
        )
    }

    async fn remove_router_interface(
        &self,
        tenant: &FabricName,
        router: &FabricName,
        network: &FabricName,
    ) -> SyncResult<()> {
        self.record(
            "remove_router_interface",
            None,
            vec![s(tenant), s(router), s(network)],
        )
    }

    async fn delete_router(&self, router: &FabricName) -> SyncResult<()> {
        self.record("delete_router", None, vec![s(router)])
    }
}

/// In-memory orchestration store serving fixed entity snapshots.
#[derive(Default)]
pub(crate) struct StaticNetworkData {
    networks: Vec<LogicalNetwork>,
    subnets: Vec<LogicalSubnet>,
    ports: Vec<LogicalPort>,
    list_network_calls: AtomicUsize,
}

impl StaticNetworkData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_networks(mut self, networks: Vec<LogicalNetwork>) -> Self {
        self.networks = networks;
        self
    }

    pub fn with_subnets(mut self, subnets: Vec<LogicalSubnet>) -> Self {
        self.subnets = subnets;
        self
    }

    pub fn with_ports(mut self, ports: Vec<LogicalPort>) -> Self {
        self.ports = ports;
        self
    }

    /// Number of `list_networks` snapshots served; each full base resync
    /// pass takes exactly one.
    pub fn list_network_calls(&self) -> usize {
        self.list_network_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NetworkData for StaticNetworkData {
    async fn list_networks(&self) -> SyncResult<Vec<LogicalNetwork>> {
        self.list_network_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.networks.clone())
    }

    async fn list_subnets(&self) -> SyncResult<Vec<LogicalSubnet>> {
        Ok(self.subnets.clone())
    }

    async fn list_ports(&self) -> SyncResult<Vec<LogicalPort>> {
        Ok(self.ports.clone())
    }

    async fn get_network(&self, id: &str) -> SyncResult<LogicalNetwork> {
        self.networks
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| SyncError::not_found("network", id))
    }

    async fn get_subnet(&self, id: &str) -> SyncResult<LogicalSubnet> {
        self.subnets
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| SyncError::not_found("subnet", id))
    }

    async fn get_port(&self, id: &str) -> SyncResult<LogicalPort> {
        self.ports
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| SyncError::not_found("port", id))
    }
}

/// Recording logical-side router interface store.
#[derive(Default)]
pub(crate) struct RecordingStore {
    events: Mutex<Vec<String>>,
    fail_add: AtomicBool,
    fail_remove: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_add(&self) {
        self.fail_add.store(true, Ordering::SeqCst);
    }

    pub fn fail_remove(&self) {
        self.fail_remove.store(true, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

fn iface_key(interface: &InterfaceRef) -> String {
    match interface {
        InterfaceRef::Subnet(id) => format!("subnet/{}", id),
        InterfaceRef::Port(id) => format!("port/{}", id),
    }
}

#[async_trait]
impl RouterStore for RecordingStore {
    async fn add_interface(&self, router_id: &str, interface: &InterfaceRef) -> SyncResult<()> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(SyncError::store("add_interface", "injected failure"));
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("add:{}:{}", router_id, iface_key(interface)));
        Ok(())
    }

    async fn remove_interface(&self, router_id: &str, interface: &InterfaceRef) -> SyncResult<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(SyncError::store("remove_interface", "injected failure"));
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("remove:{}:{}", router_id, iface_key(interface)));
        Ok(())
    }
}

/// External-connectivity entry used across tests.
pub(crate) fn ext_net_config() -> ExternalNetworkConfig {
    ExternalNetworkConfig {
        cidr_exposed: "192.168.0.2/24".parse().unwrap(),
        gateway_ip: "192.168.0.1".parse().unwrap(),
        encap: Some("vlan-4000".to_string()),
        switch: "203".to_string(),
        port: "1/34".to_string(),
    }
}
