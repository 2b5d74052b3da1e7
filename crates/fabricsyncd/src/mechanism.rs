//! Per-event fabric reconciliation.
//!
//! [`Reconciler`] translates one logical change into the fabric
//! operations that realize it. It holds no gate and no data-access
//! collaborator; the driver and the resync passes feed it entities and it
//! talks to the fabric through the injected [`FabricClient`]. Both the
//! incremental path and the full-resync path run through these methods,
//! which is what makes resync idempotent with live event handling.

use crate::client::FabricClient;
use crate::config::ExternalNetworkConfig;
use crate::name_mapper::NameMapper;
use fabric_sync_common::SyncResult;
use fabric_types::{LogicalNetwork, LogicalPort, LogicalSubnet};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

pub struct Reconciler {
    client: Arc<dyn FabricClient>,
    mapper: NameMapper,
    /// External-connectivity table, keyed by logical network name.
    ext_networks: HashMap<String, ExternalNetworkConfig>,
}

impl Reconciler {
    pub fn new(
        client: Arc<dyn FabricClient>,
        mapper: NameMapper,
        ext_networks: HashMap<String, ExternalNetworkConfig>,
    ) -> Self {
        Self {
            client,
            mapper,
            ext_networks,
        }
    }

    pub fn mapper(&self) -> &NameMapper {
        &self.mapper
    }

    /// Replays the create side effect for a network.
    ///
    /// Externally-routed networks are provisioned via the gateway-port
    /// path instead and are skipped here.
    #[instrument(skip(self, network), fields(network = %network.id))]
    pub async fn create_network(&self, network: &LogicalNetwork) -> SyncResult<()> {
        if network.external {
            debug!("external network, provisioned via gateway port");
            return Ok(());
        }
        let tenant = self.mapper.tenant(&network.tenant_id);
        let net = self.mapper.network(&network.id);

        // BD before EPG: the EPG references the bridge domain.
        let txn = self.client.begin_transaction();
        self.client
            .ensure_bridge_domain_created(Some(txn), &tenant, &net)
            .await?;
        self.client
            .ensure_epg_created_for_network(Some(txn), &tenant, &net)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, network), fields(network = %network.id))]
    pub async fn delete_network(&self, network: &LogicalNetwork) -> SyncResult<()> {
        if !network.external {
            let tenant = self.mapper.tenant(&network.tenant_id);
            let net = self.mapper.network(&network.id);

            // Reverse of create: EPG first, it references the BD.
            let txn = self.client.begin_transaction();
            self.client
                .delete_epg_for_network(Some(txn), &tenant, &net)
                .await?;
            self.client.delete_bridge_domain(Some(txn), &tenant, &net).await?;
        } else if self.ext_networks.contains_key(&network.name) {
            let net = self.mapper.network(&network.id);
            self.client.delete_external_routed_network(&net).await?;
        }
        Ok(())
    }

    /// Replays the create side effect for a subnet: its gateway address
    /// on the owning network's bridge domain.
    ///
    /// Subnets on external networks have no fabric-side gateway object.
    #[instrument(skip(self, subnet, network), fields(subnet = %subnet.id))]
    pub async fn create_subnet(
        &self,
        subnet: &LogicalSubnet,
        network: &LogicalNetwork,
    ) -> SyncResult<()> {
        if network.external {
            debug!("subnet on external network, no gateway object");
            return Ok(());
        }
        let tenant = self.mapper.tenant(&subnet.tenant_id);
        let net = self.mapper.network(&subnet.network_id);
        self.client
            .ensure_subnet_created(&tenant, &net, &subnet.gateway_cidr())
            .await
    }

    #[instrument(skip(self, subnet, network), fields(subnet = %subnet.id))]
    pub async fn delete_subnet(
        &self,
        subnet: &LogicalSubnet,
        network: &LogicalNetwork,
    ) -> SyncResult<()> {
        if network.external {
            debug!("subnet on external network, no gateway object");
            return Ok(());
        }
        let tenant = self.mapper.tenant(&subnet.tenant_id);
        let net = self.mapper.network(&subnet.network_id);
        self.client
            .ensure_subnet_deleted(&tenant, &net, &subnet.gateway_cidr())
            .await
    }

    /// Dispatches a port create/update on its device owner.
    #[instrument(skip(self, port, network), fields(port = %port.id, owner = %port.device_owner))]
    pub async fn handle_port(
        &self,
        port: &LogicalPort,
        network: &LogicalNetwork,
    ) -> SyncResult<()> {
        if port.device_owner.is_path_attached() {
            self.path_port_operations(port).await
        } else if port.device_owner.is_router_gateway() {
            self.gateway_port_operations(port, network).await
        } else {
            debug!("no fabric operations for this device owner");
            Ok(())
        }
    }

    /// Ensures a static path exists for a compute/DHCP port's host.
    ///
    /// Ports are commonly created before binding completes; an unbound
    /// port is a no-op, picked up again once binding delivers an update.
    async fn path_port_operations(&self, port: &LogicalPort) -> SyncResult<()> {
        let Some(segment) = &port.bound_segment else {
            debug!("port is not bound to a segment");
            return Ok(());
        };
        let Some(host) = port.host_id.as_deref() else {
            debug!("port has no host assignment");
            return Ok(());
        };
        let encap = segment.vlan_encap();

        let tenant = self.mapper.tenant(&port.tenant_id);
        let net = self.mapper.network(&port.network_id);

        let txn = self.client.begin_transaction();
        self.client
            .ensure_path_created_for_port(Some(txn), &tenant, &net, host, encap)
            .await
    }

    /// Wires external connectivity for a router gateway port.
    ///
    /// The operations share one transaction scope: they are semantically a
    /// single unit of fabric configuration for one gateway attachment, and
    /// their order is significant.
    async fn gateway_port_operations(
        &self,
        port: &LogicalPort,
        network: &LogicalNetwork,
    ) -> SyncResult<()> {
        let Some(info) = self.ext_networks.get(&network.name) else {
            debug!(
                network = %network.name,
                "network not configured for external connectivity"
            );
            return Ok(());
        };
        if port.device_id.is_empty() {
            debug!("gateway port has no router assignment");
            return Ok(());
        }

        let net = self.mapper.network(&network.id);
        let router = self.mapper.router(&port.device_id);
        let (module, sport) = info.split_port()?;

        let txn = self.client.begin_transaction();
        let contract = self.client.get_router_contract(&router).await?;
        self.client.ensure_context_enforced(Some(txn)).await?;
        self.client
            .ensure_external_routed_network_created(Some(txn), &net)
            .await?;
        self.client
            .ensure_logical_node_profile_created(
                Some(txn),
                &net,
                &info.switch,
                module,
                sport,
                info.encap.as_deref(),
                &info.cidr_exposed.to_string(),
            )
            .await?;
        self.client
            .ensure_static_route_created(Some(txn), &net, &info.switch, &info.gateway_ip.to_string())
            .await?;
        self.client
            .ensure_external_epg_created(Some(txn), &net)
            .await?;
        // Both directions, or reachability is one-way.
        self.client
            .ensure_external_epg_consumed_contract(Some(txn), &net, &contract)
            .await?;
        self.client
            .ensure_external_epg_provided_contract(Some(txn), &net, &contract)
            .await?;
        Ok(())
    }

    /// Handles a port delete: gateway ports lose their external EPG
    /// contract association.
    ///
    /// Only the contract link is removed here; the external routed
    /// network object itself is torn down when the external network is
    /// deleted.
    #[instrument(skip(self, port, network), fields(port = %port.id))]
    pub async fn delete_port(
        &self,
        port: &LogicalPort,
        network: &LogicalNetwork,
    ) -> SyncResult<()> {
        if !port.device_owner.is_router_gateway() {
            return Ok(());
        }
        let net = self.mapper.network(&network.id);
        let router = self.mapper.router(&port.device_id);
        self.client.delete_external_epg_contract(&router, &net).await
    }

    // Router fabric operations, shared by the router service and the
    // router resync pass.

    #[instrument(skip(self))]
    pub async fn add_router_interface(
        &self,
        tenant_id: &str,
        router_id: &str,
        network_id: &str,
    ) -> SyncResult<()> {
        let tenant = self.mapper.tenant(tenant_id);
        let router = self.mapper.router(router_id);
        let net = self.mapper.network(network_id);
        self.client.add_router_interface(&tenant, &router, &net).await
    }

    #[instrument(skip(self))]
    pub async fn remove_router_interface(
        &self,
        tenant_id: &str,
        router_id: &str,
        network_id: &str,
    ) -> SyncResult<()> {
        let tenant = self.mapper.tenant(tenant_id);
        let router = self.mapper.router(router_id);
        let net = self.mapper.network(network_id);
        self.client
            .remove_router_interface(&tenant, &router, &net)
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_router(&self, router_id: &str) -> SyncResult<()> {
        let router = self.mapper.router(router_id);
        self.client.delete_router(&router).await
    }
}
