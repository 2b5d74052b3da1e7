//! Router service reconciliation.
//!
//! Mirrors router-interface changes between the logical store and the
//! fabric. The two sides commit in an order that never leaves the
//! logical model claiming less than the fabric has: attach commits the
//! logical side first and rolls it back if the fabric refuses; detach
//! removes the fabric side first.

use crate::data::{InterfaceRef, NetworkData, RouterStore};
use crate::mechanism::Reconciler;
use crate::resync::RouterSynchronizer;
use fabric_sync_common::{SyncHandle, SyncResult};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Router-interface and router lifecycle reconciliation, composed from
/// the pure reconciler and an injected persistence collaborator.
pub struct RouterService {
    reconciler: Arc<Reconciler>,
    data: Arc<dyn NetworkData>,
    store: Arc<dyn RouterStore>,
    sync_interval: i64,
    synced: bool,
    sync_handle: Option<SyncHandle>,
}

impl RouterService {
    pub fn new(
        reconciler: Arc<Reconciler>,
        data: Arc<dyn NetworkData>,
        store: Arc<dyn RouterStore>,
        sync_interval: i64,
    ) -> Self {
        Self {
            reconciler,
            data,
            store,
            sync_interval,
            synced: false,
            sync_handle: None,
        }
    }

    /// True once the sync-once gate has fired.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Handle of the periodic router-resync loop, when one is running.
    pub fn sync_handle(&self) -> Option<&SyncHandle> {
        self.sync_handle.as_ref()
    }

    /// Lazy-initialization gate: the first router operation runs a full
    /// router-interface resync per the configured interval mode.
    async fn ensure_synced(&mut self) {
        if self.synced {
            return;
        }
        self.synced = true;
        debug!("first router operation after start, running router resync");
        let synchronizer = RouterSynchronizer::new(
            self.reconciler.clone(),
            self.data.clone(),
            self.sync_interval,
        );
        self.sync_handle = synchronizer.sync_router().await;
    }

    /// Resolves the tenant and network an interface reference belongs to.
    async fn resolve_interface(&self, interface: &InterfaceRef) -> SyncResult<(String, String)> {
        match interface {
            InterfaceRef::Subnet(id) => {
                let subnet = self.data.get_subnet(id).await?;
                Ok((subnet.tenant_id, subnet.network_id))
            }
            InterfaceRef::Port(id) => {
                let port = self.data.get_port(id).await?;
                Ok((port.tenant_id, port.network_id))
            }
        }
    }

    /// Attaches a router interface: logical commit first, then the
    /// fabric. A fabric-side failure rolls the logical interface back
    /// and re-raises the original error.
    #[instrument(skip(self))]
    pub async fn add_router_interface(
        &mut self,
        router_id: &str,
        interface: &InterfaceRef,
    ) -> SyncResult<()> {
        self.ensure_synced().await;

        self.store.add_interface(router_id, interface).await?;

        let fabric_result = match self.resolve_interface(interface).await {
            Ok((tenant_id, network_id)) => {
                self.reconciler
                    .add_router_interface(&tenant_id, router_id, &network_id)
                    .await
            }
            Err(e) => Err(e),
        };

        if let Err(err) = fabric_result {
            if let Err(rollback_err) = self.store.remove_interface(router_id, interface).await {
                warn!(
                    router = router_id,
                    error = %rollback_err,
                    "rollback of logical interface failed"
                );
            }
            return Err(err);
        }
        Ok(())
    }

    /// Detaches a router interface: fabric removal first, so there is no
    /// window where the logical model says "removed" while the fabric
    /// still holds the association.
    #[instrument(skip(self))]
    pub async fn remove_router_interface(
        &mut self,
        router_id: &str,
        interface: &InterfaceRef,
    ) -> SyncResult<()> {
        self.ensure_synced().await;

        let (tenant_id, network_id) = self.resolve_interface(interface).await?;
        self.reconciler
            .remove_router_interface(&tenant_id, router_id, &network_id)
            .await?;
        self.store.remove_interface(router_id, interface).await
    }

    /// Deletes the router object from the fabric after the logical
    /// router is deleted.
    #[instrument(skip(self))]
    pub async fn delete_router_postcommit(&mut self, router_id: &str) -> SyncResult<()> {
        self.ensure_synced().await;
        self.reconciler.delete_router(router_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FabricClient;
    use crate::name_mapper::{NameMapper, NamingPolicy};
    use crate::testutil::{RecordingClient, RecordingStore, StaticNetworkData};
    use fabric_types::{DeviceOwner, LogicalPort, LogicalSubnet};
    use std::collections::HashMap;

    struct Fixture {
        client: Arc<RecordingClient>,
        store: Arc<RecordingStore>,
        service: RouterService,
    }

    fn fixture(interval: i64) -> Fixture {
        let client = RecordingClient::new();
        let store = RecordingStore::new();
        let data = Arc::new(
            StaticNetworkData::new()
                .with_subnets(vec![LogicalSubnet::new(
                    "s1",
                    "n1",
                    "t1",
                    "10.0.0.0/24".parse().unwrap(),
                    "10.0.0.1",
                )])
                .with_ports(vec![LogicalPort::new(
                    "p1",
                    "n2",
                    "t2",
                    DeviceOwner::RouterInterface,
                    "r1",
                )]),
        );
        let reconciler = Reconciler::new(
            client.clone() as Arc<dyn FabricClient>,
            NameMapper::new(NamingPolicy::Uuid),
            HashMap::new(),
        );
        let service = RouterService::new(
            Arc::new(reconciler),
            data,
            store.clone() as Arc<dyn RouterStore>,
            interval,
        );
        Fixture {
            client,
            store,
            service,
        }
    }

    #[tokio::test]
    async fn test_add_interface_by_subnet() {
        let mut f = fixture(-1);

        f.service
            .add_router_interface("r1", &InterfaceRef::subnet("s1"))
            .await
            .unwrap();

        assert_eq!(f.store.events(), vec!["add:r1:subnet/s1"]);
        let calls = f.client.calls();
        assert_eq!(f.client.ops(), vec!["add_router_interface"]);
        assert_eq!(calls[0].args, vec!["t1", "r1", "n1"]);
    }

    #[tokio::test]
    async fn test_add_interface_by_port() {
        let mut f = fixture(-1);

        f.service
            .add_router_interface("r1", &InterfaceRef::port("p1"))
            .await
            .unwrap();

        let calls = f.client.calls();
        assert_eq!(calls[0].args, vec!["t2", "r1", "n2"]);
    }

    #[tokio::test]
    async fn test_add_interface_rolls_back_on_fabric_failure() {
        let mut f = fixture(-1);
        f.client.fail_on("add_router_interface");

        let err = f
            .service
            .add_router_interface("r1", &InterfaceRef::subnet("s1"))
            .await
            .unwrap_err();

        // Original fabric error propagates...
        assert!(err.to_string().contains("add_router_interface"));
        // ...and the logical interface was rolled back.
        assert_eq!(
            f.store.events(),
            vec!["add:r1:subnet/s1", "remove:r1:subnet/s1"]
        );
    }

    #[tokio::test]
    async fn test_add_interface_rollback_failure_keeps_original_error() {
        let mut f = fixture(-1);
        f.client.fail_on("add_router_interface");
        f.store.fail_remove();

        let err = f
            .service
            .add_router_interface("r1", &InterfaceRef::subnet("s1"))
            .await
            .unwrap_err();

        // The fabric error is reported, not the rollback failure.
        assert!(err.to_string().contains("Fabric operation failed"));
    }

    #[tokio::test]
    async fn test_add_interface_unknown_subnet_rolls_back() {
        let mut f = fixture(-1);

        let err = f
            .service
            .add_router_interface("r1", &InterfaceRef::subnet("gone"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("subnet 'gone' not found"));
        assert_eq!(
            f.store.events(),
            vec!["add:r1:subnet/gone", "remove:r1:subnet/gone"]
        );
        assert!(f.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_skips_fabric() {
        let mut f = fixture(-1);
        f.store.fail_add();

        let err = f
            .service
            .add_router_interface("r1", &InterfaceRef::subnet("s1"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Store operation failed"));
        assert!(f.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remove_interface_fabric_first() {
        let mut f = fixture(-1);

        f.service
            .remove_router_interface("r1", &InterfaceRef::subnet("s1"))
            .await
            .unwrap();

        assert_eq!(f.client.ops(), vec!["remove_router_interface"]);
        assert_eq!(f.store.events(), vec!["remove:r1:subnet/s1"]);
    }

    #[tokio::test]
    async fn test_remove_interface_keeps_logical_on_fabric_failure() {
        let mut f = fixture(-1);
        f.client.fail_on("remove_router_interface");

        let err = f
            .service
            .remove_router_interface("r1", &InterfaceRef::subnet("s1"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        // Fabric removal failed, so the logical interface stays.
        assert!(f.store.events().is_empty());
    }

    #[tokio::test]
    async fn test_delete_router_maps_id() {
        let mut f = fixture(-1);

        f.service.delete_router_postcommit("r1").await.unwrap();

        let calls = f.client.calls();
        assert_eq!(f.client.ops(), vec!["delete_router"]);
        assert_eq!(calls[0].args, vec!["r1"]);
    }

    #[tokio::test]
    async fn test_first_operation_runs_router_resync() {
        let mut f = fixture(0);
        assert!(!f.service.is_synced());

        f.service.delete_router_postcommit("r9").await.unwrap();

        assert!(f.service.is_synced());
        // The resync replayed the one router-interface port before the
        // event's own delete reached the fabric.
        assert_eq!(f.client.ops(), vec!["add_router_interface", "delete_router"]);

        f.service.delete_router_postcommit("r9").await.unwrap();
        // No further resync on the second operation.
        assert_eq!(
            f.client.ops(),
            vec!["add_router_interface", "delete_router", "delete_router"]
        );
    }
}
