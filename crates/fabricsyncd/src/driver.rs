//! Mechanism-driver postcommit surface.
//!
//! [`MechanismDriver`] is what the orchestration framework invokes after
//! each committed logical change. Every mutating entry point passes
//! through an explicit lazy-initialization gate: the first event after
//! process start runs a full base resync (per the configured interval
//! mode) before the triggering event is handled, so the fabric is caught
//! up to the orchestration system's state before incremental events are
//! trusted to be sufficient.

use crate::data::NetworkData;
use crate::mechanism::Reconciler;
use crate::resync::BaseSynchronizer;
use fabric_sync_common::{SyncHandle, SyncResult};
use fabric_types::{LogicalNetwork, LogicalPort, LogicalSubnet};
use std::sync::Arc;
use tracing::debug;

/// Read-only view of a network event: the committed state, plus the
/// pre-update state for update events.
#[derive(Debug, Clone)]
pub struct NetworkContext {
    pub current: LogicalNetwork,
    pub previous: Option<LogicalNetwork>,
}

impl NetworkContext {
    pub fn new(current: LogicalNetwork) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: LogicalNetwork) -> Self {
        self.previous = Some(previous);
        self
    }
}

/// Read-only view of a subnet event.
#[derive(Debug, Clone)]
pub struct SubnetContext {
    pub current: LogicalSubnet,
    pub previous: Option<LogicalSubnet>,
}

impl SubnetContext {
    pub fn new(current: LogicalSubnet) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: LogicalSubnet) -> Self {
        self.previous = Some(previous);
        self
    }
}

/// Read-only view of a port event.
#[derive(Debug, Clone)]
pub struct PortContext {
    pub current: LogicalPort,
    pub previous: Option<LogicalPort>,
}

impl PortContext {
    pub fn new(current: LogicalPort) -> Self {
        Self {
            current,
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: LogicalPort) -> Self {
        self.previous = Some(previous);
        self
    }
}

/// Event-driven reconciler with the lazy sync-once gate.
///
/// Events are handled strictly sequentially (`&mut self`); only the
/// periodic resync loop, if configured, runs concurrently on its own
/// task.
pub struct MechanismDriver {
    reconciler: Arc<Reconciler>,
    data: Arc<dyn NetworkData>,
    sync_interval: i64,
    synced: bool,
    sync_handle: Option<SyncHandle>,
}

impl MechanismDriver {
    pub fn new(
        reconciler: Arc<Reconciler>,
        data: Arc<dyn NetworkData>,
        sync_interval: i64,
    ) -> Self {
        Self {
            reconciler,
            data,
            sync_interval,
            synced: false,
            sync_handle: None,
        }
    }

    /// True once the sync-once gate has fired.
    pub fn is_synced(&self) -> bool {
        self.synced
    }

    /// Handle of the periodic resync loop, when one is running.
    pub fn sync_handle(&self) -> Option<&SyncHandle> {
        self.sync_handle.as_ref()
    }

    /// The lazy-initialization gate: on the first event, run the full
    /// base resync per the configured interval mode. Subsequent events
    /// skip the gate via the presence flag; the resync itself is not
    /// re-run.
    async fn ensure_synced(&mut self) {
        if self.synced {
            return;
        }
        self.synced = true;
        debug!("first event after start, running base resync");
        let synchronizer =
            BaseSynchronizer::new(self.reconciler.clone(), self.data.clone(), self.sync_interval);
        self.sync_handle = synchronizer.sync_base().await;
    }

    pub async fn create_network_postcommit(&mut self, ctx: &NetworkContext) -> SyncResult<()> {
        self.ensure_synced().await;
        self.reconciler.create_network(&ctx.current).await
    }

    pub async fn update_network_postcommit(&mut self, ctx: &NetworkContext) -> SyncResult<()> {
        self.ensure_synced().await;
        debug!(network = %ctx.current.id, "network update needs no fabric operations");
        Ok(())
    }

    pub async fn delete_network_postcommit(&mut self, ctx: &NetworkContext) -> SyncResult<()> {
        self.ensure_synced().await;
        self.reconciler.delete_network(&ctx.current).await
    }

    pub async fn create_subnet_postcommit(&mut self, ctx: &SubnetContext) -> SyncResult<()> {
        self.ensure_synced().await;
        let network = self.data.get_network(&ctx.current.network_id).await?;
        self.reconciler.create_subnet(&ctx.current, &network).await
    }

    pub async fn update_subnet_postcommit(&mut self, ctx: &SubnetContext) -> SyncResult<()> {
        self.ensure_synced().await;
        debug!(subnet = %ctx.current.id, "subnet update needs no fabric operations");
        Ok(())
    }

    pub async fn delete_subnet_postcommit(&mut self, ctx: &SubnetContext) -> SyncResult<()> {
        self.ensure_synced().await;
        let network = self.data.get_network(&ctx.current.network_id).await?;
        self.reconciler.delete_subnet(&ctx.current, &network).await
    }

    pub async fn create_port_postcommit(&mut self, ctx: &PortContext) -> SyncResult<()> {
        self.ensure_synced().await;
        let network = self.data.get_network(&ctx.current.network_id).await?;
        self.reconciler.handle_port(&ctx.current, &network).await
    }

    pub async fn update_port_postcommit(&mut self, ctx: &PortContext) -> SyncResult<()> {
        self.ensure_synced().await;
        if let Some(previous) = &ctx.previous {
            if previous.bound_segment != ctx.current.bound_segment {
                debug!(port = %ctx.current.id, "port segment binding changed");
            }
        }
        let network = self.data.get_network(&ctx.current.network_id).await?;
        self.reconciler.handle_port(&ctx.current, &network).await
    }

    pub async fn delete_port_postcommit(&mut self, ctx: &PortContext) -> SyncResult<()> {
        self.ensure_synced().await;
        let network = self.data.get_network(&ctx.current.network_id).await?;
        self.reconciler.delete_port(&ctx.current, &network).await
    }
}
