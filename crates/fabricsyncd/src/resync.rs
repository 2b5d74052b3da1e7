//! Full resync passes.
//!
//! A resync replays every known logical entity's create side effect
//! against the fabric, relying on the client's idempotent `ensure_*`
//! operations to converge. It is the catch-up mechanism for missed
//! events, restarts, and fabric drift: best-effort, never aborting on a
//! single entity, with failures recorded and healed by the next periodic
//! pass.

use crate::data::NetworkData;
use crate::mechanism::Reconciler;
use fabric_sync_common::{EntityKind, SyncHandle, SyncReport, Synchronizer};
use std::sync::Arc;
use tracing::{info, warn};

/// Full network/subnet/port resync, driven by the interval engine.
pub struct BaseSynchronizer {
    reconciler: Arc<Reconciler>,
    data: Arc<dyn NetworkData>,
    engine: Synchronizer,
}

impl BaseSynchronizer {
    pub fn new(reconciler: Arc<Reconciler>, data: Arc<dyn NetworkData>, interval: i64) -> Self {
        Self {
            reconciler,
            data,
            engine: Synchronizer::from_interval(interval),
        }
    }

    /// Starts the base resync per the configured interval mode. Returns
    /// the loop handle when periodic.
    pub async fn sync_base(&self) -> Option<SyncHandle> {
        let reconciler = self.reconciler.clone();
        let data = self.data.clone();
        self.engine
            .sync(move || {
                let reconciler = reconciler.clone();
                let data = data.clone();
                async move {
                    let report = run_base_pass(&reconciler, data.as_ref()).await;
                    log_report("base", &report);
                }
            })
            .await
    }
}

/// Full router-interface resync, driven by the interval engine.
pub struct RouterSynchronizer {
    reconciler: Arc<Reconciler>,
    data: Arc<dyn NetworkData>,
    engine: Synchronizer,
}

impl RouterSynchronizer {
    pub fn new(reconciler: Arc<Reconciler>, data: Arc<dyn NetworkData>, interval: i64) -> Self {
        Self {
            reconciler,
            data,
            engine: Synchronizer::from_interval(interval),
        }
    }

    /// Starts the router resync per the configured interval mode.
    pub async fn sync_router(&self) -> Option<SyncHandle> {
        let reconciler = self.reconciler.clone();
        let data = self.data.clone();
        self.engine
            .sync(move || {
                let reconciler = reconciler.clone();
                let data = data.clone();
                async move {
                    let report = run_router_pass(&reconciler, data.as_ref()).await;
                    log_report("router", &report);
                }
            })
            .await
    }
}

/// One full base pass: networks, then subnets, then ports.
///
/// Each entity's replay is isolated; a failure is logged and recorded,
/// and the pass continues with the next entity. A failing list query is
/// recorded against the whole entity class and the pass continues with
/// the next class.
pub async fn run_base_pass(reconciler: &Reconciler, data: &dyn NetworkData) -> SyncReport {
    let mut report = SyncReport::new();

    match data.list_networks().await {
        Ok(networks) => {
            for network in networks {
                match reconciler.create_network(&network).await {
                    Ok(()) => report.record_ok(EntityKind::Network, &network.id),
                    Err(e) => {
                        warn!(network = %network.id, error = %e, "create network replay failed");
                        report.record_failed(EntityKind::Network, &network.id, e);
                    }
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "listing networks failed, skipping network resync");
            report.record_failed(EntityKind::Network, "*", e);
        }
    }

    match data.list_subnets().await {
        Ok(subnets) => {
            for subnet in subnets {
                let result = match data.get_network(&subnet.network_id).await {
                    Ok(network) => reconciler.create_subnet(&subnet, &network).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(()) => report.record_ok(EntityKind::Subnet, &subnet.id),
                    Err(e) => {
                        warn!(subnet = %subnet.id, error = %e, "create subnet replay failed");
                        report.record_failed(EntityKind::Subnet, &subnet.id, e);
                    }
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "listing subnets failed, skipping subnet resync");
            report.record_failed(EntityKind::Subnet, "*", e);
        }
    }

    match data.list_ports().await {
        Ok(ports) => {
            for port in ports {
                // Port reconciliation needs the owning network's context.
                let result = match data.get_network(&port.network_id).await {
                    Ok(network) => reconciler.handle_port(&port, &network).await,
                    Err(e) => Err(e),
                };
                match result {
                    Ok(()) => report.record_ok(EntityKind::Port, &port.id),
                    Err(e) => {
                        warn!(port = %port.id, error = %e, "create port replay failed");
                        report.record_failed(EntityKind::Port, &port.id, e);
                    }
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "listing ports failed, skipping port resync");
            report.record_failed(EntityKind::Port, "*", e);
        }
    }

    report
}

/// One full router pass: replays the add-interface fabric operation for
/// every router-interface port.
pub async fn run_router_pass(reconciler: &Reconciler, data: &dyn NetworkData) -> SyncReport {
    let mut report = SyncReport::new();

    match data.list_ports().await {
        Ok(ports) => {
            for port in ports {
                if !port.device_owner.is_router_interface() {
                    continue;
                }
                match reconciler
                    .add_router_interface(&port.tenant_id, &port.device_id, &port.network_id)
                    .await
                {
                    Ok(()) => report.record_ok(EntityKind::RouterInterface, &port.id),
                    Err(e) => {
                        warn!(
                            router = %port.device_id,
                            port = %port.id,
                            error = %e,
                            "add router interface replay failed"
                        );
                        report.record_failed(EntityKind::RouterInterface, &port.id, e);
                    }
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "listing ports failed, skipping router resync");
            report.record_failed(EntityKind::RouterInterface, "*", e);
        }
    }

    report
}

fn log_report(pass: &str, report: &SyncReport) {
    if report.is_clean() {
        info!(pass, entities = report.attempted(), "resync pass complete");
    } else {
        warn!(
            pass,
            entities = report.attempted(),
            failed = report.failed_count(),
            "resync pass complete with failures"
        );
    }
}
