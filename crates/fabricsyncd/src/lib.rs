//! fabricsyncd - Fabric synchronization daemon
//!
//! Keeps a network fabric controller consistent with the logical
//! networks, subnets, ports, and routers managed by an orchestration
//! system:
//! - Incremental reconciliation of each committed logical change via the
//!   [`MechanismDriver`] postcommit hooks and the [`RouterService`]
//! - Interval-driven full resync ([`BaseSynchronizer`] /
//!   [`RouterSynchronizer`]) catching the fabric up after missed events,
//!   restarts, or drift
//! - Deterministic logical-ID → fabric-name translation ([`NameMapper`])
//!
//! The fabric controller and the orchestration store are injected
//! collaborators ([`FabricClient`], [`NetworkData`], [`RouterStore`]).

pub mod client;
pub mod config;
pub mod data;
pub mod driver;
pub mod l3;
pub mod mechanism;
pub mod name_mapper;
pub mod resync;

#[cfg(test)]
pub(crate) mod testutil;

pub use client::{ContractId, FabricClient, TransactionScope};
pub use config::{ExternalNetworkConfig, SyncConfig};
pub use data::{InterfaceRef, NetworkData, RouterStore};
pub use driver::{MechanismDriver, NetworkContext, PortContext, SubnetContext};
pub use l3::RouterService;
pub use mechanism::Reconciler;
pub use name_mapper::{NameMapper, NamingPolicy};
pub use resync::{BaseSynchronizer, RouterSynchronizer};
