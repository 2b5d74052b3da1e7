//! Logical network entities owned by the orchestration system.
//!
//! These are read-only snapshots delivered to the reconciler by the
//! orchestration framework's postcommit hooks and list queries. Lifecycle
//! is external; the reconciler only translates them into fabric
//! operations.

use crate::{BoundSegment, DeviceOwner, IpPrefix};
use serde::{Deserialize, Serialize};

/// A logical network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalNetwork {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    /// Externally-routed networks are provisioned via the gateway-port
    /// path instead of the bridge-domain/EPG path.
    #[serde(default)]
    pub external: bool,
}

impl LogicalNetwork {
    pub fn new(
        id: impl Into<String>,
        tenant_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            external: false,
        }
    }

    pub fn external(mut self) -> Self {
        self.external = true;
        self
    }
}

/// A logical subnet on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSubnet {
    pub id: String,
    pub network_id: String,
    pub tenant_id: String,
    pub cidr: IpPrefix,
    pub gateway_ip: String,
}

impl LogicalSubnet {
    pub fn new(
        id: impl Into<String>,
        network_id: impl Into<String>,
        tenant_id: impl Into<String>,
        cidr: IpPrefix,
        gateway_ip: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            network_id: network_id.into(),
            tenant_id: tenant_id.into(),
            cidr,
            gateway_ip: gateway_ip.into(),
        }
    }

    /// Gateway address in `address/prefix_len` form, as programmed on the
    /// network's bridge domain.
    pub fn gateway_cidr(&self) -> String {
        format!("{}/{}", self.gateway_ip, self.cidr.prefix_len())
    }
}

/// A logical port on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalPort {
    pub id: String,
    pub network_id: String,
    pub tenant_id: String,
    pub device_owner: DeviceOwner,
    /// Owning device: instance ID for compute ports, router ID for
    /// gateway and interface ports.
    pub device_id: String,
    /// Host the port is scheduled on, once known.
    #[serde(default)]
    pub host_id: Option<String>,
    /// Segment binding, absent until port binding completes.
    #[serde(default)]
    pub bound_segment: Option<BoundSegment>,
}

impl LogicalPort {
    pub fn new(
        id: impl Into<String>,
        network_id: impl Into<String>,
        tenant_id: impl Into<String>,
        device_owner: DeviceOwner,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            network_id: network_id.into(),
            tenant_id: tenant_id.into(),
            device_owner,
            device_id: device_id.into(),
            host_id: None,
            bound_segment: None,
        }
    }

    pub fn on_host(mut self, host: impl Into<String>) -> Self {
        self.host_id = Some(host.into());
        self
    }

    pub fn bound_to(mut self, segment: BoundSegment) -> Self {
        self.bound_segment = Some(segment);
        self
    }
}
