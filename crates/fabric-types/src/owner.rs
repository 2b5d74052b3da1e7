//! Port device-owner discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Owner of a logical port, as reported by the orchestration system.
///
/// The owner string is the discriminant that selects reconciliation
/// behavior: compute and DHCP ports get a fabric path attachment, router
/// gateway ports get external connectivity wiring, router interface ports
/// are handled by the router synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceOwner {
    /// A compute instance port (`compute:*`).
    Compute(String),
    /// A router gateway port (`network:router_gateway`).
    RouterGateway,
    /// A DHCP agent port (`network:dhcp`).
    Dhcp,
    /// A router interface port (`network:router_interface`).
    RouterInterface,
    /// Any other owner string, preserved verbatim.
    Other(String),
}

const ROUTER_GATEWAY: &str = "network:router_gateway";
const DHCP: &str = "network:dhcp";
const ROUTER_INTERFACE: &str = "network:router_interface";
const COMPUTE_PREFIX: &str = "compute";

impl DeviceOwner {
    /// Parses an owner string. Never fails; unknown owners are preserved
    /// as [`DeviceOwner::Other`].
    pub fn parse(s: &str) -> Self {
        match s {
            ROUTER_GATEWAY => DeviceOwner::RouterGateway,
            DHCP => DeviceOwner::Dhcp,
            ROUTER_INTERFACE => DeviceOwner::RouterInterface,
            _ if s.starts_with(COMPUTE_PREFIX) => DeviceOwner::Compute(s.to_string()),
            _ => DeviceOwner::Other(s.to_string()),
        }
    }

    /// Returns the owner string as reported by the orchestration system.
    pub fn as_str(&self) -> &str {
        match self {
            DeviceOwner::Compute(s) => s,
            DeviceOwner::RouterGateway => ROUTER_GATEWAY,
            DeviceOwner::Dhcp => DHCP,
            DeviceOwner::RouterInterface => ROUTER_INTERFACE,
            DeviceOwner::Other(s) => s,
        }
    }

    /// Returns true for owners whose ports receive a fabric path
    /// attachment (compute instances and DHCP agents).
    pub fn is_path_attached(&self) -> bool {
        matches!(self, DeviceOwner::Compute(_) | DeviceOwner::Dhcp)
    }

    /// Returns true for router gateway ports.
    pub fn is_router_gateway(&self) -> bool {
        matches!(self, DeviceOwner::RouterGateway)
    }

    /// Returns true for router interface ports.
    pub fn is_router_interface(&self) -> bool {
        matches!(self, DeviceOwner::RouterInterface)
    }
}

impl From<String> for DeviceOwner {
    fn from(s: String) -> Self {
        DeviceOwner::parse(&s)
    }
}

impl From<&str> for DeviceOwner {
    fn from(s: &str) -> Self {
        DeviceOwner::parse(s)
    }
}

impl From<DeviceOwner> for String {
    fn from(owner: DeviceOwner) -> Self {
        owner.as_str().to_string()
    }
}

impl fmt::Display for DeviceOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
