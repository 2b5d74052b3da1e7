//! Port segment binding types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport type of a bound network segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NetworkType {
    Vlan,
    Vxlan,
    Flat,
    Other(String),
}

impl NetworkType {
    /// Parses a network-type string. Never fails; unknown types are
    /// preserved as [`NetworkType::Other`].
    pub fn parse(s: &str) -> Self {
        match s {
            "vlan" => NetworkType::Vlan,
            "vxlan" => NetworkType::Vxlan,
            "flat" => NetworkType::Flat,
            _ => NetworkType::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NetworkType::Vlan => "vlan",
            NetworkType::Vxlan => "vxlan",
            NetworkType::Flat => "flat",
            NetworkType::Other(s) => s,
        }
    }

    /// Returns true if segments of this type carry a VLAN encapsulation
    /// usable for static path attachment.
    pub fn is_vlan(&self) -> bool {
        matches!(self, NetworkType::Vlan)
    }
}

impl From<String> for NetworkType {
    fn from(s: String) -> Self {
        NetworkType::parse(&s)
    }
}

impl From<NetworkType> for String {
    fn from(t: NetworkType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Segment a port is bound to once host scheduling and segmentation
/// assignment have completed.
///
/// Ports are commonly created before binding completes; an unbound port
/// has no segment and is skipped by path attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundSegment {
    pub network_type: NetworkType,
    pub segmentation_id: u32,
}

impl BoundSegment {
    pub fn new(network_type: NetworkType, segmentation_id: u32) -> Self {
        Self {
            network_type,
            segmentation_id,
        }
    }

    /// Returns the VLAN encapsulation for this segment, if it is
    /// VLAN-typed. Non-VLAN segments have no static-path encap.
    pub fn vlan_encap(&self) -> Option<u32> {
        self.network_type
            .is_vlan()
            .then_some(self.segmentation_id)
    }
}
