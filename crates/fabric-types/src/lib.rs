//! Common domain types for fabric synchronization.
//!
//! This crate provides type-safe representations of the logical network
//! model the synchronization control plane reconciles against the fabric:
//!
//! - [`LogicalNetwork`], [`LogicalSubnet`], [`LogicalPort`]: entities owned
//!   by the orchestration system, read-only to the reconciler
//! - [`DeviceOwner`]: port-owner discriminant selecting reconciliation
//!   behavior
//! - [`BoundSegment`]: host/segmentation binding of a port
//! - [`FabricName`]: fabric-native identifier derived from a logical ID
//! - [`IpPrefix`]: IP network prefixes (CIDR notation)

mod entity;
mod ip;
mod name;
mod owner;
mod segment;

pub use entity::{LogicalNetwork, LogicalPort, LogicalSubnet};
pub use ip::IpPrefix;
pub use name::FabricName;
pub use owner::DeviceOwner;
pub use segment::{BoundSegment, NetworkType};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid prefix length: {0} (must be 0-128)")]
    InvalidPrefixLength(u8),
}
