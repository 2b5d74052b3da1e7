//! Daemon configuration, read once at startup.

use crate::name_mapper::NamingPolicy;
use fabric_sync_common::{SyncError, SyncMode, SyncResult};
use fabric_types::IpPrefix;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

/// Static external-connectivity entry for one logical network, keyed by
/// network *name* in [`SyncConfig::external_networks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalNetworkConfig {
    /// Address exposed on the fabric's logical interface profile.
    pub cidr_exposed: IpPrefix,
    /// Next hop for the static default route.
    pub gateway_ip: IpAddr,
    /// Optional encapsulation for the interface profile.
    #[serde(default)]
    pub encap: Option<String>,
    /// Border switch the uplink is wired to.
    pub switch: String,
    /// Switch port in `module/sub-port` form.
    pub port: String,
}

impl ExternalNetworkConfig {
    /// Splits [`port`](Self::port) into its module and sub-port halves.
    pub fn split_port(&self) -> SyncResult<(&str, &str)> {
        self.port.split_once('/').ok_or_else(|| {
            SyncError::config(
                "port",
                format!("'{}' is not in module/sub-port form", self.port),
            )
        })
    }
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Full-resync interval in seconds: `0` syncs once on first use, a
    /// positive value syncs periodically, a negative value disables
    /// resync.
    #[serde(default)]
    pub sync_interval: i64,

    /// Fabric naming policy for the name mapper.
    #[serde(default)]
    pub name_mapping: NamingPolicy,

    /// External-connectivity table, keyed by logical network name.
    #[serde(default)]
    pub external_networks: HashMap<String, ExternalNetworkConfig>,
}

impl SyncConfig {
    /// Loads and validates configuration from a YAML file.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| SyncError::config("config", format!("{}: {}", path.display(), e)))?;
        let config: SyncConfig = serde_yaml::from_str(&text)
            .map_err(|e| SyncError::config("config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field constraints not expressible in serde.
    pub fn validate(&self) -> SyncResult<()> {
        for (name, ext) in &self.external_networks {
            ext.split_port().map_err(|_| {
                SyncError::config(
                    format!("external_networks.{}.port", name),
                    format!("'{}' is not in module/sub-port form", ext.port),
                )
            })?;
        }
        Ok(())
    }

    /// Resync firing mode selected by [`sync_interval`](Self::sync_interval).
    pub fn sync_mode(&self) -> SyncMode {
        SyncMode::from_interval(self.sync_interval)
    }
}
