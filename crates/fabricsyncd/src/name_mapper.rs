//! Logical-ID to fabric-name translation.
//!
//! Every fabric-side object name is derived here, on both the full-resync
//! path and the incremental-event path, so the same logical entity always
//! resolves to the same fabric object. The mapping is a pure function of
//! the logical ID and the configured naming policy; results are memoized
//! in a concurrent cache.

use dashmap::DashMap;
use fabric_types::FabricName;
use serde::{Deserialize, Serialize};

/// How fabric names are derived from logical IDs.
///
/// Both policies are stable across calls and restarts; the choice only
/// affects readability of fabric-side object names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    /// The logical ID verbatim.
    #[default]
    Uuid,
    /// The logical ID prefixed with its namespace tag (e.g. `net-<id>`),
    /// keeping tenant/network/subnet/router names disjoint on the fabric.
    Qualified,
}

/// Identifier namespaces mapped independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Namespace {
    Tenant,
    Network,
    Subnet,
    Router,
}

impl Namespace {
    fn tag(&self) -> &'static str {
        match self {
            Namespace::Tenant => "tnt",
            Namespace::Network => "net",
            Namespace::Subnet => "snet",
            Namespace::Router => "rtr",
        }
    }
}

/// Deterministic, memoized translation from logical identifiers to
/// fabric-native names.
///
/// Never fails for a well-formed ID. An empty ID yields the empty
/// [`FabricName`] sentinel rather than an error, since callers branch on
/// "was an ID supplied" (e.g. the optional subnet ID when mapping router
/// interfaces).
#[derive(Debug)]
pub struct NameMapper {
    policy: NamingPolicy,
    cache: DashMap<(Namespace, String), FabricName>,
}

impl NameMapper {
    pub fn new(policy: NamingPolicy) -> Self {
        Self {
            policy,
            cache: DashMap::new(),
        }
    }

    pub fn policy(&self) -> NamingPolicy {
        self.policy
    }

    pub fn tenant(&self, id: &str) -> FabricName {
        self.map(Namespace::Tenant, id)
    }

    pub fn network(&self, id: &str) -> FabricName {
        self.map(Namespace::Network, id)
    }

    pub fn subnet(&self, id: &str) -> FabricName {
        self.map(Namespace::Subnet, id)
    }

    pub fn router(&self, id: &str) -> FabricName {
        self.map(Namespace::Router, id)
    }

    fn map(&self, ns: Namespace, id: &str) -> FabricName {
        if id.is_empty() {
            return FabricName::empty();
        }
        if let Some(name) = self.cache.get(&(ns, id.to_string())) {
            return name.clone();
        }
        let name = match self.policy {
            NamingPolicy::Uuid => FabricName::new(id),
            NamingPolicy::Qualified => FabricName::new(format!("{}-{}", ns.tag(), id)),
        };
        self.cache.insert((ns, id.to_string()), name.clone());
        name
    }
}
