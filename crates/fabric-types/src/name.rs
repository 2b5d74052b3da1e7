//! Fabric-native identifier derived from a logical ID.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fabric-side object name derived from a logical identifier.
///
/// Names are produced by the name mapper and must be a pure deterministic
/// function of the logical ID plus the configured naming policy, so that
/// the full-resync path and the incremental-event path always derive the
/// same fabric object from the same logical entity.
///
/// An absent logical ID maps to the empty name; callers branch on
/// [`FabricName::is_empty`] rather than handling a mapping error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FabricName(String);

impl FabricName {
    /// The empty sentinel returned for absent IDs.
    pub fn empty() -> Self {
        FabricName(String::new())
    }

    pub fn new(name: impl Into<String>) -> Self {
        FabricName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the absent-ID sentinel.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FabricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for FabricName {
    fn from(s: String) -> Self {
        FabricName(s)
    }
}

impl From<&str> for FabricName {
    fn from(s: &str) -> Self {
        FabricName(s.to_string())
    }
}
