//! Error types for synchronization operations.
//!
//! All errors implement `std::error::Error` via `thiserror`.

use thiserror::Error;

/// Result type alias for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during reconciliation.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// A fabric operation failed (network, auth, or controller error).
    #[error("Fabric operation failed: {operation}: {message}")]
    Fabric {
        /// The operation that failed (e.g., "ensure_bridge_domain_created").
        operation: String,
        /// Error message from the fabric client.
        message: String,
    },

    /// A logical-store (persistence) operation failed.
    #[error("Store operation failed: {operation}: {message}")]
    Store {
        /// The operation that failed (e.g., "add_interface").
        operation: String,
        /// Error message.
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    Config {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// A logical entity could not be found in the orchestration store.
    #[error("{kind} '{id}' not found")]
    EntityNotFound {
        /// The entity kind (e.g., "network", "port").
        kind: String,
        /// The logical ID.
        id: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl SyncError {
    /// Creates a fabric operation error.
    pub fn fabric(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fabric {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a store operation error.
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an entity-not-found error.
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::EntityNotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition that the
    /// next periodic resync pass may heal.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Fabric { .. } | SyncError::Store { .. } | SyncError::EntityNotFound { .. }
        )
    }
}
