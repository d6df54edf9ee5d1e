//! Errors surfaced by the application services.

use thiserror::Error;

use snerp_core::{DomainError, RepositoryError};
use snerp_inventory::{InventoryError, SnCode};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Another item with this serial number is still active.
    #[error("sn {0} already has an active inventory record")]
    DuplicateActiveSn(SnCode),

    /// Serializing an event for publication failed; state is already saved.
    #[error("event serialization failed: {0}")]
    Serialization(String),

    /// Publication failed after a successful save (at-least-once; retry may duplicate).
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl ServiceError {
    /// Only optimistic-lock conflicts are worth re-running.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Repository(RepositoryError::Conflict(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::Domain(DomainError::NotFound(_))
                | ServiceError::Inventory(InventoryError::Domain(DomainError::NotFound(_)))
        )
    }
}
