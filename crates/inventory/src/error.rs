//! Inventory-specific failures.

use thiserror::Error;

use snerp_core::DomainError;

use crate::ids::SnCode;
use crate::status::InventoryStatus;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A status change outside the transition table. A specialised
    /// illegal-state failure carrying the full context.
    #[error(
        "inventory item {sn_code} cannot move from {current} to {target} (allowed: {})",
        allowed_list(.current)
    )]
    InvalidStatusTransition {
        sn_code: SnCode,
        current: InventoryStatus,
        target: InventoryStatus,
    },
}

impl InventoryError {
    /// True for failures caused by the item's current state rather than by
    /// the caller's input.
    pub fn is_illegal_state(&self) -> bool {
        matches!(
            self,
            InventoryError::InvalidStatusTransition { .. }
                | InventoryError::Domain(DomainError::InvariantViolation(_))
        )
    }
}

impl From<InventoryError> for DomainError {
    fn from(value: InventoryError) -> Self {
        match value {
            InventoryError::Domain(e) => e,
            e @ InventoryError::InvalidStatusTransition { .. } => {
                DomainError::invariant(e.to_string())
            }
        }
    }
}

fn allowed_list(status: &InventoryStatus) -> String {
    let allowed = status.allowed_transitions();
    if allowed.is_empty() {
        return "none".to_string();
    }
    allowed
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_message_lists_allowed_targets() {
        let err = InventoryError::InvalidStatusTransition {
            sn_code: SnCode::of("SN12345").unwrap(),
            current: InventoryStatus::Inspecting,
            target: InventoryStatus::Sold,
        };
        assert_eq!(
            err.to_string(),
            "inventory item SN12345 cannot move from INSPECTING to SOLD (allowed: IN_STOCK, NEED_REPAIR, SCRAPPED)"
        );
        assert!(err.is_illegal_state());
    }

    #[test]
    fn transition_maps_to_invariant_violation() {
        let err = InventoryError::InvalidStatusTransition {
            sn_code: SnCode::of("SN12345").unwrap(),
            current: InventoryStatus::Sold,
            target: InventoryStatus::InStock,
        };
        match DomainError::from(err) {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("allowed: none")),
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn validation_is_not_illegal_state() {
        let err = InventoryError::from(DomainError::validation("bad"));
        assert!(!err.is_illegal_state());
    }
}
