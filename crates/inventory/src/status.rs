//! Inventory status lifecycle and its transition table.

use serde::{Deserialize, Serialize};

/// Status of one serial-numbered unit.
///
/// ```text
/// PENDING_INSPECT → INSPECTING → IN_STOCK ⇄ LOCKED → SOLD
/// INSPECTING → NEED_REPAIR → REPAIRING → REPAIRED → INSPECTING
/// INSPECTING → SCRAPPED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    PendingInspect,
    Inspecting,
    InStock,
    NeedRepair,
    Repairing,
    Repaired,
    Locked,
    Sold,
    Scrapped,
}

impl InventoryStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [InventoryStatus; 9] = [
        InventoryStatus::PendingInspect,
        InventoryStatus::Inspecting,
        InventoryStatus::InStock,
        InventoryStatus::NeedRepair,
        InventoryStatus::Repairing,
        InventoryStatus::Repaired,
        InventoryStatus::Locked,
        InventoryStatus::Sold,
        InventoryStatus::Scrapped,
    ];

    /// Legal successor statuses.
    ///
    /// The match is exhaustive: a new status does not compile until its
    /// successors are decided here.
    pub fn allowed_transitions(self) -> &'static [InventoryStatus] {
        use InventoryStatus::*;
        match self {
            PendingInspect => &[Inspecting],
            Inspecting => &[InStock, NeedRepair, Scrapped],
            InStock => &[Locked],
            NeedRepair => &[Repairing],
            Repairing => &[Repaired],
            // re-inspection after repair
            Repaired => &[Inspecting],
            Locked => &[InStock, Sold],
            Sold | Scrapped => &[],
        }
    }

    pub fn can_transition_to(self, target: InventoryStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// `Sold` and `Scrapped` end an item's life.
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InventoryStatus::PendingInspect => "PENDING_INSPECT",
            InventoryStatus::Inspecting => "INSPECTING",
            InventoryStatus::InStock => "IN_STOCK",
            InventoryStatus::NeedRepair => "NEED_REPAIR",
            InventoryStatus::Repairing => "REPAIRING",
            InventoryStatus::Repaired => "REPAIRED",
            InventoryStatus::Locked => "LOCKED",
            InventoryStatus::Sold => "SOLD",
            InventoryStatus::Scrapped => "SCRAPPED",
        }
    }
}

impl core::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InventoryStatus::*;

    #[test]
    fn all_lists_each_status_once() {
        for (i, a) in InventoryStatus::ALL.iter().enumerate() {
            for b in &InventoryStatus::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn successors_never_leave_the_status_set() {
        for status in InventoryStatus::ALL {
            for next in status.allowed_transitions() {
                assert!(InventoryStatus::ALL.contains(next));
                assert_ne!(*next, status, "{status} must not loop onto itself");
            }
        }
    }

    #[test]
    fn only_sold_and_scrapped_are_terminal() {
        let terminal: Vec<_> = InventoryStatus::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![Sold, Scrapped]);
    }

    #[test]
    fn transition_table_matches_lifecycle() {
        assert!(PendingInspect.can_transition_to(Inspecting));
        assert!(!PendingInspect.can_transition_to(InStock));
        assert!(Inspecting.can_transition_to(Scrapped));
        assert!(Repaired.can_transition_to(Inspecting));
        assert!(!Repaired.can_transition_to(InStock));
        assert!(Locked.can_transition_to(InStock));
        assert!(Locked.can_transition_to(Sold));
        assert!(!InStock.can_transition_to(Sold));
    }

    #[test]
    fn serializes_in_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&PendingInspect).unwrap(), "\"PENDING_INSPECT\"");
        assert_eq!(PendingInspect.to_string(), "PENDING_INSPECT");
    }
}
