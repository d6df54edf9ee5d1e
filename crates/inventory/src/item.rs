use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snerp_core::{AggregateId, AggregateRoot, DomainError, DomainEvents, Money, SkuId, Snapshot};
use snerp_events::Event;

use crate::error::InventoryError;
use crate::ids::{InventoryItemId, SnCode, WarehouseId};
use crate::status::InventoryStatus;

/// How a unit entered the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Purchase,
    Recovery,
}

/// Event: StockOut.
///
/// The unit left the warehouse against a sales order. Carries the cost basis
/// finance needs to book cost of goods sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockOutEvent {
    pub sn_code: SnCode,
    pub sales_order_id: Option<String>,
    pub accumulated_cost: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    StockOut(StockOutEvent),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StockOut(_) => "inventory.item.stocked_out",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::StockOut(e) => e.occurred_at,
        }
    }

    fn aggregate_id(&self) -> String {
        match self {
            InventoryEvent::StockOut(e) => e.sn_code.to_string(),
        }
    }
}

/// Aggregate root: InventoryItem.
///
/// One serial-numbered unit. Invariants:
/// - every status change goes through one private transition gate
/// - `acquisition_cost` is fixed at stock-in, `accumulated_cost` only grows,
///   so `accumulated_cost >= acquisition_cost` always holds
/// - a failed operation leaves status, costs and buffered events untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    id: InventoryItemId,
    sn_code: SnCode,
    sku_id: SkuId,
    warehouse_id: WarehouseId,
    status: InventoryStatus,
    acquisition_cost: Money,
    accumulated_cost: Money,
    source_type: SourceType,
    source_order_id: String,
    locked_by_order_id: Option<String>,
    version: u64,
    events: DomainEvents<InventoryEvent>,
}

impl InventoryItem {
    /// Factory: receive a new unit into stock, pending inspection.
    ///
    /// Uniqueness of an active serial number is a cross-aggregate rule and must
    /// be checked by the caller (see `InventoryItemRepository::exists_active_by_sn_code`).
    pub fn stock_in(
        sn_code: SnCode,
        sku_id: SkuId,
        warehouse_id: WarehouseId,
        acquisition_cost: Money,
        source_type: SourceType,
        source_order_id: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        if !acquisition_cost.is_positive() {
            return Err(DomainError::validation("acquisition cost must be greater than zero").into());
        }

        Ok(Self {
            id: InventoryItemId::new(AggregateId::new()),
            sn_code,
            sku_id,
            warehouse_id,
            status: InventoryStatus::PendingInspect,
            acquisition_cost,
            accumulated_cost: acquisition_cost,
            source_type,
            source_order_id: source_order_id.into(),
            locked_by_order_id: None,
            version: 0,
            events: DomainEvents::new(),
        })
    }

    pub fn item_id(&self) -> InventoryItemId {
        self.id
    }

    pub fn sn_code(&self) -> &SnCode {
        &self.sn_code
    }

    pub fn sku_id(&self) -> SkuId {
        self.sku_id
    }

    pub fn warehouse_id(&self) -> WarehouseId {
        self.warehouse_id
    }

    pub fn status(&self) -> InventoryStatus {
        self.status
    }

    pub fn acquisition_cost(&self) -> Money {
        self.acquisition_cost
    }

    pub fn accumulated_cost(&self) -> Money {
        self.accumulated_cost
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn source_order_id(&self) -> &str {
        &self.source_order_id
    }

    pub fn locked_by_order_id(&self) -> Option<&str> {
        self.locked_by_order_id.as_deref()
    }

    /// Not sold and not scrapped.
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn start_inspection(&mut self) -> Result<(), InventoryError> {
        self.transition_to(InventoryStatus::Inspecting)
    }

    pub fn pass_inspection(&mut self) -> Result<(), InventoryError> {
        self.transition_to(InventoryStatus::InStock)
    }

    pub fn fail_inspection(&mut self) -> Result<(), InventoryError> {
        self.transition_to(InventoryStatus::NeedRepair)
    }

    pub fn start_repair(&mut self) -> Result<(), InventoryError> {
        self.transition_to(InventoryStatus::Repairing)
    }

    /// Finish a repair and add its cost to the unit's cost basis.
    pub fn complete_repair(&mut self, repair_cost: Money) -> Result<(), InventoryError> {
        if !repair_cost.is_positive() {
            return Err(DomainError::validation("repair cost must be greater than zero").into());
        }
        let accumulated = self.accumulated_cost.add(&repair_cost)?;

        self.transition_to(InventoryStatus::Repaired)?;
        self.accumulated_cost = accumulated;
        Ok(())
    }

    /// Reserve the unit for a sales order.
    pub fn lock_for_order(&mut self, order_id: &str) -> Result<(), InventoryError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(DomainError::validation("order id cannot be blank").into());
        }

        self.transition_to(InventoryStatus::Locked)?;
        self.locked_by_order_id = Some(order_id.to_string());
        Ok(())
    }

    pub fn release_lock(&mut self) -> Result<(), InventoryError> {
        self.transition_to(InventoryStatus::InStock)?;
        self.locked_by_order_id = None;
        Ok(())
    }

    /// Ship the locked unit and record a [`StockOutEvent`].
    pub fn confirm_stock_out(&mut self) -> Result<(), InventoryError> {
        self.transition_to(InventoryStatus::Sold)?;

        self.events.record(InventoryEvent::StockOut(StockOutEvent {
            sn_code: self.sn_code.clone(),
            sales_order_id: self.locked_by_order_id.clone(),
            accumulated_cost: self.accumulated_cost,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    pub fn scrap(&mut self, reason: &str) -> Result<(), InventoryError> {
        if reason.trim().is_empty() {
            return Err(DomainError::validation("scrap reason cannot be blank").into());
        }
        self.transition_to(InventoryStatus::Scrapped)
    }

    /// The single gate for status changes.
    fn transition_to(&mut self, target: InventoryStatus) -> Result<(), InventoryError> {
        if !self.status.can_transition_to(target) {
            return Err(InventoryError::InvalidStatusTransition {
                sn_code: self.sn_code.clone(),
                current: self.status,
                target,
            });
        }
        self.status = target;
        Ok(())
    }
}

impl AggregateRoot for InventoryItem {
    type Id = InventoryItemId;
    type Event = InventoryEvent;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn domain_events(&self) -> &[Self::Event] {
        self.events.as_slice()
    }

    fn clear_domain_events(&mut self) {
        self.events.clear();
    }
}

/// Full persisted state of an [`InventoryItem`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItemSnapshot {
    pub id: InventoryItemId,
    pub sn_code: SnCode,
    pub sku_id: SkuId,
    pub warehouse_id: WarehouseId,
    pub status: InventoryStatus,
    pub acquisition_cost: Money,
    pub accumulated_cost: Money,
    pub source_type: SourceType,
    pub source_order_id: String,
    pub locked_by_order_id: Option<String>,
}

impl Snapshot for InventoryItem {
    type Snapshot = InventoryItemSnapshot;

    fn snapshot(&self) -> Self::Snapshot {
        InventoryItemSnapshot {
            id: self.id,
            sn_code: self.sn_code.clone(),
            sku_id: self.sku_id,
            warehouse_id: self.warehouse_id,
            status: self.status,
            acquisition_cost: self.acquisition_cost,
            accumulated_cost: self.accumulated_cost,
            source_type: self.source_type,
            source_order_id: self.source_order_id.clone(),
            locked_by_order_id: self.locked_by_order_id.clone(),
        }
    }

    fn reconstruct(snapshot: Self::Snapshot, version: u64) -> Self {
        Self {
            id: snapshot.id,
            sn_code: snapshot.sn_code,
            sku_id: snapshot.sku_id,
            warehouse_id: snapshot.warehouse_id,
            status: snapshot.status,
            acquisition_cost: snapshot.acquisition_cost,
            accumulated_cost: snapshot.accumulated_cost,
            source_type: snapshot.source_type,
            source_order_id: snapshot.source_order_id,
            locked_by_order_id: snapshot.locked_by_order_id,
            version,
            events: DomainEvents::new(),
        }
    }
}
