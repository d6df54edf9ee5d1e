//! Inventory use cases.

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use snerp_core::{AggregateRoot, Money, Repository, SkuId};
use snerp_events::{EventBus, EventEnvelope};
use snerp_inventory::{
    InventoryError, InventoryItem, InventoryItemId, InventoryItemRepository, SnCode, SourceType,
    WarehouseId,
};

use super::{INVENTORY_ITEM_AGGREGATE_TYPE, execute, publish_pending};
use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Orchestrates [`InventoryItem`] use cases over a repository and a bus.
#[derive(Debug)]
pub struct InventoryService<R, B> {
    repo: R,
    bus: B,
    config: ServiceConfig,
}

impl<R, B> InventoryService<R, B> {
    pub fn new(repo: R, bus: B, config: ServiceConfig) -> Self {
        Self { repo, bus, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl<R, B> InventoryService<R, B>
where
    R: InventoryItemRepository,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Receive a new serial-numbered unit.
    ///
    /// Fails with [`ServiceError::DuplicateActiveSn`] while another record for
    /// the same serial number is neither sold nor scrapped.
    pub fn stock_in(
        &self,
        sn_code: &str,
        sku_id: SkuId,
        warehouse_id: WarehouseId,
        acquisition_cost: &str,
        source_type: SourceType,
        source_order_id: &str,
    ) -> Result<InventoryItemId, ServiceError> {
        let sn_code = SnCode::of(sn_code)?;
        let cost = Money::of(acquisition_cost)?;

        if self.repo.exists_active_by_sn_code(&sn_code)? {
            warn!(sn = %sn_code, "stock-in rejected: serial number already active");
            return Err(ServiceError::DuplicateActiveSn(sn_code));
        }

        let mut item = InventoryItem::stock_in(
            sn_code,
            sku_id,
            warehouse_id,
            cost,
            source_type,
            source_order_id,
        )?;
        self.repo.save(&item)?;
        publish_pending(&self.bus, INVENTORY_ITEM_AGGREGATE_TYPE, &mut item)?;

        info!(
            item_id = %item.id(),
            sn = %item.sn_code(),
            sku = %sku_id,
            warehouse_id = %warehouse_id,
            cost = %cost,
            ?source_type,
            "stocked in"
        );
        Ok(item.item_id())
    }

    pub fn find(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, ServiceError> {
        Ok(self.repo.find_by_id(&id)?)
    }

    pub fn find_active_by_sn_code(&self, sn_code: &str) -> Result<Option<InventoryItem>, ServiceError> {
        let sn_code = SnCode::of(sn_code)?;
        Ok(self.repo.find_active_by_sn_code(&sn_code)?)
    }

    pub fn start_inspection(&self, id: InventoryItemId) -> Result<(), ServiceError> {
        self.run(id, "inspection started", |item| item.start_inspection())
    }

    pub fn pass_inspection(&self, id: InventoryItemId) -> Result<(), ServiceError> {
        self.run(id, "inspection passed", |item| item.pass_inspection())
    }

    pub fn fail_inspection(&self, id: InventoryItemId) -> Result<(), ServiceError> {
        self.run(id, "inspection failed", |item| item.fail_inspection())
    }

    pub fn start_repair(&self, id: InventoryItemId) -> Result<(), ServiceError> {
        self.run(id, "repair started", |item| item.start_repair())
    }

    pub fn complete_repair(&self, id: InventoryItemId, repair_cost: &str) -> Result<(), ServiceError> {
        let repair_cost = Money::of(repair_cost)?;
        self.run(id, "repair completed", |item| item.complete_repair(repair_cost))
    }

    pub fn lock_for_order(&self, id: InventoryItemId, order_id: &str) -> Result<(), ServiceError> {
        self.run(id, "locked for order", |item| item.lock_for_order(order_id))
    }

    pub fn release_lock(&self, id: InventoryItemId) -> Result<(), ServiceError> {
        self.run(id, "lock released", |item| item.release_lock())
    }

    /// Ship a locked unit; publishes `inventory.item.stocked_out` once saved.
    pub fn confirm_stock_out(&self, id: InventoryItemId) -> Result<(), ServiceError> {
        self.run(id, "stocked out", |item| item.confirm_stock_out())
    }

    pub fn scrap(&self, id: InventoryItemId, reason: &str) -> Result<(), ServiceError> {
        self.run(id, "scrapped", |item| item.scrap(reason))
    }

    fn run(
        &self,
        id: InventoryItemId,
        outcome: &'static str,
        mut op: impl FnMut(&mut InventoryItem) -> Result<(), InventoryError>,
    ) -> Result<(), ServiceError> {
        let (sn_code, status) = execute(
            &self.repo,
            &self.bus,
            INVENTORY_ITEM_AGGREGATE_TYPE,
            &id,
            self.config.max_conflict_retries,
            |item: &mut InventoryItem| {
                op(item)?;
                Ok((item.sn_code().clone(), item.status()))
            },
        )?;

        info!(item_id = %id, sn = %sn_code, %status, "{outcome}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use snerp_core::AggregateId;
    use snerp_events::InMemoryEventBus;
    use snerp_inventory::InventoryStatus;

    use super::*;
    use crate::repository::InMemoryRepository;

    type Service = InventoryService<
        Arc<InMemoryRepository<InventoryItem>>,
        Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>,
    >;

    fn service() -> Service {
        InventoryService::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryEventBus::new()),
            ServiceConfig::default(),
        )
    }

    fn receive(svc: &Service, sn: &str) -> InventoryItemId {
        svc.stock_in(
            sn,
            SkuId::new(3),
            WarehouseId::new(AggregateId::new()),
            "80.00",
            SourceType::Purchase,
            "PO-3",
        )
        .unwrap()
    }

    #[test]
    fn stock_in_normalizes_and_persists() {
        let svc = service();
        let id = receive(&svc, "  sn-abc-01 ");

        let item = svc.find(id).unwrap().unwrap();
        assert_eq!(item.sn_code().as_str(), "SN-ABC-01");
        assert_eq!(item.status(), InventoryStatus::PendingInspect);
        assert_eq!(item.version(), 1);
    }

    #[test]
    fn duplicate_active_sn_is_rejected() {
        let svc = service();
        receive(&svc, "SN-DUP-01");

        let err = svc
            .stock_in(
                "sn-dup-01",
                SkuId::new(3),
                WarehouseId::new(AggregateId::new()),
                "10.00",
                SourceType::Recovery,
                "RC-1",
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateActiveSn(ref sn) if sn.as_str() == "SN-DUP-01"));
        assert_eq!(svc.repository().len(), 1);
    }

    #[test]
    fn scrapped_sn_can_be_received_again() {
        let svc = service();
        let first = receive(&svc, "SN-AGAIN-1");
        svc.start_inspection(first).unwrap();
        svc.scrap(first, "cracked housing").unwrap();

        let second = receive(&svc, "SN-AGAIN-1");
        assert_ne!(first, second);
        let active = svc.find_active_by_sn_code("SN-AGAIN-1").unwrap().unwrap();
        assert_eq!(active.item_id(), second);
    }

    #[test]
    fn invalid_input_fails_before_touching_storage() {
        let svc = service();
        let err = svc
            .stock_in(
                "SN!",
                SkuId::new(1),
                WarehouseId::new(AggregateId::new()),
                "10.00",
                SourceType::Purchase,
                "PO-1",
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(_)));
        assert!(svc.repository().is_empty());
    }

    #[test]
    fn unknown_item_is_not_found() {
        let svc = service();
        let err = svc
            .start_inspection(InventoryItemId::new(AggregateId::new()))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn illegal_transition_is_not_saved() {
        let svc = service();
        let id = receive(&svc, "SN-ILLEGAL");

        let err = svc.pass_inspection(id).unwrap_err();
        assert!(matches!(err, ServiceError::Inventory(InventoryError::InvalidStatusTransition { .. })));
        assert_eq!(svc.repository().stored_version(&id), Some(1));
    }

    #[test]
    fn repair_cycle_through_the_service() {
        let svc = service();
        let id = receive(&svc, "SN-REPAIR-1");
        svc.start_inspection(id).unwrap();
        svc.fail_inspection(id).unwrap();
        svc.start_repair(id).unwrap();
        svc.complete_repair(id, "19.99").unwrap();

        let item = svc.find(id).unwrap().unwrap();
        assert_eq!(item.status(), InventoryStatus::Repaired);
        assert_eq!(item.accumulated_cost(), Money::of("99.99").unwrap());
        assert_eq!(item.version(), 5);
    }
}
