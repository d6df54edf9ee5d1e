//! Purchase order use cases.

use serde_json::Value as JsonValue;
use tracing::info;

use snerp_core::{AggregateRoot, DomainResult, Money, Repository, SkuId};
use snerp_events::{EventBus, EventEnvelope};
use snerp_purchasing::{PurchaseOrder, PurchaseOrderId, PurchaseOrderRepository, SupplierId};

use super::{PURCHASE_ORDER_AGGREGATE_TYPE, execute, publish_pending};
use crate::config::ServiceConfig;
use crate::error::ServiceError;

/// Orchestrates [`PurchaseOrder`] use cases over a repository and a bus.
#[derive(Debug)]
pub struct PurchaseService<R, B> {
    repo: R,
    bus: B,
    config: ServiceConfig,
}

impl<R, B> PurchaseService<R, B> {
    pub fn new(repo: R, bus: B, config: ServiceConfig) -> Self {
        Self { repo, bus, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl<R, B> PurchaseService<R, B>
where
    R: PurchaseOrderRepository,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn create_draft(
        &self,
        supplier_id: SupplierId,
        remark: Option<String>,
    ) -> Result<PurchaseOrderId, ServiceError> {
        let mut order = PurchaseOrder::create_draft(supplier_id, remark);
        self.repo.save(&order)?;
        publish_pending(&self.bus, PURCHASE_ORDER_AGGREGATE_TYPE, &mut order)?;

        info!(order_id = %order.id(), supplier = %supplier_id, "purchase order drafted");
        Ok(order.order_id())
    }

    pub fn find(&self, id: PurchaseOrderId) -> Result<Option<PurchaseOrder>, ServiceError> {
        Ok(self.repo.find_by_id(&id)?)
    }

    /// Add a line and return the re-derived order total.
    pub fn add_item(
        &self,
        id: PurchaseOrderId,
        sku_id: SkuId,
        quantity: i64,
        unit_price: &str,
    ) -> Result<Money, ServiceError> {
        let unit_price = Money::of(unit_price)?;
        let total = self.run(id, "line added", |order| {
            order.add_item(sku_id, quantity, unit_price)
        })?;
        Ok(total)
    }

    pub fn submit(&self, id: PurchaseOrderId) -> Result<(), ServiceError> {
        self.run(id, "submitted", |order| order.submit()).map(drop)
    }

    pub fn approve(&self, id: PurchaseOrderId) -> Result<(), ServiceError> {
        self.run(id, "approved", |order| order.approve()).map(drop)
    }

    pub fn reject(&self, id: PurchaseOrderId, reason: &str) -> Result<(), ServiceError> {
        self.run(id, "rejected", |order| order.reject(reason)).map(drop)
    }

    pub fn receive_item(
        &self,
        id: PurchaseOrderId,
        sku_id: SkuId,
        sn_code: &str,
    ) -> Result<(), ServiceError> {
        self.run(id, "item received", |order| order.receive_item(sku_id, sn_code))
            .map(drop)
    }

    /// Close a fully received order; publishes `purchasing.order.completed`
    /// once saved.
    pub fn complete(&self, id: PurchaseOrderId) -> Result<(), ServiceError> {
        self.run(id, "completed", |order| order.complete()).map(drop)
    }

    pub fn cancel(&self, id: PurchaseOrderId) -> Result<(), ServiceError> {
        self.run(id, "cancelled", |order| order.cancel()).map(drop)
    }

    fn run(
        &self,
        id: PurchaseOrderId,
        outcome: &'static str,
        mut op: impl FnMut(&mut PurchaseOrder) -> DomainResult<()>,
    ) -> Result<Money, ServiceError> {
        let (status, total) = execute(
            &self.repo,
            &self.bus,
            PURCHASE_ORDER_AGGREGATE_TYPE,
            &id,
            self.config.max_conflict_retries,
            |order: &mut PurchaseOrder| {
                op(order)?;
                Ok((order.status(), order.total_amount()))
            },
        )?;

        info!(order_id = %id, %status, total = %total, "purchase order {outcome}");
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use snerp_core::DomainError;
    use snerp_events::InMemoryEventBus;
    use snerp_purchasing::PurchaseStatus;

    use super::*;
    use crate::repository::InMemoryRepository;

    type Service = PurchaseService<
        Arc<InMemoryRepository<PurchaseOrder>>,
        Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>,
    >;

    fn service() -> Service {
        PurchaseService::new(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryEventBus::new()),
            ServiceConfig::default(),
        )
    }

    #[test]
    fn add_item_returns_running_total() {
        let svc = service();
        let id = svc.create_draft(SupplierId::new(9), None).unwrap();

        assert_eq!(svc.add_item(id, SkuId::new(1), 2, "10.00").unwrap(), Money::of("20.00").unwrap());
        assert_eq!(svc.add_item(id, SkuId::new(2), 3, "5.00").unwrap(), Money::of("35.00").unwrap());

        let order = svc.find(id).unwrap().unwrap();
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.version(), 3);
    }

    #[test]
    fn bad_price_is_rejected_up_front() {
        let svc = service();
        let id = svc.create_draft(SupplierId::new(9), None).unwrap();
        let err = svc.add_item(id, SkuId::new(1), 1, "ten").unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
        assert_eq!(svc.repository().stored_version(&id), Some(1));
    }

    #[test]
    fn rejection_requires_submission() {
        let svc = service();
        let id = svc.create_draft(SupplierId::new(9), Some("urgent".to_string())).unwrap();
        svc.add_item(id, SkuId::new(1), 1, "1.00").unwrap();

        let err = svc.reject(id, "too expensive").unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvariantViolation(_))));

        svc.submit(id).unwrap();
        svc.reject(id, "too expensive").unwrap();
        assert_eq!(svc.find(id).unwrap().unwrap().status(), PurchaseStatus::Rejected);
    }

    #[test]
    fn draft_can_be_cancelled() {
        let svc = service();
        let id = svc.create_draft(SupplierId::new(9), None).unwrap();
        svc.cancel(id).unwrap();
        assert_eq!(svc.find(id).unwrap().unwrap().status(), PurchaseStatus::Cancelled);
        assert!(svc.submit(id).is_err());
    }
}
