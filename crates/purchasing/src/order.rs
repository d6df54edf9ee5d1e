use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use snerp_core::{
    AggregateId, AggregateRoot, DomainError, DomainEvents, DomainResult, Money, SkuId, Snapshot,
    ValueObject,
};
use snerp_events::Event;

use crate::item::{PurchaseItem, PurchaseItemSnapshot};

/// Purchase order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseOrderId(pub AggregateId);

impl PurchaseOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PurchaseOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for PurchaseOrderId {}

/// Supplier reference (suppliers are managed outside this workspace).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupplierId(u64);

impl SupplierId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for SupplierId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SUP-{}", self.0)
    }
}

impl ValueObject for SupplierId {}

/// Purchase order status lifecycle.
///
/// `DRAFT → SUBMITTED → APPROVED → RECEIVING → COMPLETED`, with
/// `SUBMITTED → REJECTED` and `DRAFT → CANCELLED`. Each operation asserts the
/// status it needs; there is no central table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    Draft,
    Submitted,
    Approved,
    Receiving,
    Completed,
    Rejected,
    Cancelled,
}

impl PurchaseStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PurchaseStatus::Completed | PurchaseStatus::Rejected | PurchaseStatus::Cancelled
        )
    }
}

impl core::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            PurchaseStatus::Draft => "DRAFT",
            PurchaseStatus::Submitted => "SUBMITTED",
            PurchaseStatus::Approved => "APPROVED",
            PurchaseStatus::Receiving => "RECEIVING",
            PurchaseStatus::Completed => "COMPLETED",
            PurchaseStatus::Rejected => "REJECTED",
            PurchaseStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Event: PurchaseCompleted.
///
/// Downstream consumers create inventory records from the received serial
/// codes and post the supplier liability from the line prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCompletedEvent {
    pub order_id: PurchaseOrderId,
    pub supplier_id: SupplierId,
    pub items: Vec<PurchaseItemSnapshot>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseOrderEvent {
    PurchaseCompleted(PurchaseCompletedEvent),
}

impl Event for PurchaseOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PurchaseOrderEvent::PurchaseCompleted(_) => "purchasing.order.completed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PurchaseOrderEvent::PurchaseCompleted(e) => e.occurred_at,
        }
    }

    fn aggregate_id(&self) -> String {
        match self {
            PurchaseOrderEvent::PurchaseCompleted(e) => e.order_id.to_string(),
        }
    }
}

/// Aggregate root: PurchaseOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    supplier_id: SupplierId,
    status: PurchaseStatus,
    items: Vec<PurchaseItem>,
    total_amount: Money,
    remark: Option<String>,
    version: u64,
    events: DomainEvents<PurchaseOrderEvent>,
}

impl PurchaseOrder {
    /// Factory: open a new, empty draft for a supplier.
    pub fn create_draft(supplier_id: SupplierId, remark: Option<String>) -> Self {
        Self {
            id: PurchaseOrderId::new(AggregateId::new()),
            supplier_id,
            status: PurchaseStatus::Draft,
            items: Vec::new(),
            total_amount: Money::zero(),
            remark,
            version: 0,
            events: DomainEvents::new(),
        }
    }

    pub fn order_id(&self) -> PurchaseOrderId {
        self.id
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn status(&self) -> PurchaseStatus {
        self.status
    }

    /// Lines in the order they were added.
    pub fn items(&self) -> &[PurchaseItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    pub fn is_fully_received(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(PurchaseItem::is_fully_received)
    }

    pub fn add_item(&mut self, sku_id: SkuId, quantity: i64, unit_price: Money) -> DomainResult<()> {
        self.ensure_status(PurchaseStatus::Draft, "add items to")?;
        // receipts address a line by SKU, so each SKU gets exactly one line
        if self.items.iter().any(|i| i.sku_id() == sku_id) {
            return Err(DomainError::invariant(format!(
                "{sku_id} already has a line on this purchase order"
            )));
        }

        let item = PurchaseItem::new(sku_id, quantity, unit_price)?;
        let total = sum_line_totals(self.items.iter().chain(std::iter::once(&item)))?;

        self.items.push(item);
        self.total_amount = total;
        Ok(())
    }

    pub fn submit(&mut self) -> DomainResult<()> {
        self.ensure_status(PurchaseStatus::Draft, "submit")?;
        if self.items.is_empty() {
            return Err(DomainError::invariant(
                "cannot submit purchase order without lines",
            ));
        }
        self.status = PurchaseStatus::Submitted;
        Ok(())
    }

    pub fn approve(&mut self) -> DomainResult<()> {
        self.ensure_status(PurchaseStatus::Submitted, "approve")?;
        self.status = PurchaseStatus::Approved;
        Ok(())
    }

    /// Reject a submitted order; the reason replaces the remark.
    pub fn reject(&mut self, reason: impl Into<String>) -> DomainResult<()> {
        self.ensure_status(PurchaseStatus::Submitted, "reject")?;
        self.status = PurchaseStatus::Rejected;
        self.remark = Some(reason.into());
        Ok(())
    }

    /// Record one received unit against the line for `sku_id`.
    ///
    /// The first receipt on an approved order moves it to `RECEIVING`.
    pub fn receive_item(&mut self, sku_id: SkuId, sn_code: impl Into<String>) -> DomainResult<()> {
        if !matches!(
            self.status,
            PurchaseStatus::Approved | PurchaseStatus::Receiving
        ) {
            return Err(DomainError::invariant(format!(
                "cannot receive goods on a purchase order in status {}",
                self.status
            )));
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.sku_id() == sku_id)
            .ok_or_else(|| DomainError::not_found(format!("{sku_id} is not on this purchase order")))?;

        item.receive_sn(sn_code.into())?;

        if self.status == PurchaseStatus::Approved {
            self.status = PurchaseStatus::Receiving;
        }
        Ok(())
    }

    /// Close receiving and record a [`PurchaseCompletedEvent`].
    pub fn complete(&mut self) -> DomainResult<()> {
        self.ensure_status(PurchaseStatus::Receiving, "complete")?;
        self.status = PurchaseStatus::Completed;

        self.events
            .record(PurchaseOrderEvent::PurchaseCompleted(PurchaseCompletedEvent {
                order_id: self.id,
                supplier_id: self.supplier_id,
                items: self.items.iter().map(PurchaseItem::snapshot).collect(),
                occurred_at: Utc::now(),
            }));
        Ok(())
    }

    pub fn cancel(&mut self) -> DomainResult<()> {
        self.ensure_status(PurchaseStatus::Draft, "cancel")?;
        self.status = PurchaseStatus::Cancelled;
        Ok(())
    }

    fn ensure_status(&self, required: PurchaseStatus, action: &str) -> DomainResult<()> {
        if self.status != required {
            return Err(DomainError::invariant(format!(
                "can only {action} a {required} purchase order (current: {})",
                self.status
            )));
        }
        Ok(())
    }
}

/// Re-derive the order total from scratch.
fn sum_line_totals<'a>(mut items: impl Iterator<Item = &'a PurchaseItem>) -> DomainResult<Money> {
    items.try_fold(Money::zero(), |total, item| total.add(&item.line_total()?))
}

impl AggregateRoot for PurchaseOrder {
    type Id = PurchaseOrderId;
    type Event = PurchaseOrderEvent;

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

/// Full persisted state of a [`PurchaseOrder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderSnapshot {
    pub id: PurchaseOrderId,
    pub supplier_id: SupplierId,
    pub status: PurchaseStatus,
    pub items: Vec<PurchaseItemSnapshot>,
    pub total_amount: Money,
    pub remark: Option<String>,
}

impl Snapshot for PurchaseOrder {
    type Snapshot = PurchaseOrderSnapshot;

    fn snapshot(&self) -> Self::Snapshot {
        PurchaseOrderSnapshot {
            id: self.id,
            supplier_id: self.supplier_id,
            status: self.status,
            items: self.items.iter().map(PurchaseItem::snapshot).collect(),
            total_amount: self.total_amount,
            remark: self.remark.clone(),
        }
    }

    fn reconstruct(snapshot: Self::Snapshot, version: u64) -> Self {
        Self {
            id: snapshot.id,
            supplier_id: snapshot.supplier_id,
            status: snapshot.status,
            items: snapshot
                .items
                .into_iter()
                .map(PurchaseItem::from_snapshot)
                .collect(),
            total_amount: snapshot.total_amount,
            remark: snapshot.remark,
            version,
            events: DomainEvents::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn price(s: &str) -> Money {
        Money::of(s).unwrap()
    }

    fn draft() -> PurchaseOrder {
        PurchaseOrder::create_draft(SupplierId::new(77), Some("Q3 restock".to_string()))
    }

    fn approved_with_line(qty: i64) -> PurchaseOrder {
        let mut order = draft();
        order.add_item(SkuId::new(1), qty, price("10.00")).unwrap();
        order.submit().unwrap();
        order.approve().unwrap();
        order
    }

    fn assert_invariant(result: DomainResult<()>) {
        match result {
            Err(DomainError::InvariantViolation(_)) => {}
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn create_draft_starts_empty() {
        let order = draft();
        assert_eq!(order.status(), PurchaseStatus::Draft);
        assert_eq!(order.total_amount(), Money::zero());
        assert_eq!(order.remark(), Some("Q3 restock"));
        assert!(order.items().is_empty());
        assert_eq!(order.version(), 0);
    }

    #[test]
    fn total_is_unit_price_times_quantity() {
        let mut order = draft();
        order.add_item(SkuId::new(1), 3, price("10.00")).unwrap();
        order.add_item(SkuId::new(2), 1, price("5.00")).unwrap();

        assert_eq!(order.total_amount(), price("35.00"));
        let skus: Vec<_> = order.items().iter().map(|i| i.sku_id()).collect();
        assert_eq!(skus, vec![SkuId::new(1), SkuId::new(2)]);
    }

    #[test]
    fn invalid_line_leaves_order_untouched() {
        let mut order = draft();
        order.add_item(SkuId::new(1), 2, price("4.00")).unwrap();
        let before = order.clone();

        let err = order.add_item(SkuId::new(2), 0, price("1.00")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(order, before);
    }

    #[test]
    fn second_line_for_the_same_sku_is_rejected() {
        let mut order = draft();
        order.add_item(SkuId::new(1), 2, price("4.00")).unwrap();
        let before = order.clone();

        assert_invariant(order.add_item(SkuId::new(1), 1, price("3.00")));
        assert_eq!(order, before);
        assert_eq!(order.total_amount(), price("8.00"));
    }

    #[test]
    fn lines_can_only_be_added_to_drafts() {
        let mut order = draft();
        order.add_item(SkuId::new(1), 1, price("1.00")).unwrap();
        order.submit().unwrap();

        assert_invariant(order.add_item(SkuId::new(2), 1, price("1.00")));
        assert_eq!(order.items().len(), 1);
    }

    #[test]
    fn cannot_submit_without_lines() {
        let mut order = draft();
        assert_invariant(order.submit());
        assert_eq!(order.status(), PurchaseStatus::Draft);
    }

    #[test]
    fn approve_and_reject_require_submitted() {
        let mut order = draft();
        assert_invariant(order.approve());
        assert_invariant(order.reject("no"));

        order.add_item(SkuId::new(1), 1, price("1.00")).unwrap();
        order.submit().unwrap();
        order.reject("over budget").unwrap();

        assert_eq!(order.status(), PurchaseStatus::Rejected);
        assert_eq!(order.remark(), Some("over budget"));
        assert!(order.status().is_terminal());
    }

    #[test]
    fn cancel_only_from_draft() {
        let mut order = draft();
        order.cancel().unwrap();
        assert_eq!(order.status(), PurchaseStatus::Cancelled);
        assert_invariant(order.cancel());

        let mut approved = approved_with_line(1);
        assert_invariant(approved.cancel());
    }

    #[test]
    fn first_receipt_moves_to_receiving() {
        let mut order = approved_with_line(3);
        order.receive_item(SkuId::new(1), "SN-00001").unwrap();

        assert_eq!(order.status(), PurchaseStatus::Receiving);
        assert_eq!(order.items()[0].received_qty(), 1);
        assert_eq!(order.items()[0].received_sn_codes(), &["SN-00001"]);
    }

    #[test]
    fn over_receiving_a_line_fails() {
        let mut order = approved_with_line(3);
        for sn in ["SN-00001", "SN-00002", "SN-00003"] {
            order.receive_item(SkuId::new(1), sn).unwrap();
        }
        assert!(order.is_fully_received());

        assert_invariant(order.receive_item(SkuId::new(1), "SN-00004"));
        assert_eq!(order.items()[0].received_qty(), 3);
    }

    #[test]
    fn receiving_unknown_sku_is_not_found() {
        let mut order = approved_with_line(1);
        let err = order.receive_item(SkuId::new(99), "SN-00001").unwrap_err();
        assert!(matches!(err, DomainError::NotFound(msg) if msg.contains("SKU-99")));
        assert_eq!(order.status(), PurchaseStatus::Approved);
    }

    #[test]
    fn cannot_receive_before_approval() {
        let mut order = draft();
        order.add_item(SkuId::new(1), 1, price("1.00")).unwrap();
        assert_invariant(order.receive_item(SkuId::new(1), "SN-00001"));
        order.submit().unwrap();
        assert_invariant(order.receive_item(SkuId::new(1), "SN-00001"));
    }

    #[test]
    fn complete_records_event_with_line_snapshot() {
        let mut order = approved_with_line(2);
        assert_invariant(order.complete());

        order.receive_item(SkuId::new(1), "SN-00001").unwrap();
        order.receive_item(SkuId::new(1), "SN-00002").unwrap();
        order.complete().unwrap();

        assert_eq!(order.status(), PurchaseStatus::Completed);
        assert_eq!(order.domain_events().len(), 1);

        let PurchaseOrderEvent::PurchaseCompleted(e) = &order.domain_events()[0];
        assert_eq!(e.order_id, order.order_id());
        assert_eq!(e.supplier_id, SupplierId::new(77));
        assert_eq!(e.items.len(), 1);
        assert_eq!(e.items[0].received_sn_codes, vec!["SN-00001", "SN-00002"]);
        assert_eq!(e.items[0].unit_price, price("10.00"));
        assert_eq!(order.domain_events()[0].aggregate_id(), order.order_id().to_string());

        order.clear_domain_events();
        assert!(order.domain_events().is_empty());
        assert_invariant(order.complete());
        assert!(order.domain_events().is_empty());
    }

    #[test]
    fn reconstruct_restores_state_without_validation() {
        let mut order = approved_with_line(2);
        order.receive_item(SkuId::new(1), "SN-00001").unwrap();

        let mut snapshot = order.snapshot();
        // stored totals are trusted as-is
        snapshot.total_amount = price("999.00");

        let restored = PurchaseOrder::reconstruct(snapshot.clone(), 5);
        assert_eq!(restored.version(), 5);
        assert_eq!(restored.total_amount(), price("999.00"));
        assert_eq!(restored.items()[0].received_qty(), 1);
        assert_eq!(restored.snapshot(), snapshot);
        assert!(restored.domain_events().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the total equals the sum of price × quantity, regardless of line order.
        #[test]
        fn total_is_order_independent(
            lines in prop::collection::vec((1i64..1_000, 1i64..100_000), 1..12)
        ) {
            let mut forward = draft();
            let mut backward = draft();
            for (i, (qty, cents)) in lines.iter().enumerate() {
                let unit = Money::of(&format!("{}.{:02}", cents / 100, cents % 100)).unwrap();
                forward.add_item(SkuId::new(i as u64), *qty, unit).unwrap();
            }
            for (i, (qty, cents)) in lines.iter().enumerate().rev() {
                let unit = Money::of(&format!("{}.{:02}", cents / 100, cents % 100)).unwrap();
                backward.add_item(SkuId::new(i as u64), *qty, unit).unwrap();
            }

            let expected: i64 = lines.iter().map(|(qty, cents)| qty * cents).sum();
            let expected = Money::of(&format!("{}.{:02}", expected / 100, expected % 100)).unwrap();
            prop_assert_eq!(forward.total_amount(), expected);
            prop_assert_eq!(backward.total_amount(), expected);
        }
    }
}
