//! Purchase order line, owned by [`PurchaseOrder`](crate::PurchaseOrder).

use serde::{Deserialize, Serialize};

use snerp_core::{DomainError, DomainResult, Entity, Money, SkuId};

/// One line of a purchase order.
///
/// Lines are not independently addressable: they are created and received
/// only through the owning order, so construction and mutation are
/// crate-private. Outside the crate a line is read-only.
///
/// Invariants: `quantity > 0` and fixed; `received_qty` only grows, never
/// exceeds `quantity`, and always equals the number of received serial codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseItem {
    sku_id: SkuId,
    quantity: i64,
    unit_price: Money,
    received_qty: i64,
    received_sn_codes: Vec<String>,
}

impl PurchaseItem {
    pub(crate) fn new(sku_id: SkuId, quantity: i64, unit_price: Money) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        Ok(Self {
            sku_id,
            quantity,
            unit_price,
            received_qty: 0,
            received_sn_codes: Vec::new(),
        })
    }

    pub(crate) fn receive_sn(&mut self, sn_code: String) -> DomainResult<()> {
        if self.is_fully_received() {
            return Err(DomainError::invariant(format!(
                "{} is fully received (ordered {}, received {})",
                self.sku_id, self.quantity, self.received_qty
            )));
        }
        self.received_sn_codes.push(sn_code);
        self.received_qty += 1;
        Ok(())
    }

    pub fn sku_id(&self) -> SkuId {
        self.sku_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn received_qty(&self) -> i64 {
        self.received_qty
    }

    pub fn received_sn_codes(&self) -> &[String] {
        &self.received_sn_codes
    }

    pub fn is_fully_received(&self) -> bool {
        self.received_qty >= self.quantity
    }

    /// `unit_price × quantity`.
    pub fn line_total(&self) -> DomainResult<Money> {
        self.unit_price.multiply(self.quantity)
    }

    pub fn snapshot(&self) -> PurchaseItemSnapshot {
        PurchaseItemSnapshot {
            sku_id: self.sku_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            received_qty: self.received_qty,
            received_sn_codes: self.received_sn_codes.clone(),
        }
    }

    pub(crate) fn from_snapshot(snapshot: PurchaseItemSnapshot) -> Self {
        Self {
            sku_id: snapshot.sku_id,
            quantity: snapshot.quantity,
            unit_price: snapshot.unit_price,
            received_qty: snapshot.received_qty,
            received_sn_codes: snapshot.received_sn_codes,
        }
    }
}

impl Entity for PurchaseItem {
    type Id = SkuId;

    fn id(&self) -> &Self::Id {
        &self.sku_id
    }
}

/// Immutable copy of a line, used for persistence and event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseItemSnapshot {
    pub sku_id: SkuId,
    pub quantity: i64,
    pub unit_price: Money,
    pub received_qty: i64,
    pub received_sn_codes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Money {
        Money::of(s).unwrap()
    }

    #[test]
    fn new_line_starts_unreceived() {
        let item = PurchaseItem::new(SkuId::new(1), 3, price("10.00")).unwrap();
        assert_eq!(item.received_qty(), 0);
        assert!(item.received_sn_codes().is_empty());
        assert!(!item.is_fully_received());
        assert_eq!(item.line_total().unwrap(), price("30.00"));
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        for qty in [0, -1] {
            let err = PurchaseItem::new(SkuId::new(1), qty, price("1.00")).unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[test]
    fn receiving_is_capped_at_quantity() {
        let mut item = PurchaseItem::new(SkuId::new(5), 2, price("1.00")).unwrap();
        item.receive_sn("SN-A0001".to_string()).unwrap();
        item.receive_sn("SN-A0002".to_string()).unwrap();
        assert!(item.is_fully_received());

        let err = item.receive_sn("SN-A0003".to_string()).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) => {
                assert!(msg.contains("SKU-5"));
                assert!(msg.contains("ordered 2, received 2"));
            }
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
        assert_eq!(item.received_qty(), 2);
        assert_eq!(item.received_sn_codes(), &["SN-A0001", "SN-A0002"]);
    }
}
