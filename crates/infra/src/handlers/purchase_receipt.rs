//! Purchase completion → inventory stock-in.
//!
//! Consumes `purchasing.order.completed` envelopes and creates one inventory
//! item per received serial code. Delivery is at-least-once, so re-applying
//! the same envelope must be harmless: serial codes that already have an
//! active record are skipped, not failed.

use serde_json::Value as JsonValue;
use tracing::{info, warn};

use snerp_core::DomainError;
use snerp_events::{EventBus, EventEnvelope};
use snerp_inventory::{InventoryItemId, InventoryItemRepository, SnCode, SourceType};
use snerp_purchasing::PurchaseOrderEvent;

use crate::error::ServiceError;
use crate::services::InventoryService;

const PURCHASE_COMPLETED: &str = "purchasing.order.completed";

/// What one envelope produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptOutcome {
    pub created: Vec<InventoryItemId>,
    /// Serial codes left alone: already active, not a valid serial code, or
    /// received on a line whose unit price is not positive.
    pub skipped: Vec<String>,
}

impl ReceiptOutcome {
    fn merge(&mut self, other: ReceiptOutcome) {
        self.created.extend(other.created);
        self.skipped.extend(other.skipped);
    }
}

#[derive(Debug)]
pub struct PurchaseReceiptHandler<R, B> {
    inventory: InventoryService<R, B>,
}

impl<R, B> PurchaseReceiptHandler<R, B>
where
    R: InventoryItemRepository,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(inventory: InventoryService<R, B>) -> Self {
        Self { inventory }
    }

    pub fn inventory(&self) -> &InventoryService<R, B> {
        &self.inventory
    }

    /// Apply every envelope in order, stopping at the first hard failure.
    pub fn apply_all<'a>(
        &self,
        envelopes: impl IntoIterator<Item = &'a EventEnvelope<JsonValue>>,
    ) -> Result<ReceiptOutcome, ServiceError> {
        let mut outcome = ReceiptOutcome::default();
        for envelope in envelopes {
            outcome.merge(self.apply_envelope(envelope)?);
        }
        Ok(outcome)
    }

    pub fn apply_envelope(
        &self,
        envelope: &EventEnvelope<JsonValue>,
    ) -> Result<ReceiptOutcome, ServiceError> {
        if envelope.event_type() != PURCHASE_COMPLETED {
            return Ok(ReceiptOutcome::default());
        }

        let PurchaseOrderEvent::PurchaseCompleted(completed) = envelope
            .decode::<PurchaseOrderEvent>()
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;

        let warehouse = self.inventory.config().receiving_warehouse.ok_or_else(|| {
            DomainError::validation("no receiving warehouse configured for purchase receipts")
        })?;
        let source_order_id = completed.order_id.to_string();

        let mut outcome = ReceiptOutcome::default();
        for line in &completed.items {
            // stock needs a positive cost basis; a free line cannot be stocked in
            if !line.unit_price.is_positive() {
                warn!(
                    order_id = %completed.order_id,
                    sku = %line.sku_id,
                    unit_price = %line.unit_price,
                    "skipping serial codes of a line without a positive unit price"
                );
                outcome.skipped.extend(line.received_sn_codes.iter().cloned());
                continue;
            }
            let unit_cost = line.unit_price.to_string();

            for raw_sn in &line.received_sn_codes {
                if let Err(e) = SnCode::of(raw_sn) {
                    warn!(order_id = %completed.order_id, sn = %raw_sn, error = %e, "skipping invalid serial code");
                    outcome.skipped.push(raw_sn.clone());
                    continue;
                }

                match self.inventory.stock_in(
                    raw_sn,
                    line.sku_id,
                    warehouse,
                    &unit_cost,
                    SourceType::Purchase,
                    &source_order_id,
                ) {
                    Ok(id) => outcome.created.push(id),
                    Err(ServiceError::DuplicateActiveSn(sn)) => {
                        outcome.skipped.push(sn.as_str().to_string());
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            order_id = %completed.order_id,
            supplier = %completed.supplier_id,
            created = outcome.created.len(),
            skipped = outcome.skipped.len(),
            "purchase receipt applied"
        );
        Ok(outcome)
    }
}
