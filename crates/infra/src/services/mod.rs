//! Application services (use-case orchestration).
//!
//! Every use case follows the same pipeline:
//!
//! ```text
//! 1. load the aggregate through its repository
//! 2. run exactly one business operation
//! 3. save (optimistic concurrency check on the loaded version)
//! 4. wrap each buffered event in an envelope and publish, in buffer order
//! 5. clear the buffer
//! ```
//!
//! A failed operation or a failed save publishes nothing. A save that loses an
//! optimistic-lock race reloads and re-runs the operation, up to
//! [`ServiceConfig::max_conflict_retries`](crate::config::ServiceConfig) times.

pub mod inventory;
pub mod purchasing;

pub use inventory::InventoryService;
pub use purchasing::PurchaseService;

use core::fmt::Display;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};

use snerp_core::{AggregateRoot, DomainError, Repository, RepositoryError};
use snerp_events::{Event, EventBus, EventEnvelope};

use crate::error::ServiceError;

pub const INVENTORY_ITEM_AGGREGATE_TYPE: &str = "inventory.item";
pub const PURCHASE_ORDER_AGGREGATE_TYPE: &str = "purchasing.order";

/// Load `id`, apply `op`, save, then publish what the operation recorded.
pub(crate) fn execute<A, R, B, T>(
    repo: &R,
    bus: &B,
    aggregate_type: &str,
    id: &A::Id,
    max_conflict_retries: u32,
    mut op: impl FnMut(&mut A) -> Result<T, ServiceError>,
) -> Result<T, ServiceError>
where
    A: AggregateRoot,
    A::Id: Display,
    A::Event: Event + Serialize,
    R: Repository<A> + ?Sized,
    B: EventBus<EventEnvelope<JsonValue>> + ?Sized,
{
    let mut attempt = 0;
    loop {
        let mut aggregate = repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("{aggregate_type} {id}")))?;

        let value = op(&mut aggregate)?;

        match repo.save(&aggregate) {
            Ok(()) => {
                publish_pending(bus, aggregate_type, &mut aggregate)?;
                return Ok(value);
            }
            Err(RepositoryError::Conflict(reason)) if attempt < max_conflict_retries => {
                attempt += 1;
                warn!(
                    aggregate_type,
                    aggregate_id = %id,
                    attempt,
                    %reason,
                    "save lost an optimistic-lock race; reloading"
                );
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Publish every buffered event of a saved aggregate, then clear the buffer.
pub(crate) fn publish_pending<A, B>(
    bus: &B,
    aggregate_type: &str,
    aggregate: &mut A,
) -> Result<(), ServiceError>
where
    A: AggregateRoot,
    A::Event: Event + Serialize,
    B: EventBus<EventEnvelope<JsonValue>> + ?Sized,
{
    for event in aggregate.domain_events() {
        let envelope = EventEnvelope::from_event(aggregate_type, event)
            .map_err(|e| ServiceError::Serialization(e.to_string()))?;

        debug!(
            event_id = %envelope.event_id(),
            event_type = envelope.event_type(),
            aggregate_id = envelope.aggregate_id(),
            "publishing event"
        );

        bus.publish(envelope).map_err(|e| {
            error!(aggregate_type, error = ?e, "event publication failed after save");
            ServiceError::Publish(format!("{e:?}"))
        })?;
    }

    aggregate.clear_domain_events();
    Ok(())
}
