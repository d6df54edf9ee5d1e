use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts that already happened)
/// - **versioned** (schema evolution)
/// - **minimal** (only the payload a known consumer needs)
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.item.stocked_out").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event was raised.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Identifier of the aggregate that raised the event.
    fn aggregate_id(&self) -> String;
}
