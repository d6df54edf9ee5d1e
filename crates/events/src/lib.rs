//! Domain events and the publish boundary.
//!
//! Aggregates only *record* events. Delivering them is the job of an
//! [`EventBus`], driven by the orchestration layer after the aggregate's state
//! has been persisted.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
