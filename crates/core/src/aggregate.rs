//! Aggregate root contract and the deferred domain-event buffer.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// Every mutation of an aggregate runs through its own business operations.
/// Business facts produced by those operations are buffered, never dispatched:
/// the orchestration layer must follow this call sequence for every use case:
///
/// 1. load the aggregate through a repository,
/// 2. invoke exactly one business operation,
/// 3. `save` the aggregate,
/// 4. read [`AggregateRoot::domain_events`] and forward each event, in order,
/// 5. call [`AggregateRoot::clear_domain_events`].
///
/// Events are only published once the state that produced them is durable;
/// a failed save leaves nothing to publish.
///
/// Aggregates must not perform IO or side effects, and provide no internal
/// synchronization: at most one mutation may be in flight per instance.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Events this aggregate records.
    type Event: Clone + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Version of the persisted state this instance was loaded from.
    ///
    /// `0` for an aggregate that has never been saved.
    fn version(&self) -> u64;

    /// Read-only view of the buffered events, in the order they were recorded.
    fn domain_events(&self) -> &[Self::Event];

    /// Empty the event buffer. Idempotent.
    fn clear_domain_events(&mut self);
}

/// Ordered, append-only buffer of events recorded by one aggregate instance.
///
/// The buffer is a private field of the aggregate, so only the aggregate's own
/// operations can reach [`DomainEvents::record`]; outside callers only see the
/// slice handed out by [`AggregateRoot::domain_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvents<E> {
    events: Vec<E>,
}

impl<E> DomainEvents<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Append an event. Never fails, never performs IO.
    pub fn record(&mut self, event: E) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[E] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<E> Default for DomainEvents<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for migrations, imports, etc.).
    Any,
    /// Require the stored aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}

/// Persistence-facing view of an aggregate's full state.
///
/// `reconstruct` is the rehydration path: it rebuilds trusted, previously
/// validated state and bypasses every business rule. Only repository
/// implementations call it; business flows create aggregates through their
/// factories.
///
/// Buffered domain events are not part of a snapshot.
pub trait Snapshot: Sized {
    type Snapshot: Serialize + DeserializeOwned + Clone + core::fmt::Debug;

    fn snapshot(&self) -> Self::Snapshot;

    /// Rebuild an aggregate at the given stored `version`.
    fn reconstruct(snapshot: Self::Snapshot, version: u64) -> Self;
}
