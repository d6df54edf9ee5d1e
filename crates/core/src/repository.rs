//! Persistence boundary consumed by the orchestration layer.
//!
//! The domain crates only define *what* a repository must do; adapters in the
//! infrastructure layer decide how state is stored.

use thiserror::Error;

use crate::aggregate::AggregateRoot;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored version moved since the aggregate was loaded.
    #[error("concurrency conflict: {0}")]
    Conflict(String),

    /// A snapshot could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Aggregate persistence contract.
///
/// - `save` persists the full state snapshot and fails with
///   [`RepositoryError::Conflict`] when the stored version no longer matches the
///   version the aggregate was loaded at.
/// - `find_by_id` rehydrates through the aggregate's reconstruction path and
///   returns an instance with an empty event buffer.
pub trait Repository<A: AggregateRoot>: Send + Sync {
    fn save(&self, aggregate: &A) -> Result<(), RepositoryError>;

    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError>;
}

impl<A, R> Repository<A> for std::sync::Arc<R>
where
    A: AggregateRoot,
    R: Repository<A> + ?Sized,
{
    fn save(&self, aggregate: &A) -> Result<(), RepositoryError> {
        (**self).save(aggregate)
    }

    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        (**self).find_by_id(id)
    }
}
