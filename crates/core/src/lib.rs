//! `snerp-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! money, identifiers, the aggregate/event-buffer contract and the repository
//! boundary that persistence adapters implement.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod repository;
pub mod value_object;

pub use aggregate::{AggregateRoot, DomainEvents, ExpectedVersion, Snapshot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, SkuId};
pub use money::Money;
pub use repository::{Repository, RepositoryError};
pub use value_object::ValueObject;
