//! Snapshot-based aggregate storage.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value as JsonValue;

use snerp_core::{AggregateRoot, ExpectedVersion, Repository, RepositoryError, Snapshot};
use snerp_inventory::{InventoryItem, InventoryItemRepository, SnCode};

#[derive(Debug, Clone)]
struct StoredSnapshot {
    version: u64,
    state: JsonValue,
}

/// In-memory repository keeping one JSON snapshot per aggregate.
///
/// Intended for tests/dev. Every save checks the stored version against the
/// version the aggregate was loaded at and bumps it by one.
#[derive(Debug)]
pub struct InMemoryRepository<A: AggregateRoot> {
    rows: RwLock<HashMap<A::Id, StoredSnapshot>>,
}

impl<A: AggregateRoot> InMemoryRepository<A> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Stored version of an aggregate, if present.
    pub fn stored_version(&self, id: &A::Id) -> Option<u64> {
        let rows = self.rows.read().ok()?;
        rows.get(id).map(|row| row.version)
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: AggregateRoot> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> InMemoryRepository<A>
where
    A: AggregateRoot + Snapshot,
{
    fn decode(row: &StoredSnapshot) -> Result<A, RepositoryError> {
        let snapshot: A::Snapshot = serde_json::from_value(row.state.clone())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(A::reconstruct(snapshot, row.version))
    }

    /// Rehydrate every stored aggregate (unordered).
    pub fn load_all(&self) -> Result<Vec<A>, RepositoryError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        rows.values().map(Self::decode).collect()
    }
}

impl<A> Repository<A> for InMemoryRepository<A>
where
    A: AggregateRoot + Snapshot,
    A::Id: Send + Sync,
{
    fn save(&self, aggregate: &A) -> Result<(), RepositoryError> {
        let state = serde_json::to_value(aggregate.snapshot())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;

        let mut rows = self
            .rows
            .write()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;

        let current = rows.get(aggregate.id()).map(|row| row.version).unwrap_or(0);
        ExpectedVersion::Exact(aggregate.version())
            .check(current)
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        rows.insert(
            aggregate.id().clone(),
            StoredSnapshot {
                version: current + 1,
                state,
            },
        );
        Ok(())
    }

    fn find_by_id(&self, id: &A::Id) -> Result<Option<A>, RepositoryError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))?;
        rows.get(id).map(Self::decode).transpose()
    }
}

impl InventoryItemRepository for InMemoryRepository<InventoryItem> {
    fn find_active_by_sn_code(
        &self,
        sn_code: &SnCode,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|item| item.sn_code() == sn_code && item.is_active()))
    }
}
