//! Persistence contract for inventory items.

use snerp_core::{Repository, RepositoryError};

use crate::ids::SnCode;
use crate::item::InventoryItem;

/// Inventory item persistence.
///
/// "Active" means any non-terminal [`InventoryStatus`](crate::InventoryStatus).
/// At most one active item may exist per serial number; callers check
/// [`exists_active_by_sn_code`](InventoryItemRepository::exists_active_by_sn_code)
/// before [`InventoryItem::stock_in`], since the aggregate cannot see other
/// aggregates.
pub trait InventoryItemRepository: Repository<InventoryItem> {
    fn find_active_by_sn_code(
        &self,
        sn_code: &SnCode,
    ) -> Result<Option<InventoryItem>, RepositoryError>;

    fn exists_active_by_sn_code(&self, sn_code: &SnCode) -> Result<bool, RepositoryError> {
        Ok(self.find_active_by_sn_code(sn_code)?.is_some())
    }
}

impl<R> InventoryItemRepository for std::sync::Arc<R>
where
    R: InventoryItemRepository + ?Sized,
{
    fn find_active_by_sn_code(
        &self,
        sn_code: &SnCode,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        (**self).find_active_by_sn_code(sn_code)
    }

    fn exists_active_by_sn_code(&self, sn_code: &SnCode) -> Result<bool, RepositoryError> {
        (**self).exists_active_by_sn_code(sn_code)
    }
}
