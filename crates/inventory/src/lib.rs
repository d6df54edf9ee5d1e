//! Inventory domain module (serial-numbered stock).
//!
//! Every physical unit is tracked as its own [`InventoryItem`] aggregate whose
//! status only moves along the [`InventoryStatus`] transition table. Business
//! rules are pure, deterministic domain logic (no IO, no storage).

pub mod error;
pub mod ids;
pub mod item;
pub mod repository;
pub mod status;

pub use error::InventoryError;
pub use ids::{InventoryItemId, SnCode, WarehouseId};
pub use item::{InventoryEvent, InventoryItem, InventoryItemSnapshot, SourceType, StockOutEvent};
pub use repository::InventoryItemRepository;
pub use status::InventoryStatus;
