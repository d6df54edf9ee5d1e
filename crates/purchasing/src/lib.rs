//! Purchasing domain module (purchase orders and their lines).
//!
//! This crate contains business rules for purchase orders, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod order;
pub mod repository;

pub use item::{PurchaseItem, PurchaseItemSnapshot};
pub use order::{
    PurchaseCompletedEvent, PurchaseOrder, PurchaseOrderEvent, PurchaseOrderId,
    PurchaseOrderSnapshot, PurchaseStatus, SupplierId,
};
pub use repository::PurchaseOrderRepository;
