//! Persistence contract for purchase orders.

use snerp_core::Repository;

use crate::order::PurchaseOrder;

/// Purchase order persistence. Lines are stored as part of their order.
pub trait PurchaseOrderRepository: Repository<PurchaseOrder> {}

impl<R> PurchaseOrderRepository for R where R: Repository<PurchaseOrder> + ?Sized {}
