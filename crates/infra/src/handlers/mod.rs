//! Downstream event consumers.

pub mod purchase_receipt;

pub use purchase_receipt::{PurchaseReceiptHandler, ReceiptOutcome};
