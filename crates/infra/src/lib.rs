//! Infrastructure layer: storage adapters, application services, config and
//! downstream event handlers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod repository;
pub mod services;


pub use config::{ConfigError, ServiceConfig};
pub use error::ServiceError;
pub use handlers::{PurchaseReceiptHandler, ReceiptOutcome};
pub use repository::InMemoryRepository;
pub use services::{InventoryService, PurchaseService};
