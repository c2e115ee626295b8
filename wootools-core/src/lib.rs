// Wootools Core Library
//
// Reads WooCommerce and Cloud Commerce product exports and computes the
// corrective import rows for each update rule.

pub mod config;
pub mod emitter;
pub mod error;
pub mod export;
pub mod inventory;
pub mod price;
pub mod processor;
pub mod rules;
pub mod types;

// Re-export main types and functions for easy use
pub use config::WootoolsConfig;
pub use emitter::{status_message, UpdateEmitter};
pub use error::{Result, RowFailure, RuleError, WootoolsError};
pub use export::Export;
pub use inventory::InventoryLookup;
pub use price::{Price, PriceError, RoundingTable};
pub use processor::UpdateProcessor;
pub use types::*;
