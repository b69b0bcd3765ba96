//! Histo Inventory DW - batch jobs feeding the inventory data warehouse
//!
//! Provides:
//! - Warehouse reset (delete file, recreate the inventory table)
//! - Snapshot load of the prepared inventory CSV
//! - The shared table schema, configuration and error types

#[cfg(feature = "cli")]
pub mod cli;
pub mod warehouse;

// Re-export commonly used types
pub use warehouse::{
    InventoryRecord, LoadError, LoadStats, SchemaStatus, TableSchema, Warehouse, WarehouseConfig,
    WarehouseError, WarehouseInitializer, WarehouseLoader,
};
