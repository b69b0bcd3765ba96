//! Inventory data warehouse
//!
//! Two independent batch jobs share this module:
//! - [`WarehouseInitializer`] deletes the warehouse file and recreates an
//!   empty inventory table
//! - [`WarehouseLoader`] replaces the table contents with the rows of the
//!   prepared CSV file
//!
//! Both render their DDL from the same [`TableSchema`].

pub mod config;
pub mod db;
pub mod error;
pub mod init;
pub mod load;
pub mod prepared;
pub mod record;
pub mod schema;

pub use config::{
    DEFAULT_PREPARED_PATH, DEFAULT_WAREHOUSE_PATH, WarehouseConfig, WarehouseConfigBuilder,
};
pub use db::Warehouse;
pub use error::{LoadError, WarehouseError};
pub use init::{SchemaStatus, WarehouseInitializer};
pub use load::{LoadStats, WarehouseLoader};
pub use prepared::{CellValue, KindConflict, PreparedFrame, ValueKind};
pub use record::InventoryRecord;
pub use schema::{ColumnDef, ColumnType, INVENTORY_COLUMNS, INVENTORY_TABLE, TableSchema};
