//! Warehouse reset: delete the old file and recreate an empty table

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use super::config::WarehouseConfig;
use super::db::Warehouse;
use super::error::WarehouseError;
use super::schema::TableSchema;

/// Outcome of [`WarehouseInitializer::reset`]
///
/// Both variants are non-fatal for the `create_dw` job; a failure is only
/// visible here and in the logs.
#[derive(Debug)]
pub enum SchemaStatus {
    /// The table exists and is empty
    Ensured,
    /// Connecting or creating the table failed
    Failed(WarehouseError),
}

impl SchemaStatus {
    pub fn is_ensured(&self) -> bool {
        matches!(self, SchemaStatus::Ensured)
    }
}

/// Rebuilds the warehouse from scratch
pub struct WarehouseInitializer {
    config: WarehouseConfig,
    schema: TableSchema,
}

impl WarehouseInitializer {
    pub fn new(config: WarehouseConfig) -> Self {
        let schema = TableSchema::inventory(&config.table_name);
        Self { config, schema }
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Delete any existing warehouse file and create an empty table
    ///
    /// Never returns an error: deletion failures are logged and the reset
    /// carries on, connection and DDL failures are logged and reported as
    /// [`SchemaStatus::Failed`].
    pub fn reset(&self) -> SchemaStatus {
        if let Err(e) = self.config.validate() {
            error!("Refusing to reset the warehouse: {e}");
            return SchemaStatus::Failed(e);
        }
        let path = &self.config.warehouse_path;

        remove_if_exists(path);
        remove_if_exists(&wal_path(path));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Error creating warehouse directory {}: {e}", parent.display());
                return SchemaStatus::Failed(e.into());
            }
        }

        let warehouse = match Warehouse::open(path) {
            Ok(warehouse) => warehouse,
            Err(e) => {
                error!("Error connecting to the database {}: {e}", path.display());
                return SchemaStatus::Failed(e);
            }
        };

        // A failed DDL still leaves the connection to be closed on drop.
        if let Err(e) = warehouse.ensure_schema(&self.schema) {
            error!("Error creating {} table: {e}", self.schema.table());
            return SchemaStatus::Failed(e);
        }
        info!("{} table created.", self.schema.table());

        if let Err(e) = warehouse.close() {
            error!("Error closing the database {}: {e}", path.display());
            return SchemaStatus::Failed(e);
        }

        info!("Data warehouse created successfully.");
        SchemaStatus::Ensured
    }
}

/// DuckDB keeps its write-ahead log next to the database file
fn wal_path(path: &Path) -> PathBuf {
    let mut wal = path.as_os_str().to_owned();
    wal.push(".wal");
    PathBuf::from(wal)
}

/// Best-effort delete; returns whether the path is gone afterwards
fn remove_if_exists(path: &Path) -> bool {
    if !path.exists() {
        debug!("No existing file at {}", path.display());
        return true;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Existing database {} deleted.", path.display());
            true
        }
        Err(e) => {
            error!("Error deleting existing database {}: {e}", path.display());
            false
        }
    }
}
