//! Configuration for the warehouse initializer and loader

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::WarehouseError;
use super::schema::INVENTORY_TABLE;

/// Default location of the warehouse database file
pub const DEFAULT_WAREHOUSE_PATH: &str = "data/dw/histo_inventory.db";

/// Default location of the prepared inventory file
pub const DEFAULT_PREPARED_PATH: &str = "data/prepared/histo_inventory_prepared.csv";

/// Paths and table name shared by both jobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WarehouseConfig {
    /// Warehouse database file
    pub warehouse_path: PathBuf,
    /// Prepared CSV file read by the loader
    pub prepared_path: PathBuf,
    /// Target table
    pub table_name: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            warehouse_path: PathBuf::from(DEFAULT_WAREHOUSE_PATH),
            prepared_path: PathBuf::from(DEFAULT_PREPARED_PATH),
            table_name: INVENTORY_TABLE.to_string(),
        }
    }
}

impl WarehouseConfig {
    /// Create a new builder for WarehouseConfig
    pub fn builder() -> WarehouseConfigBuilder {
        WarehouseConfigBuilder::default()
    }

    /// Read a TOML configuration file; keys left out keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self, WarehouseError> {
        let content = std::fs::read_to_string(path)?;
        let config: WarehouseConfig =
            toml::from_str(&content).map_err(|e| WarehouseError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check paths and table name
    ///
    /// The table name ends up inside DDL and DML text, so only plain SQL
    /// identifiers are accepted.
    pub fn validate(&self) -> Result<(), WarehouseError> {
        if self.warehouse_path.as_os_str().is_empty() {
            return Err(WarehouseError::InvalidConfig(
                "warehouse_path must not be empty".to_string(),
            ));
        }
        if self.prepared_path.as_os_str().is_empty() {
            return Err(WarehouseError::InvalidConfig(
                "prepared_path must not be empty".to_string(),
            ));
        }
        if !is_identifier(&self.table_name) {
            return Err(WarehouseError::InvalidConfig(format!(
                "table_name '{}' is not a valid SQL identifier",
                self.table_name
            )));
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Builder for WarehouseConfig
#[derive(Debug, Default)]
pub struct WarehouseConfigBuilder {
    warehouse_path: Option<PathBuf>,
    prepared_path: Option<PathBuf>,
    table_name: Option<String>,
}

impl WarehouseConfigBuilder {
    /// Set the warehouse database file
    pub fn warehouse_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.warehouse_path = Some(path.into());
        self
    }

    /// Set the prepared CSV file
    pub fn prepared_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prepared_path = Some(path.into());
        self
    }

    /// Set the target table name
    pub fn table_name(mut self, table: &str) -> Self {
        self.table_name = Some(table.to_string());
        self
    }

    /// Build and validate the WarehouseConfig
    pub fn build(self) -> Result<WarehouseConfig, WarehouseError> {
        let defaults = WarehouseConfig::default();
        let config = WarehouseConfig {
            warehouse_path: self.warehouse_path.unwrap_or(defaults.warehouse_path),
            prepared_path: self.prepared_path.unwrap_or(defaults.prepared_path),
            table_name: self.table_name.unwrap_or(defaults.table_name),
        };
        config.validate()?;
        Ok(config)
    }
}
