//! Snapshot load of the prepared inventory file

use std::fs;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::config::WarehouseConfig;
use super::db::Warehouse;
use super::error::LoadError;
use super::prepared::PreparedFrame;
use super::schema::TableSchema;

/// Statistics from a load run
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Rows removed before loading
    pub rows_cleared: usize,
    /// Rows inserted from the prepared file
    pub rows_inserted: usize,
    /// Duration of the load
    pub duration: Duration,
}

impl LoadStats {
    /// Format duration as human-readable string
    pub fn duration_string(&self) -> String {
        let millis = self.duration.as_millis();
        let secs = self.duration.as_secs();
        if secs == 0 {
            format!("{}ms", millis)
        } else if secs < 60 {
            format!("{}s", secs)
        } else {
            format!("{}m {}s", secs / 60, secs % 60)
        }
    }
}

/// Replaces the inventory table with the prepared file's rows
pub struct WarehouseLoader {
    config: WarehouseConfig,
    schema: TableSchema,
}

impl WarehouseLoader {
    pub fn new(config: WarehouseConfig) -> Self {
        let schema = TableSchema::inventory(&config.table_name);
        Self { config, schema }
    }

    pub fn config(&self) -> &WarehouseConfig {
        &self.config
    }

    /// Run the load
    ///
    /// Order matters: the table is emptied and committed *before* the
    /// prepared file is read. A missing file, a header mismatch or a failed
    /// insert therefore leaves the table empty rather than holding the
    /// previous snapshot.
    pub fn load(&self) -> Result<LoadStats, LoadError> {
        let start = Instant::now();
        self.config.validate()?;
        let warehouse_path = &self.config.warehouse_path;

        if let Some(parent) = warehouse_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        let mut warehouse = Warehouse::open(warehouse_path)?;
        debug!("Connected to {}", warehouse_path.display());

        warehouse.ensure_schema(&self.schema)?;

        let rows_cleared = warehouse.clear_table(&self.schema)?;
        info!(
            "Deleted {rows_cleared} existing row(s) from {}",
            self.schema.table()
        );

        let frame = match PreparedFrame::read(&self.config.prepared_path) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("{} left empty: {e}", self.schema.table());
                return Err(e);
            }
        };
        debug!(
            "Read {} row(s) from {}, inferred kinds: {:?}",
            frame.len(),
            frame.path().display(),
            frame.columns().iter().zip(frame.kinds()).collect::<Vec<_>>()
        );
        for conflict in frame.kind_conflicts(&self.schema) {
            warn!(
                column = %conflict.column,
                inferred = ?conflict.inferred,
                expected = %conflict.expected,
                "Column holds values that do not fit its type"
            );
        }

        let rows_inserted = match warehouse.insert_frame(&self.schema, &frame) {
            Ok(count) => count,
            Err(e) => {
                warn!("{} left empty: {e}", self.schema.table());
                return Err(e);
            }
        };
        info!(
            "Inserted {rows_inserted} row(s) into {}",
            self.schema.table()
        );

        warehouse.close()?;

        Ok(LoadStats {
            rows_cleared,
            rows_inserted,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_string() {
        let mut stats = LoadStats::default();
        stats.duration = Duration::from_millis(250);
        assert_eq!(stats.duration_string(), "250ms");
        stats.duration = Duration::from_secs(42);
        assert_eq!(stats.duration_string(), "42s");
        stats.duration = Duration::from_secs(125);
        assert_eq!(stats.duration_string(), "2m 5s");
    }
}
