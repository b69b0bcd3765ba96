//! Warehouse database access

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use duckdb::types::{Type, Value};

use super::error::{LoadError, WarehouseError};
use super::prepared::{CellValue, PreparedFrame};
use super::record::InventoryRecord;
use super::schema::{ColumnDef, TableSchema};

/// An open warehouse connection
///
/// The connection only exists once `open` succeeded; it is released by
/// [`close`](Self::close) or, on any early return, when the value is dropped.
pub struct Warehouse {
    conn: duckdb::Connection,
    path: Option<PathBuf>,
}

impl Warehouse {
    /// Open or create a warehouse at the given path
    pub fn open(path: &Path) -> Result<Self, WarehouseError> {
        let conn = duckdb::Connection::open(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory warehouse (for testing)
    pub fn memory() -> Result<Self, WarehouseError> {
        let conn = duckdb::Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Get the database path (if not in-memory)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the table if it does not exist yet
    pub fn ensure_schema(&self, schema: &TableSchema) -> Result<(), WarehouseError> {
        self.conn.execute_batch(&schema.create_table_sql())?;
        Ok(())
    }

    /// Check whether the table exists
    pub fn is_initialized(&self, table: &str) -> Result<bool, WarehouseError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?1",
            [table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Column names of the table in declaration order
    pub fn column_names(&self, table: &str) -> Result<Vec<String>, WarehouseError> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name FROM information_schema.columns
             WHERE table_name = ?1
             ORDER BY ordinal_position",
        )?;
        let rows = stmt.query_map([table], |row| row.get::<_, String>(0))?;

        let mut names = Vec::new();
        for row in rows {
            names.push(row?);
        }
        Ok(names)
    }

    /// Get the total row count
    pub fn row_count(&self, table: &str) -> Result<i64, WarehouseError> {
        if !self.is_initialized(table)? {
            return Err(WarehouseError::TableMissing(table.to_string()));
        }
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete every row; runs in autocommit mode so it is durable at once
    pub fn clear_table(&self, schema: &TableSchema) -> Result<usize, WarehouseError> {
        let deleted = self.conn.execute(&schema.delete_all_sql(), [])?;
        Ok(deleted)
    }

    /// Append every row of the frame inside a single transaction
    ///
    /// The header must name each schema column exactly once. Any failure
    /// rolls the whole batch back.
    pub fn insert_frame(
        &mut self,
        schema: &TableSchema,
        frame: &PreparedFrame,
    ) -> Result<usize, LoadError> {
        let (missing, unexpected) = schema.diff_columns(frame.columns());
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(LoadError::ColumnMismatch {
                table: schema.table().to_string(),
                missing,
                unexpected,
            });
        }

        let targets: Vec<&ColumnDef> = frame
            .columns()
            .iter()
            .filter_map(|name| schema.column(name))
            .collect();
        let names: Vec<&str> = targets.iter().map(|c| c.name).collect();
        let sql = schema.insert_sql(&names);

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for (index, row) in frame.rows().iter().enumerate() {
                let values = bind_row(index + 1, &targets, row)?;
                stmt.execute(duckdb::params_from_iter(values))?;
            }
        }
        tx.commit()?;

        Ok(frame.len())
    }

    /// Read the inventory table back, ordered by key
    pub fn fetch_records(&self, table: &str) -> Result<Vec<InventoryRecord>, WarehouseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT short_name, vendor, quantity, min_stock_level, max_in_stock,
                    barcode, unit, qty_per_unit, catalog_number, notes,
                    CAST(date AS VARCHAR)
             FROM {table}
             ORDER BY short_name"
        ))?;

        let rows = stmt.query_map([], |row| {
            let date = row
                .get::<_, Option<String>>(10)?
                .map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d"))
                .transpose()
                .map_err(|e| {
                    duckdb::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e))
                })?;
            Ok(InventoryRecord {
                short_name: row.get(0)?,
                vendor: row.get(1)?,
                quantity: row.get(2)?,
                min_stock_level: row.get(3)?,
                max_in_stock: row.get(4)?,
                barcode: row.get(5)?,
                unit: row.get(6)?,
                qty_per_unit: row.get(7)?,
                catalog_number: row.get(8)?,
                notes: row.get(9)?,
                date,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Flush and close the connection
    pub fn close(self) -> Result<(), WarehouseError> {
        self.conn.close().map_err(|(_, e)| e.into())
    }
}

/// Convert one CSV row into bound parameters, in header order
fn bind_row(
    row: usize,
    targets: &[&ColumnDef],
    fields: &[String],
) -> Result<Vec<Value>, LoadError> {
    targets
        .iter()
        .zip(fields)
        .map(|(column, raw)| {
            let cell = CellValue::coerce(raw, column.column_type).ok_or_else(|| {
                LoadError::TypeMismatch {
                    row,
                    column: column.name.to_string(),
                    value: raw.clone(),
                    expected: column.column_type.describe(),
                }
            })?;
            Ok(match cell {
                CellValue::Null => Value::Null,
                CellValue::Integer(n) => Value::BigInt(n),
                CellValue::Text(s) => Value::Text(s),
                CellValue::Date(d) => Value::Text(d.format("%Y-%m-%d").to_string()),
            })
        })
        .collect()
}
