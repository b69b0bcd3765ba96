//! Table schema shared by the initializer and the loader

use std::fmt;

/// Default name of the inventory table
pub const INVENTORY_TABLE: &str = "histo_inventory";

/// Storage type of a warehouse column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Free text
    Text,
    /// Whole number, stored as a 64-bit BIGINT
    Integer,
    /// Calendar date (YYYY-MM-DD)
    Date,
}

impl ColumnType {
    /// SQL type name used in DDL
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "BIGINT",
            ColumnType::Date => "DATE",
        }
    }

    /// Human-readable name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Integer => "integer",
            ColumnType::Date => "date (YYYY-MM-DD)",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_type())
    }
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub primary_key: bool,
}

impl ColumnDef {
    const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: false,
        }
    }

    const fn key(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            primary_key: true,
        }
    }

    fn ddl(&self) -> String {
        if self.primary_key {
            format!("{} {} PRIMARY KEY", self.name, self.column_type)
        } else {
            format!("{} {}", self.name, self.column_type)
        }
    }
}

/// Inventory columns in declaration order
pub static INVENTORY_COLUMNS: [ColumnDef; 11] = [
    ColumnDef::key("short_name", ColumnType::Text),
    ColumnDef::new("vendor", ColumnType::Text),
    ColumnDef::new("quantity", ColumnType::Integer),
    ColumnDef::new("min_stock_level", ColumnType::Integer),
    ColumnDef::new("max_in_stock", ColumnType::Integer),
    ColumnDef::new("barcode", ColumnType::Text),
    ColumnDef::new("unit", ColumnType::Text),
    ColumnDef::new("qty_per_unit", ColumnType::Integer),
    ColumnDef::new("catalog_number", ColumnType::Integer),
    ColumnDef::new("notes", ColumnType::Text),
    ColumnDef::new("date", ColumnType::Date),
];

/// Schema of a warehouse table
///
/// Both the initializer and the loader render their DDL from this value, so
/// the two can never disagree on column names or types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    table: String,
    columns: &'static [ColumnDef],
}

impl TableSchema {
    /// Inventory schema under the given table name
    ///
    /// The name is interpolated into SQL; callers validate it first (see
    /// [`WarehouseConfig::validate`](super::config::WarehouseConfig::validate)).
    pub fn inventory(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: &INVENTORY_COLUMNS,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &[ColumnDef] {
        self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Get the DDL for creating the table (DuckDB syntax)
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(ColumnDef::ddl).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    {}\n)",
            self.table,
            columns.join(",\n    ")
        )
    }

    /// Get the statement that empties the table
    pub fn delete_all_sql(&self) -> String {
        format!("DELETE FROM {}", self.table)
    }

    /// Get a positional INSERT statement for the given column order
    ///
    /// Date parameters are bound as text and cast in SQL.
    pub fn insert_sql(&self, columns: &[&str]) -> String {
        let placeholders: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, name)| match self.column(name).map(|c| c.column_type) {
                Some(ColumnType::Date) => format!("CAST(?{} AS DATE)", i + 1),
                _ => format!("?{}", i + 1),
            })
            .collect();
        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders.join(", ")
        )
    }

    /// Compare a header against the schema
    ///
    /// Returns `(missing, unexpected)`; both empty means the header names
    /// every column exactly once. Repeated header names count as unexpected.
    pub fn diff_columns(&self, header: &[String]) -> (Vec<String>, Vec<String>) {
        let missing = self
            .columns
            .iter()
            .filter(|c| !header.iter().any(|h| h.as_str() == c.name))
            .map(|c| c.name.to_string())
            .collect();

        let mut seen: Vec<&str> = Vec::with_capacity(header.len());
        let mut unexpected = Vec::new();
        for name in header {
            if self.column(name).is_none() || seen.contains(&name.as_str()) {
                unexpected.push(name.clone());
            }
            seen.push(name);
        }

        (missing, unexpected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_create_table_sql() {
        let ddl = TableSchema::inventory(INVENTORY_TABLE).create_table_sql();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS histo_inventory ("));
        assert!(ddl.contains("short_name TEXT PRIMARY KEY"));
        assert!(ddl.contains("unit TEXT,"));
        assert!(ddl.contains("catalog_number BIGINT"));
        assert!(!ddl.contains("INTEGER"));
        assert!(ddl.contains("date DATE"));
        assert!(!ddl.contains("unit,"));
    }

    #[test]
    fn test_single_primary_key() {
        let keys: Vec<_> = INVENTORY_COLUMNS.iter().filter(|c| c.primary_key).collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "short_name");
    }

    #[test]
    fn test_insert_sql() {
        let schema = TableSchema::inventory("t");
        assert_eq!(
            schema.insert_sql(&["vendor", "short_name"]),
            "INSERT INTO t (vendor, short_name) VALUES (?1, ?2)"
        );
        assert_eq!(
            schema.insert_sql(&["short_name", "date"]),
            "INSERT INTO t (short_name, date) VALUES (?1, CAST(?2 AS DATE))"
        );
        assert_eq!(schema.delete_all_sql(), "DELETE FROM t");
    }

    #[test]
    fn test_diff_columns_exact_match_any_order() {
        let schema = TableSchema::inventory(INVENTORY_TABLE);
        let mut names = schema.column_names();
        names.reverse();
        let (missing, unexpected) = schema.diff_columns(&header(&names));
        assert!(missing.is_empty());
        assert!(unexpected.is_empty());
    }

    #[test]
    fn test_diff_columns_renamed_and_repeated() {
        let schema = TableSchema::inventory(INVENTORY_TABLE);
        let mut names = schema.column_names();
        names[10] = "day";
        names.push("vendor");
        let (missing, unexpected) = schema.diff_columns(&header(&names));
        assert_eq!(missing, vec!["date".to_string()]);
        assert_eq!(unexpected, vec!["day".to_string(), "vendor".to_string()]);
    }
}
