//! Error types for warehouse operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening, resetting or configuring the warehouse
#[derive(Error, Debug)]
pub enum WarehouseError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Inventory table missing when it was expected
    #[error("Table '{0}' does not exist. Run 'create_dw' first.")]
    TableMissing(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be parsed
    #[error("Failed to parse configuration file {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },
}

/// Errors that abort a load run
#[derive(Error, Debug)]
pub enum LoadError {
    /// Prepared data file not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Malformed delimited text
    #[error("CSV parse error in {path}: {reason}")]
    Csv { path: PathBuf, reason: String },

    /// Header does not name exactly the table's columns
    #[error(
        "Column mismatch for table '{table}': missing [{}], unexpected [{}]",
        .missing.join(", "),
        .unexpected.join(", ")
    )]
    ColumnMismatch {
        table: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// A value cannot be stored in its target column
    #[error("Type mismatch at row {row}, column '{column}': '{value}' is not a valid {expected}")]
    TypeMismatch {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    /// Database insert error
    #[error("Database insert error: {0}")]
    Insert(String),

    /// Warehouse error wrapper
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WarehouseError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            WarehouseError::TableMissing(table) => {
                format!("Table '{table}' does not exist.\n\nHint: Run 'create_dw' first.")
            }
            WarehouseError::InvalidConfig(msg) => {
                format!("Invalid configuration: {msg}\n\nHint: Check your warehouse configuration.")
            }
            WarehouseError::ConfigParse { path, reason } => {
                format!(
                    "Cannot read configuration {}:\n{reason}\n\n\
                    Hint: Recognized keys are warehouse_path, prepared_path and table_name.",
                    path.display()
                )
            }
            _ => self.to_string(),
        }
    }
}

impl LoadError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            LoadError::FileNotFound(path) => {
                format!(
                    "File not found: {}\n\nHint: Run the data preparation step first. \
                    The warehouse table has already been cleared.",
                    path.display()
                )
            }
            LoadError::ColumnMismatch { .. } => {
                format!(
                    "{self}\n\nHint: The prepared file header must name every table column exactly once."
                )
            }
            LoadError::Insert(reason) if is_key_violation(reason) => {
                format!(
                    "Database insert error: {reason}\n\n\
                    Hint: Check the prepared file for duplicate short_name values."
                )
            }
            LoadError::Insert(reason) => {
                format!(
                    "Database insert error: {reason}\n\n\
                    Hint: Check the prepared file values against the table column types."
                )
            }
            LoadError::Warehouse(err) => err.user_message(),
            _ => self.to_string(),
        }
    }
}

/// DuckDB reports key violations as constraint errors
fn is_key_violation(reason: &str) -> bool {
    reason.contains("Constraint Error") || reason.to_lowercase().contains("duplicate key")
}

impl From<duckdb::Error> for WarehouseError {
    fn from(err: duckdb::Error) -> Self {
        WarehouseError::Database(err.to_string())
    }
}

impl From<duckdb::Error> for LoadError {
    fn from(err: duckdb::Error) -> Self {
        LoadError::Insert(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_mismatch_display() {
        let err = LoadError::ColumnMismatch {
            table: "histo_inventory".to_string(),
            missing: vec!["date".to_string()],
            unexpected: vec!["when".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Column mismatch for table 'histo_inventory': missing [date], unexpected [when]"
        );
    }

    #[test]
    fn test_file_not_found_hint() {
        let err = LoadError::FileNotFound(PathBuf::from("data/prepared/x.csv"));
        let message = err.user_message();
        assert!(message.contains("data/prepared/x.csv"));
        assert!(message.contains("Hint:"));
    }

    #[test]
    fn test_insert_hint_names_duplicates_only_for_key_violations() {
        let duplicate = LoadError::Insert(
            "Constraint Error: Duplicate key \"short_name: DUP\" violates primary key constraint."
                .to_string(),
        );
        assert!(duplicate.user_message().contains("duplicate short_name"));

        let overflow = LoadError::Insert(
            "Conversion Error: Type INT64 with value 3000000000 can't be cast".to_string(),
        );
        let message = overflow.user_message();
        assert!(!message.contains("duplicate"));
        assert!(message.contains("column types"));
    }

    #[test]
    fn test_wrapped_warehouse_message() {
        let err = LoadError::from(WarehouseError::TableMissing("t".to_string()));
        assert!(err.user_message().contains("create_dw"));
    }
}
