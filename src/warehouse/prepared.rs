//! Reading the prepared inventory file

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::error::LoadError;
use super::schema::{ColumnType, TableSchema};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Kind of value inferred from serialized text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Empty field (no information)
    Empty,
    /// Whole number
    Integer,
    /// Floating point number
    Real,
    /// ISO 8601 calendar date
    Date,
    /// Anything else
    Text,
}

impl ValueKind {
    /// Detect the kind of a single serialized value
    pub fn detect(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() {
            ValueKind::Empty
        } else if value.parse::<i64>().is_ok() {
            ValueKind::Integer
        } else if value.parse::<f64>().is_ok() {
            ValueKind::Real
        } else if NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok() {
            ValueKind::Date
        } else {
            ValueKind::Text
        }
    }

    /// Merge the kinds of two values from the same column
    pub fn merge_with(self, other: ValueKind) -> ValueKind {
        match (self, other) {
            (a, b) if a == b => a,
            (ValueKind::Empty, other) | (other, ValueKind::Empty) => other,
            (ValueKind::Integer, ValueKind::Real) | (ValueKind::Real, ValueKind::Integer) => {
                ValueKind::Real
            }
            _ => ValueKind::Text,
        }
    }

    /// Whether every value of this kind can be stored in the column type
    pub fn fits(self, column_type: ColumnType) -> bool {
        match column_type {
            ColumnType::Text => true,
            ColumnType::Integer => matches!(
                self,
                ValueKind::Empty | ValueKind::Integer | ValueKind::Real
            ),
            ColumnType::Date => matches!(self, ValueKind::Empty | ValueKind::Date),
        }
    }
}

/// A column whose inferred kind cannot be stored in its schema type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindConflict {
    pub column: String,
    pub inferred: ValueKind,
    pub expected: ColumnType,
}

/// A value converted to its target column type
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    /// Convert raw text into the given column type
    ///
    /// Empty fields become NULL. Integers accept integral floats such as
    /// `100.0`. Text keeps the raw value untouched. Returns `None` when the
    /// value does not fit the column.
    pub fn coerce(raw: &str, column_type: ColumnType) -> Option<CellValue> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(CellValue::Null);
        }

        match column_type {
            ColumnType::Text => Some(CellValue::Text(raw.to_string())),
            ColumnType::Integer => {
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Some(CellValue::Integer(n));
                }
                let f = trimmed.parse::<f64>().ok()?;
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Some(CellValue::Integer(f as i64))
                } else {
                    None
                }
            }
            ColumnType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .map(CellValue::Date),
        }
    }
}

/// In-memory copy of the prepared file
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    path: PathBuf,
    columns: Vec<String>,
    kinds: Vec<ValueKind>,
    rows: Vec<Vec<String>>,
}

impl PreparedFrame {
    /// Read a comma-delimited file with a header row
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.to_path_buf()));
        }

        let csv_error = |e: csv::Error| LoadError::Csv {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
        let columns: Vec<String> = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut kinds = vec![ValueKind::Empty; columns.len()];
        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            let fields: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            for (kind, field) in kinds.iter_mut().zip(&fields) {
                *kind = kind.merge_with(ValueKind::detect(field));
            }
            rows.push(fields);
        }

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            kinds,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Inferred kind per column, aligned with [`columns`](Self::columns)
    pub fn kinds(&self) -> &[ValueKind] {
        &self.kinds
    }

    /// Columns whose inferred kind does not fit the schema type
    ///
    /// Header names unknown to the schema are skipped; the insert reports
    /// those as a column mismatch.
    pub fn kind_conflicts(&self, schema: &TableSchema) -> Vec<KindConflict> {
        self.columns
            .iter()
            .zip(&self.kinds)
            .filter_map(|(name, &inferred)| {
                let column = schema.column(name)?;
                (!inferred.fits(column.column_type)).then(|| KindConflict {
                    column: name.clone(),
                    inferred,
                    expected: column.column_type,
                })
            })
            .collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect() {
        assert_eq!(ValueKind::detect(""), ValueKind::Empty);
        assert_eq!(ValueKind::detect("  "), ValueKind::Empty);
        assert_eq!(ValueKind::detect("012345"), ValueKind::Integer);
        assert_eq!(ValueKind::detect("12.5"), ValueKind::Real);
        assert_eq!(ValueKind::detect("2024-01-15"), ValueKind::Date);
        assert_eq!(ValueKind::detect("low turnover"), ValueKind::Text);
    }

    #[test]
    fn test_merge() {
        use ValueKind::*;
        assert_eq!(Empty.merge_with(Integer), Integer);
        assert_eq!(Integer.merge_with(Empty), Integer);
        assert_eq!(Integer.merge_with(Real), Real);
        assert_eq!(Date.merge_with(Date), Date);
        assert_eq!(Date.merge_with(Integer), Text);
        assert_eq!(Text.merge_with(Empty), Text);
    }

    #[test]
    fn test_fits() {
        use ValueKind::*;
        assert!(Integer.fits(ColumnType::Text));
        assert!(Real.fits(ColumnType::Integer));
        assert!(Empty.fits(ColumnType::Date));
        assert!(!Text.fits(ColumnType::Integer));
        assert!(!Integer.fits(ColumnType::Date));
    }

    #[test]
    fn test_kind_conflicts() {
        let file = write_csv(
            "short_name,barcode,quantity,date,extra\n\
             WID1,012345,lots,15/01/2024,x\n\
             WID2,,7,,y\n",
        );
        let frame = PreparedFrame::read(file.path()).unwrap();
        let conflicts = frame.kind_conflicts(&TableSchema::inventory("histo_inventory"));

        assert_eq!(
            conflicts,
            vec![
                KindConflict {
                    column: "quantity".to_string(),
                    inferred: ValueKind::Text,
                    expected: ColumnType::Integer,
                },
                KindConflict {
                    column: "date".to_string(),
                    inferred: ValueKind::Text,
                    expected: ColumnType::Date,
                },
            ]
        );
    }

    #[test]
    fn test_coerce() {
        assert_eq!(
            CellValue::coerce("012345", ColumnType::Text),
            Some(CellValue::Text("012345".to_string()))
        );
        assert_eq!(
            CellValue::coerce("100", ColumnType::Integer),
            Some(CellValue::Integer(100))
        );
        assert_eq!(
            CellValue::coerce("100.0", ColumnType::Integer),
            Some(CellValue::Integer(100))
        );
        assert_eq!(CellValue::coerce("100.5", ColumnType::Integer), None);
        assert_eq!(CellValue::coerce("box", ColumnType::Integer), None);
        assert_eq!(CellValue::coerce("", ColumnType::Integer), Some(CellValue::Null));
        assert_eq!(
            CellValue::coerce("2024-01-15", ColumnType::Date),
            Some(CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()))
        );
        assert_eq!(CellValue::coerce("15/01/2024", ColumnType::Date), None);
    }

    #[test]
    fn test_read_quoted_fields() {
        let file = write_csv(
            "short_name,notes,quantity\n\
             WID1,\"low, slow \"\"turnover\"\"\",100\n\
             WID2,,12.5\n",
        );

        let frame = PreparedFrame::read(file.path()).unwrap();
        assert_eq!(frame.columns(), ["short_name", "notes", "quantity"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows()[0][1], "low, slow \"turnover\"");
        assert_eq!(frame.rows()[1][1], "");
        assert_eq!(
            frame.kinds(),
            [ValueKind::Text, ValueKind::Text, ValueKind::Real]
        );
    }

    #[test]
    fn test_read_header_only() {
        let file = write_csv("short_name,vendor\n");
        let frame = PreparedFrame::read(file.path()).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.kinds(), [ValueKind::Empty, ValueKind::Empty]);
    }

    #[test]
    fn test_read_missing_file() {
        let result = PreparedFrame::read(Path::new("does/not/exist.csv"));
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_read_ragged_row() {
        let file = write_csv("a,b\n1,2\n3\n");
        let result = PreparedFrame::read(file.path());
        assert!(matches!(result, Err(LoadError::Csv { .. })));
    }
}
