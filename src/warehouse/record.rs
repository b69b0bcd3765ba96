//! Inventory row as stored in the warehouse

use chrono::NaiveDate;

/// One stock-keeping unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    /// Unique key
    pub short_name: String,
    pub vendor: Option<String>,
    pub quantity: Option<i64>,
    pub min_stock_level: Option<i64>,
    pub max_in_stock: Option<i64>,
    pub barcode: Option<String>,
    pub unit: Option<String>,
    pub qty_per_unit: Option<i64>,
    pub catalog_number: Option<i64>,
    pub notes: Option<String>,
    pub date: Option<NaiveDate>,
}

impl InventoryRecord {
    /// Record with only the key set
    pub fn new(short_name: &str) -> Self {
        Self {
            short_name: short_name.to_string(),
            vendor: None,
            quantity: None,
            min_stock_level: None,
            max_in_stock: None,
            barcode: None,
            unit: None,
            qty_per_unit: None,
            catalog_number: None,
            notes: None,
            date: None,
        }
    }
}
