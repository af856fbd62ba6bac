use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of a daily sales extract, as read from disk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawSalesRecord {
    pub date: NaiveDate,
    pub region: String,
    pub product: String,
    pub quantity: u64,
    /// Currency-formatted, e.g. `$3.00`.
    pub price: String,
}

/// One row of the normalized table shared by the pipeline and the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSalesRecord {
    pub date: NaiveDate,
    pub region: String,
    pub sales: f64,
}

/// A raw row tagged with its 1-based line number in the source file.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub line: u64,
    pub record: RawSalesRecord,
}
