use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Result, SalesError};
use crate::models::NormalizedSalesRecord;
use crate::pipeline::OUTPUT_COLUMNS;

/// The normalized table, loaded once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChartDataset {
    records: Vec<NormalizedSalesRecord>,
    regions: Vec<String>,
}

impl ChartDataset {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(SalesError::Dataset(format!(
                "{} not found\nRun `morsel process` to generate it.",
                path.display()
            )));
        }
        let file = std::fs::File::open(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(std::io::BufReader::new(file));

        let headers = rdr.headers()?.clone();
        if !headers.iter().eq(OUTPUT_COLUMNS) {
            return Err(SalesError::Dataset(format!(
                "{}: expected header `{}`, found `{}`",
                path.display(),
                OUTPUT_COLUMNS.join(","),
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: NormalizedSalesRecord =
                result.map_err(|e| SalesError::Dataset(format!("{}: {e}", path.display())))?;
            records.push(record);
        }
        tracing::debug!(path = %path.display(), rows = records.len(), "loaded dataset");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<NormalizedSalesRecord>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        for r in &records {
            if !regions.contains(&r.region) {
                regions.push(r.region.clone());
            }
        }
        Self { records, regions }
    }

    /// Distinct regions in order of first appearance.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `(date, sales)` points for one region, stably sorted by date.
    pub fn series(&self, region: &str) -> Vec<(NaiveDate, f64)> {
        let mut points: Vec<(NaiveDate, f64)> = self
            .records
            .iter()
            .filter(|r| r.region == region)
            .map(|r| (r.date, r.sales))
            .collect();
        points.sort_by_key(|(d, _)| *d);
        points
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}
