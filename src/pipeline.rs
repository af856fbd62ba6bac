use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{Result, SalesError};
use crate::fmt::decimal;
use crate::models::{NormalizedSalesRecord, RawSalesRecord, SourceRow};

pub const EXTRACT_COLUMNS: [&str; 5] = ["date", "region", "product", "quantity", "price"];
pub const OUTPUT_COLUMNS: [&str; 3] = ["date", "region", "sales"];

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip `$` and `,` from a currency string and parse what remains.
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn parse_price(raw: &str) -> Option<f64> {
    let s = raw.replace(['$', ','], "");
    let value: f64 = s.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

/// SHA-256 of a file's bytes, hex encoded.
pub fn checksum(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// All rows of one extract, in file order.
#[derive(Debug)]
pub struct Extract {
    pub path: PathBuf,
    pub rows: Vec<SourceRow>,
}

pub fn load_extract(path: &Path) -> Result<Extract> {
    if !path.is_file() {
        return Err(SalesError::MissingInput(path.to_path_buf()));
    }
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(std::io::BufReader::new(file));

    let headers = rdr.headers()?.clone();
    for column in EXTRACT_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(SalesError::Schema {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawSalesRecord = record.deserialize(Some(&headers))?;
        rows.push(SourceRow { line, record: raw });
    }
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded extract");
    Ok(Extract {
        path: path.to_path_buf(),
        rows,
    })
}

/// Load every extract before anything else happens, so a missing or broken
/// file aborts the run up front.
pub fn load_extracts(paths: &[PathBuf]) -> Result<Vec<Extract>> {
    paths.iter().map(|p| load_extract(p)).collect()
}

// ---------------------------------------------------------------------------
// Transform
// ---------------------------------------------------------------------------

/// Filter to `product`, derive `sales = price * quantity`, project to
/// `date, region, sales`. Row order is extract order, then file order.
pub fn transform(extracts: &[Extract], product: &str) -> Result<Vec<NormalizedSalesRecord>> {
    let mut out = Vec::new();
    for extract in extracts {
        for row in extract.rows.iter().filter(|r| r.record.product == product) {
            let price = parse_price(&row.record.price).ok_or_else(|| SalesError::Price {
                path: extract.path.clone(),
                line: row.line,
                value: row.record.price.clone(),
            })?;
            out.push(NormalizedSalesRecord {
                date: row.record.date,
                region: row.record.region.clone(),
                sales: price * row.record.quantity as f64,
            });
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Write the normalized table, replacing `output` only once every row is on
/// disk. A failure leaves any previous file untouched.
pub fn write_output(records: &[NormalizedSalesRecord], output: &Path) -> Result<()> {
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    {
        let mut wtr = csv::Writer::from_writer(tmp.as_file_mut());
        wtr.write_record(OUTPUT_COLUMNS)?;
        for r in records {
            wtr.write_record([
                r.date.format("%Y-%m-%d").to_string(),
                r.region.clone(),
                decimal(r.sales),
            ])?;
        }
        wtr.flush()?;
    }
    tmp.as_file_mut().flush()?;
    tmp.persist(output).map_err(|e| SalesError::Io(e.error))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

pub struct PipelineResult {
    pub extracts: usize,
    pub rows_read: usize,
    pub rows_written: usize,
}

pub fn run(inputs: &[PathBuf], output: &Path, product: &str) -> Result<PipelineResult> {
    if inputs.is_empty() {
        return Err(SalesError::Other("No input extracts configured".into()));
    }
    let extracts = load_extracts(inputs)?;
    let rows_read = extracts.iter().map(|e| e.rows.len()).sum();

    let records = transform(&extracts, product)?;
    write_output(&records, output)?;

    tracing::info!(
        extracts = extracts.len(),
        rows_read,
        rows_written = records.len(),
        output = %output.display(),
        "pipeline finished"
    );
    Ok(PipelineResult {
        extracts: extracts.len(),
        rows_read,
        rows_written: records.len(),
    })
}
