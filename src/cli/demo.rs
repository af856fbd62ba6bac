use std::path::Path;

use chrono::{Days, NaiveDate};

use crate::error::{Result, SalesError};
use crate::fmt::money;
use crate::settings::load_settings;

const REGIONS: &[&str] = &["north", "east", "south", "west"];

/// Products in each extract; only one of them is the configured product by
/// default.
const PRODUCTS: &[(&str, f64)] = &[
    ("pink morsel", 3.0),
    ("gold morsel", 9.99),
    ("lapis morsel", 1000.0),
];

const DAYS: u64 = 120;

/// Demo-only price change for the default product, matching the default
/// reference date.
fn pink_price(date: NaiveDate) -> f64 {
    match NaiveDate::from_ymd_opt(2021, 1, 15) {
        Some(change) if date >= change => 5.0,
        _ => 3.0,
    }
}

struct DemoRow {
    date: NaiveDate,
    region: &'static str,
    product: &'static str,
    quantity: u64,
    price: f64,
}

/// Rows for `DAYS` days starting 2020-11-01, split into `parts` contiguous
/// chunks. Quantities vary deterministically by day, region and product.
fn generate_rows(parts: usize) -> Vec<Vec<DemoRow>> {
    let start = NaiveDate::from_ymd_opt(2020, 11, 1).unwrap_or_default();
    let parts = parts.max(1);
    let per_part = DAYS.div_ceil(parts as u64);
    let mut chunks: Vec<Vec<DemoRow>> = (0..parts).map(|_| Vec::new()).collect();

    for day in 0..DAYS {
        let Some(date) = start.checked_add_days(Days::new(day)) else {
            continue;
        };
        let chunk = &mut chunks[((day / per_part) as usize).min(parts - 1)];
        for (r, region) in REGIONS.iter().enumerate() {
            for (p, (product, base_price)) in PRODUCTS.iter().enumerate() {
                let quantity = 200 + (day * 7 + r as u64 * 31 + p as u64 * 13) % 400;
                let price = if p == 0 { pink_price(date) } else { *base_price };
                chunk.push(DemoRow {
                    date,
                    region: *region,
                    product: *product,
                    quantity,
                    price,
                });
            }
        }
    }
    chunks
}

fn write_extract(path: &Path, rows: &[DemoRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(crate::pipeline::EXTRACT_COLUMNS)?;
    for row in rows {
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.region.to_string(),
            row.product.to_string(),
            row.quantity.to_string(),
            money(row.price),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(force: bool) -> Result<()> {
    let settings = load_settings();
    let paths = settings.input_paths();
    if paths.is_empty() {
        return Err(SalesError::Settings("No input extracts configured".into()));
    }
    if !force {
        if let Some(existing) = paths.iter().find(|p| p.exists()) {
            return Err(SalesError::Other(format!(
                "{} already exists\nRe-run with --force to overwrite the demo extracts.",
                existing.display()
            )));
        }
    }

    let chunks = generate_rows(paths.len());
    for (path, rows) in paths.iter().zip(chunks.iter()) {
        write_extract(path, rows)?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}
