use chrono::NaiveDate;

use crate::error::{Result, SalesError};
use crate::settings::{load_settings, save_settings, settings_path};

pub fn run(
    product: Option<String>,
    output: Option<String>,
    reference_date: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();

    if let Some(p) = product {
        settings.product = p;
    }
    if let Some(o) = output {
        settings.output = o;
    }
    if let Some(d) = reference_date {
        settings.reference_date = NaiveDate::parse_from_str(&d, "%Y-%m-%d")
            .map_err(|_| SalesError::Settings(format!("Invalid reference date: {d} (expected YYYY-MM-DD)")))?;
    }

    save_settings(&settings)?;
    println!("Wrote {}", settings_path().display());
    Ok(())
}
