use comfy_table::{Cell, CellAlignment, Table};

use crate::dataset::ChartDataset;
use crate::error::Result;
use crate::fmt::{money, number};
use crate::pipeline::checksum;
use crate::settings::{load_settings, settings_file_exists, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let config = if settings_file_exists() {
        settings_path().display().to_string()
    } else {
        "(defaults)".to_string()
    };

    println!("Settings:   {config}");
    println!("Product:    {}", settings.product);
    println!(
        "Reference:  {} on {}",
        settings.reference_label, settings.reference_date
    );
    println!("Extracts:");
    for path in settings.input_paths() {
        let state = if path.is_file() { "" } else { "  (missing)" };
        println!("  {}{state}", path.display());
    }

    let output = settings.output_path();
    println!("Output:     {}", output.display());

    if !output.is_file() {
        println!();
        println!("Output not found. Run `morsel process` to generate it.");
        return Ok(());
    }

    println!("Checksum:   {}", checksum(&output)?);
    let dataset = ChartDataset::load(&output)?;
    println!("Rows:       {}", number(dataset.len()));
    if let Some((first, last)) = dataset.date_range() {
        println!("Dates:      {first} .. {last}");
    }

    if !dataset.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Region", "Rows", "Total Sales"]);
        for region in dataset.regions() {
            let series = dataset.series(region);
            let total: f64 = series.iter().map(|(_, s)| s).sum();
            table.add_row(vec![
                Cell::new(region),
                Cell::new(number(series.len())).set_alignment(CellAlignment::Right),
                Cell::new(money(total)).set_alignment(CellAlignment::Right),
            ]);
        }
        println!();
        println!("{table}");
    }

    Ok(())
}
