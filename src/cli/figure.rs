use std::path::PathBuf;

use crate::dataset::ChartDataset;
use crate::error::Result;
use crate::figure::{build_figure, ChartOptions, RegionFilter};
use crate::settings::load_settings;

pub fn run(region: &str, minimal: bool, output: Option<String>) -> Result<()> {
    let settings = load_settings();
    let filter = if minimal {
        RegionFilter::All
    } else {
        region.parse::<RegionFilter>()?
    };
    let options = if minimal {
        ChartOptions::minimal(&settings)
    } else {
        ChartOptions::enhanced(&settings)
    };

    let dataset = ChartDataset::load(&settings.output_path())?;
    let figure = build_figure(&dataset, &filter, &options);
    let json = serde_json::to_string_pretty(&figure)?;

    match output.map(PathBuf::from) {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&path, format!("{json}\n"))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
