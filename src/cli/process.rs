use std::path::PathBuf;

use colored::Colorize;

use crate::error::Result;
use crate::pipeline;
use crate::settings::load_settings;

pub fn run(inputs: Vec<String>, output: Option<String>, product: Option<String>) -> Result<()> {
    let settings = load_settings();
    let inputs: Vec<PathBuf> = if inputs.is_empty() {
        settings.input_paths()
    } else {
        inputs.into_iter().map(PathBuf::from).collect()
    };
    let output = output.map(PathBuf::from).unwrap_or_else(|| settings.output_path());
    let product = product.unwrap_or(settings.product);

    let result = pipeline::run(&inputs, &output, &product)?;

    println!(
        "{} Wrote {} {} rows to {} ({} rows read from {} extracts)",
        "\u{2713}".green().bold(),
        result.rows_written,
        product,
        output.display(),
        result.rows_read,
        result.extracts
    );
    Ok(())
}
