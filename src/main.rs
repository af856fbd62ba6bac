mod cli;
mod control;
mod dataset;
mod error;
mod figure;
mod fmt;
mod models;
mod pipeline;
mod settings;
mod tui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing(debug: bool) {
    let default = if debug { "morsel=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Process {
            inputs,
            output,
            product,
        } => cli::process::run(inputs, output, product),
        Commands::Dashboard { region, minimal } => cli::dashboard::run(&region, minimal),
        Commands::Figure {
            region,
            minimal,
            output,
        } => cli::figure::run(&region, minimal, output),
        Commands::Status => cli::status::run(),
        Commands::Init {
            product,
            output,
            reference_date,
        } => cli::init::run(product, output, reference_date),
        Commands::Demo { force } => cli::demo::run(force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
