pub mod dashboard;
pub mod demo;
pub mod figure;
pub mod init;
pub mod process;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "morsel", about = "Pink Morsel daily sales pipeline and regional dashboard.")]
pub struct Cli {
    /// Development mode: verbose logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the daily extracts into the normalized sales table.
    Process {
        /// Extract to read (repeatable; default: from settings)
        #[arg(long = "input")]
        inputs: Vec<String>,
        /// Output CSV path (default: from settings)
        #[arg(long)]
        output: Option<String>,
        /// Product to keep (exact match)
        #[arg(long)]
        product: Option<String>,
    },
    /// Interactive sales dashboard with a region selector.
    Dashboard {
        /// Initial region: north, east, south, west, all
        #[arg(long, default_value = "all")]
        region: String,
        /// All regions, no reference marker, selector disabled
        #[arg(long)]
        minimal: bool,
    },
    /// Write the dashboard figure for a region as JSON.
    Figure {
        /// Region: north, east, south, west, all
        #[arg(long, default_value = "all")]
        region: String,
        /// All regions, no reference marker
        #[arg(long)]
        minimal: bool,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show settings and a summary of the normalized table.
    Status,
    /// Write a settings file.
    Init {
        /// Product to keep
        #[arg(long)]
        product: Option<String>,
        /// Output CSV path
        #[arg(long)]
        output: Option<String>,
        /// Reference marker date: YYYY-MM-DD
        #[arg(long = "reference-date")]
        reference_date: Option<String>,
    },
    /// Write three sample extracts to the configured input paths.
    Demo {
        /// Overwrite existing extracts
        #[arg(long)]
        force: bool,
    },
}
