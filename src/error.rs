use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("Malformed price {value:?} in {} (line {line})", path.display())]
    Price {
        path: PathBuf,
        line: u64,
        value: String,
    },

    #[error("Missing column '{column}' in {}", path.display())]
    Schema { path: PathBuf, column: String },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Unknown region: {0} (expected north, east, south, west or all)")]
    UnknownRegion(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SalesError>;
