use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SalesError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_inputs")]
    pub inputs: Vec<String>,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_product")]
    pub product: String,
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
    #[serde(default = "default_reference_label")]
    pub reference_label: String,
    #[serde(default = "default_panel_height")]
    pub panel_height: u32,
}

fn default_inputs() -> Vec<String> {
    (0..3)
        .map(|i| format!("data/daily_sales_data_{i}.csv"))
        .collect()
}

fn default_output() -> String {
    "output.csv".to_string()
}

fn default_product() -> String {
    "pink morsel".to_string()
}

fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 15).unwrap_or_default()
}

fn default_reference_label() -> String {
    "Price Increase".to_string()
}

fn default_panel_height() -> u32 {
    300
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            output: default_output(),
            product: default_product(),
            reference_date: default_reference_date(),
            reference_label: default_reference_label(),
            panel_height: default_panel_height(),
        }
    }
}

impl Settings {
    pub fn input_paths(&self) -> Vec<PathBuf> {
        self.inputs.iter().map(PathBuf::from).collect()
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(&self.output)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("morsel")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable settings file");
                Settings::default()
            }
        }
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SalesError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}
