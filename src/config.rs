//! Runtime configuration.

use crate::error::ReportResult;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Directory holding the `truck_analytics_*.csv` exports.
    #[serde(default = "default_dir")]
    pub data_dir: PathBuf,
    /// Where `<report>.json` and `<report>.csv` are written.
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,
    /// Rows shown in each console preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_preview_rows() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_dir(),
            output_dir: default_dir(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl AppConfig {
    /// Load `config/default.toml` (optional), then `TRUCK_REPORT_*`
    /// environment variables on top.
    pub fn load() -> ReportResult<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::with_name("config/default").required(false))
            .add_source(::config::Environment::with_prefix("TRUCK_REPORT"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
