//! Truck registration reports.
//!
//! Registration exports are filtered per report, rolled up by region and
//! federal district, and pivoted into one column per brand. The heart of it is
//! [`engine::aggregate`]; the other modules load data, describe the reports
//! and write the results.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;

pub use catalog::{catalog, find_report, Dataset, FactFilter, OutputShape, ReportDefinition};
pub use config::AppConfig;
pub use engine::aggregate;
pub use error::{ReportError, ReportResult};
pub use loader::{load_and_clean, CsvFactSource, FactSource, LoadReport};
pub use output::{to_district_map, to_flat_list, ReportData, ReportResponse};
pub use types::{ColumnSet, DistrictRow, Fact, RegionRow, Registration};
