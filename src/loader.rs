use crate::catalog::Dataset;
use crate::error::ReportResult;
use crate::types::{RawRow, Registration};
use crate::util::{clean_text, parse_month_safe, parse_u32_safe, parse_u64_safe};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub parse_errors: usize,
}

/// Read a registration export and keep the rows that carry a usable
/// district, region, brand and quantity. Everything else is counted in
/// `parse_errors` and skipped.
pub fn load_and_clean(
    path: impl AsRef<Path>,
) -> ReportResult<(Vec<Registration>, LoadReport)> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut kept: Vec<Registration> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                debug!(row = total_rows, error = %e, "skipping malformed row");
                parse_errors += 1;
                continue;
            }
        };
        match clean_row(row) {
            Some(r) => kept.push(r),
            None => {
                debug!(
                    row = total_rows,
                    "skipping row without district, region, brand or quantity"
                );
                parse_errors += 1;
            }
        }
    }

    let report = LoadReport {
        total_rows,
        kept_rows: kept.len(),
        parse_errors,
    };
    info!(
        path = %path.display(),
        total_rows = report.total_rows,
        kept_rows = report.kept_rows,
        parse_errors = report.parse_errors,
        "dataset loaded"
    );
    Ok((kept, report))
}

fn clean_row(row: RawRow) -> Option<Registration> {
    let federal_district = clean_text(row.federal_district)?;
    let region = clean_text(row.region)?;
    // Exports mix "Sitrak" and "SITRAK"; report brand lists are upper-case.
    let brand = clean_text(row.brand)?.to_uppercase();
    let quantity = parse_u64_safe(row.quantity.as_deref())?;

    Some(Registration {
        federal_district,
        region,
        brand,
        quantity,
        wheel_formula: clean_text(row.wheel_formula),
        body_type: clean_text(row.body_type),
        exact_mass: parse_u32_safe(row.exact_mass.as_deref()),
        mass_in_segment_1: clean_text(row.mass_in_segment_1),
        weight_in_segment_4: clean_text(row.weight_in_segment_4),
        month: parse_month_safe(row.month_of_registration.as_deref()),
    })
}

/// Where reports get their registrations from.
pub trait FactSource {
    fn registrations(&mut self, dataset: Dataset) -> ReportResult<&[Registration]>;
}

/// Reads `<data_dir>/<dataset>.csv` on first use and keeps it for the rest of
/// the process.
#[derive(Debug)]
pub struct CsvFactSource {
    data_dir: PathBuf,
    loaded: HashMap<Dataset, Vec<Registration>>,
}

impl CsvFactSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            loaded: HashMap::new(),
        }
    }

    pub fn dataset_path(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(format!("{}.csv", dataset.file_stem()))
    }

    /// Load (or reload) one dataset, replacing whatever was cached.
    pub fn load(&mut self, dataset: Dataset) -> ReportResult<LoadReport> {
        let (data, report) = load_and_clean(self.dataset_path(dataset))?;
        self.loaded.insert(dataset, data);
        Ok(report)
    }

    pub fn is_loaded(&self, dataset: Dataset) -> bool {
        self.loaded.contains_key(&dataset)
    }
}

impl FactSource for CsvFactSource {
    fn registrations(&mut self, dataset: Dataset) -> ReportResult<&[Registration]> {
        if !self.is_loaded(dataset) {
            self.load(dataset)?;
        }
        Ok(self.loaded.get(&dataset).map(Vec::as_slice).unwrap_or_default())
    }
}

/// In-memory datasets; a missing dataset reads as empty.
impl FactSource for HashMap<Dataset, Vec<Registration>> {
    fn registrations(&mut self, dataset: Dataset) -> ReportResult<&[Registration]> {
        Ok(self.get(&dataset).map(Vec::as_slice).unwrap_or_default())
    }
}
