use crate::catalog::{find_report, ReportDefinition};
use crate::engine::aggregate;
use crate::error::{ReportError, ReportResult};
use crate::loader::FactSource;
use crate::output::{write_csv, write_json, ReportData, ReportResponse};
use crate::types::{DistrictRow, Fact, Registration};
use std::path::Path;
use tracing::{info, warn};

/// Registrations that pass the report's filter and carry one of its brands.
pub fn select_facts(registrations: &[Registration], report: &ReportDefinition) -> Vec<Fact> {
    registrations
        .iter()
        .filter(|r| report.columns.contains(&r.brand) && report.filter.matches(r))
        .map(Fact::from)
        .collect()
}

/// Fetch, filter and aggregate one report. Rows are still district-tagged.
pub fn build_rows(
    report: &ReportDefinition,
    source: &mut dyn FactSource,
) -> ReportResult<Vec<DistrictRow>> {
    let registrations = source.registrations(report.dataset)?;
    let facts = select_facts(registrations, report);
    let rows = aggregate(&facts, &report.columns);
    info!(
        report = %report.id,
        dataset = %report.dataset,
        facts = facts.len(),
        rows = rows.len(),
        "report aggregated"
    );
    Ok(rows)
}

/// Build the response envelope for a report. Failures end up in `error`.
pub fn run_report(report: &ReportDefinition, source: &mut dyn FactSource) -> ReportResponse {
    match build_rows(report, source) {
        Ok(rows) => ReportResponse::ok(ReportData::shape(rows, report.shape)),
        Err(e) => {
            warn!(report = %report.id, error = %e, "report failed");
            ReportResponse::failed(format!("Failed to load registrations: {e}"))
        }
    }
}

pub fn run_report_by_id(id: &str, source: &mut dyn FactSource) -> ReportResponse {
    match find_report(id) {
        Some(report) => run_report(report, source),
        None => {
            warn!(report = id, "unknown report requested");
            ReportResponse::failed(ReportError::UnknownReport(id.to_string()))
        }
    }
}

/// Write `<id>.json` (response envelope) and `<id>.csv` (flat rows) into
/// `output_dir` and return the rows for previewing.
///
/// When the data cannot be loaded, the JSON file still gets written with the
/// error envelope and the error is returned.
pub fn export_report(
    report: &ReportDefinition,
    source: &mut dyn FactSource,
    output_dir: &Path,
) -> ReportResult<Vec<DistrictRow>> {
    let json_path = output_dir.join(format!("{}.json", report.id));
    let rows = match build_rows(report, source) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(report = %report.id, error = %e, "report failed");
            let response = ReportResponse::failed(format!("Failed to load registrations: {e}"));
            write_json(&json_path, &response)?;
            return Err(e);
        }
    };

    let response = ReportResponse::ok(ReportData::shape(rows.clone(), report.shape));
    write_json(&json_path, &response)?;
    write_csv(output_dir.join(format!("{}.csv", report.id)), &rows, &report.columns)?;
    info!(report = %report.id, path = %json_path.display(), "report exported");
    Ok(rows)
}
