use crate::catalog::OutputShape;
use crate::error::ReportResult;
use crate::types::{ColumnSet, DistrictRow, RegionRow};
use crate::util::format_int;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Drop the district tag, keeping engine order.
pub fn to_flat_list(rows: Vec<DistrictRow>) -> Vec<RegionRow> {
    rows.into_iter().map(|r| r.row).collect()
}

/// Bucket rows under their federal district. Each bucket keeps engine order:
/// the district's regions first, its rollup row last.
pub fn to_district_map(rows: Vec<DistrictRow>) -> BTreeMap<String, Vec<RegionRow>> {
    let mut map: BTreeMap<String, Vec<RegionRow>> = BTreeMap::new();
    for r in rows {
        map.entry(r.federal_district).or_default().push(r.row);
    }
    map
}

/// Report payload in one of the two shapes. Serialized without a tag: a JSON
/// array for `Flat`, an object keyed by district for `ByDistrict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportData {
    Flat(Vec<RegionRow>),
    ByDistrict(BTreeMap<String, Vec<RegionRow>>),
}

impl ReportData {
    pub fn shape(rows: Vec<DistrictRow>, shape: OutputShape) -> Self {
        match shape {
            OutputShape::Flat => ReportData::Flat(to_flat_list(rows)),
            OutputShape::ByDistrict => ReportData::ByDistrict(to_district_map(rows)),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            ReportData::Flat(rows) => rows.len(),
            ReportData::ByDistrict(map) => map.values().map(Vec::len).sum(),
        }
    }
}

/// JSON envelope handed to consumers: `{ "data": ... }` on success,
/// `{ "error": "..." }` on failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ReportData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportResponse {
    pub fn ok(data: ReportData) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(err: impl Display) -> Self {
        Self {
            data: None,
            error: Some(err.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> ReportResult<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Flat CSV export: one line per row with its district, blank cells for
/// absent brands.
pub fn write_csv(
    path: impl AsRef<Path>,
    rows: &[DistrictRow],
    columns: &ColumnSet,
) -> ReportResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["federal_district".to_string(), "region_name".to_string()];
    header.extend(columns.brands().iter().map(|b| b.to_lowercase()));
    header.push("total".to_string());
    wtr.write_record(&header)?;

    for r in rows {
        let mut record = vec![r.federal_district.clone(), r.row.region_name().to_string()];
        record.extend(
            r.row
                .per_brand()
                .map(|(_, v)| v.map(|n| n.to_string()).unwrap_or_default()),
        );
        record.push(r.row.total().to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Markdown table of the first `max_rows` rows, or `None` when there is
/// nothing to show.
pub fn render_table(
    rows: &[DistrictRow],
    columns: &ColumnSet,
    max_rows: usize,
) -> Option<String> {
    if rows.is_empty() || max_rows == 0 {
        return None;
    }
    let mut builder = Builder::default();
    let mut header = vec!["District".to_string(), "Region".to_string()];
    header.extend(columns.brands().iter().cloned());
    header.push("Total".to_string());
    builder.push_record(header);

    for r in rows.iter().take(max_rows) {
        let mut record = vec![r.federal_district.clone(), r.row.region_name().to_string()];
        record.extend(
            r.row
                .per_brand()
                .map(|(_, v)| v.map(format_int).unwrap_or_else(|| "-".to_string())),
        );
        record.push(format_int(r.row.total()));
        builder.push_record(record);
    }
    Some(builder.build().with(Style::markdown()).to_string())
}

pub fn preview_table(rows: &[DistrictRow], columns: &ColumnSet, max_rows: usize) {
    match render_table(rows, columns, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}
