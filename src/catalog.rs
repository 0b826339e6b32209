//! Report catalog.
//!
//! Every report the service offers is one row of data here: which dataset it
//! reads, which registrations it keeps, which brands become columns, and how
//! the result is shaped. Adding a report means adding an entry, not a function.

use crate::types::{ColumnSet, Registration};
use chrono::Month;
use once_cell::sync::Lazy;
use std::fmt;

const TRACTOR: &str = "Седельный тягач";
const DUMPER: &str = "Самосвал";

/// A registration table export. Each lives in `<data_dir>/<file_stem>.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Full-year 2023 registrations, exported 2023-12-01.
    Registrations2023,
    /// 2024 registrations up to September, exported 2024-09-01.
    Registrations2024,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Registrations2023, Dataset::Registrations2024];

    pub fn file_stem(self) -> &'static str {
        match self {
            Dataset::Registrations2023 => "truck_analytics_2023_01_12",
            Dataset::Registrations2024 => "truck_analytics_2024_01_09",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// One ordered list of rows.
    Flat,
    /// Rows bucketed under their federal district.
    ByDistrict,
}

/// Selection predicate for one report. Unset criteria match everything; set
/// criteria must all match. A registration with the criterion's field missing
/// never matches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactFilter {
    pub wheel_formula: Option<String>,
    pub body_type: Option<String>,
    pub exact_mass: Option<u32>,
    pub mass_in_segment_1: Option<String>,
    pub weight_in_segment_4: Option<String>,
    /// Keep registrations from January up to and including this month.
    pub max_month: Option<Month>,
}

fn text_matches(want: &Option<String>, have: &Option<String>) -> bool {
    match want {
        None => true,
        Some(w) => have.as_deref() == Some(w.as_str()),
    }
}

impl FactFilter {
    pub fn matches(&self, r: &Registration) -> bool {
        text_matches(&self.wheel_formula, &r.wheel_formula)
            && text_matches(&self.body_type, &r.body_type)
            && self.exact_mass.map_or(true, |m| r.exact_mass == Some(m))
            && text_matches(&self.mass_in_segment_1, &r.mass_in_segment_1)
            && text_matches(&self.weight_in_segment_4, &r.weight_in_segment_4)
            && self.max_month.map_or(true, |cutoff| {
                r.month
                    .is_some_and(|m| m.number_from_month() <= cutoff.number_from_month())
            })
    }
}

impl fmt::Display for FactFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        if let Some(v) = &self.body_type {
            parts.push(v.clone());
        }
        if let Some(v) = &self.wheel_formula {
            parts.push(v.clone());
        }
        if let Some(v) = self.exact_mass {
            parts.push(format!("exact mass {v}"));
        }
        if let Some(v) = &self.mass_in_segment_1 {
            parts.push(format!("mass {v}"));
        }
        if let Some(v) = &self.weight_in_segment_4 {
            parts.push(format!("weight {v}"));
        }
        if let Some(m) = self.max_month {
            parts.push(format!("months 1-{}", m.number_from_month()));
        }
        if parts.is_empty() {
            f.write_str("all registrations")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportDefinition {
    pub id: String,
    pub title: String,
    pub dataset: Dataset,
    pub columns: ColumnSet,
    pub filter: FactFilter,
    pub shape: OutputShape,
}

/// A vehicle configuration shared by the 2023 and 2024 editions of a report.
struct Segment {
    slug: &'static str,
    title: &'static str,
    brands: &'static [&'static str],
    filter: fn() -> FactFilter,
}

fn tractors_4x2() -> FactFilter {
    FactFilter {
        wheel_formula: Some("4x2".into()),
        body_type: Some(TRACTOR.into()),
        exact_mass: Some(18000),
        ..FactFilter::default()
    }
}

fn tractors_6x4() -> FactFilter {
    FactFilter {
        wheel_formula: Some("6x4".into()),
        body_type: Some(TRACTOR.into()),
        exact_mass: Some(25000),
        ..FactFilter::default()
    }
}

fn dumpers_6x4() -> FactFilter {
    FactFilter {
        wheel_formula: Some("6x4".into()),
        body_type: Some(DUMPER.into()),
        mass_in_segment_1: Some("32001-40000".into()),
        ..FactFilter::default()
    }
}

fn dumpers_8x4() -> FactFilter {
    FactFilter {
        wheel_formula: Some("8x4".into()),
        body_type: Some(DUMPER.into()),
        weight_in_segment_4: Some("35001-45000".into()),
        ..FactFilter::default()
    }
}

const SEGMENTS: [Segment; 4] = [
    Segment {
        slug: "tractors4x2",
        title: "Tractor units 4x2, 18 t",
        brands: &["DONGFENG", "FAW", "FOTON", "JAC", "SHACMAN", "SITRAK"],
        filter: tractors_4x2,
    },
    Segment {
        slug: "tractors6x4",
        title: "Tractor units 6x4, 25 t",
        brands: &["DONGFENG", "FAW", "FOTON", "HOWO", "SHACMAN", "SITRAK"],
        filter: tractors_6x4,
    },
    Segment {
        slug: "dumpers6x4",
        title: "Dump trucks 6x4, 32-40 t",
        brands: &["FAW", "HOWO", "JAC", "SANY", "SITRAK"],
        filter: dumpers_6x4,
    },
    Segment {
        slug: "dumpers8x4",
        title: "Dump trucks 8x4, 35-45 t",
        brands: &["FAW", "HOWO", "SHACMAN", "SITRAK"],
        filter: dumpers_8x4,
    },
];

// The 2023 export covers the whole year, so its nine-month reports cut at
// September; the 2024 export already stops there. The 2024 editions are
// grouped by district for the dashboard.
static CATALOG: Lazy<Vec<ReportDefinition>> = Lazy::new(|| {
    let editions = [
        (
            "9m2023",
            "9M 2023",
            Dataset::Registrations2023,
            Some(Month::September),
            OutputShape::Flat,
        ),
        (
            "9m2024",
            "9M 2024",
            Dataset::Registrations2024,
            None,
            OutputShape::ByDistrict,
        ),
    ];
    let mut reports = Vec::new();
    for (prefix, period, dataset, max_month, shape) in editions {
        for segment in &SEGMENTS {
            reports.push(ReportDefinition {
                id: format!("{prefix}{}", segment.slug),
                title: format!("{} ({period})", segment.title),
                dataset,
                columns: ColumnSet::new(segment.brands.iter().copied()),
                filter: FactFilter {
                    max_month,
                    ..(segment.filter)()
                },
                shape,
            });
        }
    }
    reports
});

pub fn catalog() -> &'static [ReportDefinition] {
    &CATALOG
}

pub fn find_report(id: &str) -> Option<&'static ReportDefinition> {
    catalog().iter().find(|r| r.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            federal_district: "Центральный".into(),
            region: "Москва".into(),
            brand: "SITRAK".into(),
            quantity: 3,
            wheel_formula: Some("4x2".into()),
            body_type: Some(TRACTOR.into()),
            exact_mass: Some(18000),
            mass_in_segment_1: None,
            weight_in_segment_4: None,
            month: Some(Month::March),
        }
    }

    #[test]
    fn catalog_has_both_editions_of_every_segment() {
        let ids: Vec<&str> = catalog().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "9m2023tractors4x2",
                "9m2023tractors6x4",
                "9m2023dumpers6x4",
                "9m2023dumpers8x4",
                "9m2024tractors4x2",
                "9m2024tractors6x4",
                "9m2024dumpers6x4",
                "9m2024dumpers8x4",
            ]
        );
    }

    #[test]
    fn editions_differ_in_cutoff_and_shape() {
        let old = find_report("9m2023dumpers8x4").unwrap();
        let new = find_report("9m2024dumpers8x4").unwrap();
        assert_eq!(old.filter.max_month, Some(Month::September));
        assert_eq!(old.shape, OutputShape::Flat);
        assert_eq!(new.filter.max_month, None);
        assert_eq!(new.shape, OutputShape::ByDistrict);
        assert_eq!(old.columns, new.columns);
        assert_eq!(new.columns.brands(), &["FAW", "HOWO", "SHACMAN", "SITRAK"]);
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert!(find_report("9m2023buses").is_none());
    }

    #[test]
    fn filter_requires_every_set_criterion() {
        let filter = (SEGMENTS[0].filter)();
        let mut r = registration();
        assert!(filter.matches(&r));

        r.exact_mass = Some(25000);
        assert!(!filter.matches(&r));

        r.exact_mass = None;
        assert!(!filter.matches(&r));
    }

    #[test]
    fn month_cutoff_is_inclusive_and_rejects_unknown_months() {
        let filter = FactFilter {
            max_month: Some(Month::September),
            ..FactFilter::default()
        };
        let mut r = registration();
        r.month = Some(Month::September);
        assert!(filter.matches(&r));
        r.month = Some(Month::October);
        assert!(!filter.matches(&r));
        r.month = None;
        assert!(!filter.matches(&r));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let mut r = registration();
        r.wheel_formula = None;
        r.month = None;
        assert!(FactFilter::default().matches(&r));
        assert_eq!(FactFilter::default().to_string(), "all registrations");
    }

    #[test]
    fn filter_describes_itself() {
        let report = find_report("9m2023tractors4x2").unwrap();
        assert_eq!(
            report.filter.to_string(),
            "Седельный тягач, 4x2, exact mass 18000, months 1-9"
        );
    }
}
