//! End-to-end: CSV exports on disk -> catalog reports -> JSON/CSV files.

use std::fs;
use std::path::Path;

use truck_report::reports::{export_report, run_report_by_id};
use truck_report::{catalog, CsvFactSource, Dataset, ReportData};

const HEADER: &str = "Federal_district,Region,Brand,Quantity,Wheel_formula,Body_type,Exact_mass,Mass_in_segment_1,Weight_in_segment_4,Month_of_registration";

const ROWS: &str = "\
Центральный,Москва,SITRAK,4,4x2,Седельный тягач,18000,,,2
Центральный,Москва,SITRAK,1,4x2,Седельный тягач,18000,,,11
Центральный,Московская область,FAW,3,4x2,Седельный тягач,18000,,,5
Центральный,Московская область,HOWO,2,6x4,Самосвал,,32001-40000,,6
Уральский,Свердловская область,HOWO,6,8x4,Самосвал,,,35001-45000,1
Уральский,Свердловская область,SHACMAN,2,8x4,Самосвал,,,35001-45000,3
Уральский,Свердловская область,SITRAK,1,6x4,Седельный тягач,25000,,,7
Сибирский,Новосибирская область,KAMAZ,10,4x2,Седельный тягач,18000,,,1
broken row
";

fn write_datasets(dir: &Path) {
    for dataset in Dataset::ALL {
        let path = dir.join(format!("{}.csv", dataset.file_stem()));
        fs::write(path, format!("{HEADER}\n{ROWS}")).unwrap();
    }
}

#[test]
fn every_catalog_report_exports() {
    let data = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_datasets(data.path());
    let mut source = CsvFactSource::new(data.path());

    for report in catalog() {
        let rows = export_report(report, &mut source, out.path()).unwrap();
        assert!(out.path().join(format!("{}.json", report.id)).exists());
        assert!(out.path().join(format!("{}.csv", report.id)).exists());
        // Every district shows up as regions followed by exactly one rollup.
        for pair in rows.windows(2) {
            if pair[0].is_rollup() {
                assert_ne!(pair[0].federal_district, pair[1].federal_district);
            }
        }
        if let Some(last) = rows.last() {
            assert!(last.is_rollup());
        }
    }
}

#[test]
fn nine_month_2023_tractors_skip_november() {
    let data = tempfile::tempdir().unwrap();
    write_datasets(data.path());
    let mut source = CsvFactSource::new(data.path());

    let response = run_report_by_id("9m2023tractors4x2", &mut source);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "data": [
                {"region_name": "Москва", "dongfeng": null, "faw": null, "foton": null,
                 "jac": null, "shacman": null, "sitrak": 4, "total": 4},
                {"region_name": "Московская область", "dongfeng": null, "faw": 3, "foton": null,
                 "jac": null, "shacman": null, "sitrak": null, "total": 3},
                {"region_name": "Центральный", "dongfeng": null, "faw": 3, "foton": null,
                 "jac": null, "shacman": null, "sitrak": 4, "total": 7}
            ]
        })
    );
}

#[test]
fn nine_month_2024_dumpers_group_by_district() {
    let data = tempfile::tempdir().unwrap();
    write_datasets(data.path());
    let mut source = CsvFactSource::new(data.path());

    let response = run_report_by_id("9m2024dumpers8x4", &mut source);
    let Some(ReportData::ByDistrict(map)) = response.data else {
        panic!("expected grouped data");
    };
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Уральский"]);

    let ural = &map["Уральский"];
    assert_eq!(ural.len(), 2);
    assert_eq!(ural[0].region_name(), "Свердловская область");
    assert_eq!(ural[1].region_name(), "Уральский");
    assert_eq!(ural[1].get("HOWO"), Some(6));
    assert_eq!(ural[1].get("SHACMAN"), Some(2));
    assert_eq!(ural[1].get("FAW"), None);
    assert_eq!(ural[1].total(), 8);
}

#[test]
fn missing_exports_produce_error_envelopes() {
    let data = tempfile::tempdir().unwrap();
    let mut source = CsvFactSource::new(data.path());

    let json = serde_json::to_value(run_report_by_id("9m2024tractors6x4", &mut source)).unwrap();
    assert!(json.get("data").is_none());
    assert!(json["error"].as_str().unwrap().contains("Failed to load registrations"));
}
