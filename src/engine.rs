// Rollup-and-pivot engine.
//
// Takes flat registration facts and produces one row per region plus one
// total row per federal district, with every brand of the report pivoted
// into its own column. Pure and synchronous: no I/O, no shared state.
use crate::types::{ColumnSet, DistrictRow, Fact, RegionRow};
use std::collections::HashMap;

/// (federal district, region, column index)
type GroupKey = (String, String, usize);

/// Aggregate `facts` into district-tagged rows for the brands in `columns`.
///
/// Output order: federal district ascending, then each district's regions
/// ascending, then the district's own rollup row (the row whose region name
/// equals the district). Facts for brands outside `columns` are ignored and
/// never reach a column or a total.
pub fn aggregate(facts: &[Fact], columns: &ColumnSet) -> Vec<DistrictRow> {
    let base = group_facts(facts, columns);
    let rollups = roll_up_districts(&base);
    let mut rows = pivot(base.into_iter().chain(rollups), columns);
    sort_rows(&mut rows);
    rows
}

/// Sum quantities per (district, region, brand). Repeated facts add up.
/// Every sum in the engine saturates at `u64::MAX` instead of wrapping.
fn group_facts(facts: &[Fact], columns: &ColumnSet) -> HashMap<GroupKey, u64> {
    let mut groups: HashMap<GroupKey, u64> = HashMap::new();
    for f in facts {
        let Some(idx) = columns.position(&f.brand) else {
            continue;
        };
        let key = (f.federal_district.clone(), f.region.clone(), idx);
        let sum = groups.entry(key).or_insert(0);
        *sum = sum.saturating_add(f.quantity);
    }
    groups
}

/// One synthetic group per (district, brand), keyed with the district name in
/// the region slot. Built from the grouped data, not the raw facts.
fn roll_up_districts(base: &HashMap<GroupKey, u64>) -> HashMap<GroupKey, u64> {
    let mut totals: HashMap<GroupKey, u64> = HashMap::new();
    for ((district, _region, idx), qty) in base {
        let sum = totals
            .entry((district.clone(), district.clone(), *idx))
            .or_insert(0);
        *sum = sum.saturating_add(*qty);
    }
    totals
}

fn pivot<I>(groups: I, columns: &ColumnSet) -> Vec<DistrictRow>
where
    I: IntoIterator<Item = (GroupKey, u64)>,
{
    let mut cells: HashMap<(String, String), Vec<Option<u64>>> = HashMap::new();
    for ((district, region, idx), qty) in groups {
        let values = cells
            .entry((district, region))
            .or_insert_with(|| vec![None; columns.len()]);
        values[idx] = Some(values[idx].unwrap_or(0).saturating_add(qty));
    }

    cells
        .into_iter()
        .map(|((federal_district, region), values)| DistrictRow {
            federal_district,
            row: RegionRow::new(region, columns.clone(), values),
        })
        .collect()
}

fn sort_rows(rows: &mut [DistrictRow]) {
    rows.sort_by(|a, b| {
        a.federal_district
            .cmp(&b.federal_district)
            .then_with(|| a.is_rollup().cmp(&b.is_rollup()))
            .then_with(|| a.row.region_name().cmp(b.row.region_name()))
    });
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
