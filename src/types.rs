use chrono::Month;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;

/// One line of a registration dataset export, exactly as it sits in the CSV.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Federal_district")]
    pub federal_district: Option<String>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Brand")]
    pub brand: Option<String>,
    #[serde(rename = "Quantity")]
    pub quantity: Option<String>,
    #[serde(rename = "Wheel_formula")]
    pub wheel_formula: Option<String>,
    #[serde(rename = "Body_type")]
    pub body_type: Option<String>,
    #[serde(rename = "Exact_mass")]
    pub exact_mass: Option<String>,
    #[serde(rename = "Mass_in_segment_1")]
    pub mass_in_segment_1: Option<String>,
    #[serde(rename = "Weight_in_segment_4")]
    pub weight_in_segment_4: Option<String>,
    #[serde(rename = "Month_of_registration")]
    pub month_of_registration: Option<String>,
}

/// A cleaned registration record. Report filters run against these.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub federal_district: String,
    pub region: String,
    pub brand: String,
    pub quantity: u64,
    pub wheel_formula: Option<String>,
    pub body_type: Option<String>,
    pub exact_mass: Option<u32>,
    pub mass_in_segment_1: Option<String>,
    pub weight_in_segment_4: Option<String>,
    pub month: Option<Month>,
}

/// Input to the aggregation engine: a quantity of one brand registered in one
/// region of one federal district.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub federal_district: String,
    pub region: String,
    pub brand: String,
    pub quantity: u64,
}

impl Fact {
    pub fn new(
        federal_district: impl Into<String>,
        region: impl Into<String>,
        brand: impl Into<String>,
        quantity: u64,
    ) -> Self {
        Self {
            federal_district: federal_district.into(),
            region: region.into(),
            brand: brand.into(),
            quantity,
        }
    }
}

impl From<&Registration> for Fact {
    fn from(r: &Registration) -> Self {
        Fact::new(
            r.federal_district.clone(),
            r.region.clone(),
            r.brand.clone(),
            r.quantity,
        )
    }
}

/// Ordered set of brands pivoted into columns for one report.
///
/// Duplicates are dropped on construction (first occurrence wins) so a brand
/// can never be counted twice in a row total. The storage is shared, so every
/// row produced by one run points at the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet(Arc<[String]>);

impl ColumnSet {
    pub fn new<I, S>(brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for brand in brands {
            let brand = brand.into();
            if !unique.contains(&brand) {
                unique.push(brand);
            }
        }
        ColumnSet(unique.into())
    }

    pub fn brands(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column index of `brand`, or `None` if the report does not pivot it.
    pub fn position(&self, brand: &str) -> Option<usize> {
        self.0.iter().position(|b| b == brand)
    }

    pub fn contains(&self, brand: &str) -> bool {
        self.position(brand).is_some()
    }
}

/// One output row: a region (or a federal-district rollup) with one optional
/// quantity per brand column and the row total.
///
/// Fields are private so that `total` always equals the sum of the present
/// brand values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    region_name: String,
    columns: ColumnSet,
    values: Vec<Option<u64>>,
    total: u64,
}

impl RegionRow {
    /// Build a row from per-column values laid out in `columns` order.
    pub fn new(
        region_name: impl Into<String>,
        columns: ColumnSet,
        values: Vec<Option<u64>>,
    ) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        let total = values
            .iter()
            .flatten()
            .fold(0u64, |acc, v| acc.saturating_add(*v));
        Self {
            region_name: region_name.into(),
            columns,
            values,
            total,
        }
    }

    pub fn region_name(&self) -> &str {
        &self.region_name
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    /// Quantity for `brand`; `None` both for "no facts" and for brands outside
    /// the column set.
    pub fn get(&self, brand: &str) -> Option<u64> {
        self.columns
            .position(brand)
            .and_then(|idx| self.values.get(idx).copied().flatten())
    }

    /// Brand/value pairs in column order.
    pub fn per_brand(&self) -> impl Iterator<Item = (&str, Option<u64>)> + '_ {
        self.columns
            .brands()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

// Brand columns are only known at runtime, so the JSON object is written by
// hand: region_name, one lower-case key per brand (null when absent), total.
impl Serialize for RegionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 2))?;
        map.serialize_entry("region_name", &self.region_name)?;
        for (brand, value) in self.per_brand() {
            map.serialize_entry(&brand.to_lowercase(), &value)?;
        }
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

/// Engine output element: a row together with the federal district it was
/// grouped under. Rollup rows carry their district's name as region name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictRow {
    pub federal_district: String,
    pub row: RegionRow,
}

impl DistrictRow {
    pub fn is_rollup(&self) -> bool {
        self.row.region_name() == self.federal_district
    }
}
