use std::collections::BTreeSet;

use super::model::{CoffeeDataset, CoffeeRecord};

/// Farm whose volume dominates every mass-based aggregate.
pub const DOMINANT_FARM: &str = "YHAENU PLC FARM";

// ---------------------------------------------------------------------------
// Altitude range
// ---------------------------------------------------------------------------

/// Inclusive altitude window in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltitudeRange {
    pub low: u32,
    pub high: u32,
}

impl AltitudeRange {
    /// Bounds of the altitude slider.
    pub const SELECTABLE: AltitudeRange = AltitudeRange::new(100, 5500);

    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, altitude: u32) -> bool {
        (self.low..=self.high).contains(&altitude)
    }
}

impl Default for AltitudeRange {
    fn default() -> Self {
        Self::SELECTABLE
    }
}

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Sidebar selections. A record is visible when every predicate holds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    pub countries: BTreeSet<String>,
    pub harvest_years: BTreeSet<String>,
    pub altitude: AltitudeRange,
    pub exclude_dominant_farm: bool,
}

impl FilterSpec {
    /// Everything selected: all countries, all harvest years, the full
    /// altitude slider, no farm exclusion.
    pub fn select_all(dataset: &CoffeeDataset) -> Self {
        Self {
            countries: dataset.countries(),
            harvest_years: dataset.harvest_years(),
            altitude: AltitudeRange::default(),
            exclude_dominant_farm: false,
        }
    }

    pub fn matches(&self, record: &CoffeeRecord) -> bool {
        let selected = |set: &BTreeSet<String>, value: &Option<String>| {
            value.as_ref().is_some_and(|v| set.contains(v))
        };
        if !selected(&self.countries, &record.country_of_origin) {
            return false;
        }
        if !selected(&self.harvest_years, &record.harvest_year) {
            return false;
        }
        if self.exclude_dominant_farm && record.farm_name.as_deref() == Some(DOMINANT_FARM) {
            return false;
        }
        self.altitude.contains(record.altitude)
    }

    /// Borrow the records passing all predicates.
    pub fn apply<'a>(&self, dataset: &'a CoffeeDataset) -> FilteredView<'a> {
        FilteredView {
            records: dataset
                .records()
                .iter()
                .filter(|record| self.matches(record))
                .collect(),
        }
    }
}

/// Transient subset of the prepared dataset for one interaction.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a CoffeeRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn records(&self) -> &[&'a CoffeeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
