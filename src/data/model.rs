//! Data Model
//! Cleaned coffee lot records and the immutable prepared dataset.

use serde::Serialize;
use std::collections::BTreeSet;

/// One reviewed coffee lot after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoffeeRecord {
    /// `None` rows never pass a country selection.
    pub country_of_origin: Option<String>,
    pub farm_name: Option<String>,
    /// `None` rows never pass a harvest-year selection.
    pub harvest_year: Option<String>,
    pub variety: Option<String>,
    /// Meters above sea level.
    pub altitude: u32,
    pub bag_weight: String,
    pub number_of_bags: u64,
    /// Kilograms.
    pub total_mass: u64,
    /// Cupping score; NaN when the source cell was empty.
    pub total_cup_points: f64,
}

/// The cleaned record set. Built once per source and never mutated.
#[derive(Debug, Clone, Default)]
pub struct CoffeeDataset {
    records: Vec<CoffeeRecord>,
    dropped_rows: usize,
}

impl CoffeeDataset {
    pub fn new(records: Vec<CoffeeRecord>, dropped_rows: usize) -> Self {
        Self {
            records,
            dropped_rows,
        }
    }

    pub fn records(&self) -> &[CoffeeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows removed because their altitude could not be derived.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    /// Distinct countries present, sorted.
    pub fn countries(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.country_of_origin.clone())
            .collect()
    }

    /// Distinct harvest years present, sorted.
    pub fn harvest_years(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter_map(|r| r.harvest_year.clone())
            .collect()
    }
}
