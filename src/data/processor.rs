//! Data Processor Module
//! Handles data cleaning and derivation (altitude, total mass).

use super::derive::{derive_altitude, total_mass, DeriveError};
use super::model::{CoffeeDataset, CoffeeRecord};
use super::schema::normalize_columns;
use log::{debug, info, warn};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Schema mismatch: missing columns {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("Row {row}: {source}")]
    Derivation {
        row: usize,
        #[source]
        source: DeriveError,
    },
    #[error("Row {row}: missing value in column '{column}'")]
    MissingValue { row: usize, column: &'static str },
    #[error("Row {row}: negative number of bags ({value})")]
    NegativeBags { row: usize, value: i64 },
}

/// One source row as read from the normalized frame, before derivation.
#[derive(Debug, Default)]
struct RawRow {
    country_of_origin: Option<String>,
    farm_name: Option<String>,
    harvest_year: Option<String>,
    variety: Option<String>,
    altitude: Option<String>,
    bag_weight: Option<String>,
    number_of_bags: Option<i64>,
    total_cup_points: Option<f64>,
}

/// Turns a raw review table into the cleaned [`CoffeeDataset`].
pub struct DataProcessor;

impl DataProcessor {
    /// Normalize columns, derive altitude and total mass, and drop rows
    /// whose altitude cannot be resolved.
    ///
    /// A malformed bag weight or bag count aborts preparation. Rows with
    /// no country or harvest year are kept.
    pub fn prepare(raw: &DataFrame) -> Result<CoffeeDataset, PrepareError> {
        let df = normalize_columns(raw)?;
        let rows = Self::read_rows(&df)?;
        let total = rows.len();

        let mut records = Vec::with_capacity(total);
        for (row, raw_row) in rows.into_iter().enumerate() {
            if let Some(record) = Self::clean_row(row, raw_row)? {
                records.push(record);
            }
        }

        let dropped = total - records.len();
        if dropped > 0 {
            warn!("Dropped {dropped} of {total} rows with unresolvable altitude");
        }
        info!("Prepared {} coffee records", records.len());

        Ok(CoffeeDataset::new(records, dropped))
    }

    /// Derive one record. `Ok(None)` means the row is dropped.
    fn clean_row(row: usize, raw: RawRow) -> Result<Option<CoffeeRecord>, PrepareError> {
        let altitude = match raw.altitude.as_deref().map(derive_altitude) {
            Some(Ok(meters)) => meters,
            Some(Err(e)) => {
                debug!("Row {row} dropped: {e}");
                return Ok(None);
            }
            None => {
                debug!("Row {row} dropped: empty altitude");
                return Ok(None);
            }
        };

        let bag_weight = raw.bag_weight.ok_or(PrepareError::MissingValue {
            row,
            column: "bag_weight",
        })?;
        let bags = raw.number_of_bags.ok_or(PrepareError::MissingValue {
            row,
            column: "number_of_bags",
        })?;
        let number_of_bags =
            u64::try_from(bags).map_err(|_| PrepareError::NegativeBags { row, value: bags })?;

        let total_mass = total_mass(&bag_weight, number_of_bags)
            .map_err(|source| PrepareError::Derivation { row, source })?;

        Ok(Some(CoffeeRecord {
            country_of_origin: raw.country_of_origin,
            farm_name: raw.farm_name,
            harvest_year: raw.harvest_year,
            variety: raw.variety,
            altitude,
            bag_weight,
            number_of_bags,
            total_mass,
            total_cup_points: raw.total_cup_points.unwrap_or(f64::NAN),
        }))
    }

    fn read_rows(df: &DataFrame) -> Result<Vec<RawRow>, PrepareError> {
        let mut countries = Self::text_values(df, "country_of_origin")?.into_iter();
        let mut farms = Self::text_values(df, "farm_name")?.into_iter();
        let mut years = Self::text_values(df, "harvest_year")?.into_iter();
        let mut varieties = Self::text_values(df, "variety")?.into_iter();
        let mut altitudes = Self::text_values(df, "altitude")?.into_iter();
        let mut bag_weights = Self::text_values(df, "bag_weight")?.into_iter();
        let mut bags = Self::integer_values(df, "number_of_bags")?.into_iter();
        let mut points = Self::float_values(df, "total_cup_points")?.into_iter();

        Ok((0..df.height())
            .map(|_| RawRow {
                country_of_origin: countries.next().flatten(),
                farm_name: farms.next().flatten(),
                harvest_year: years.next().flatten(),
                variety: varieties.next().flatten(),
                altitude: altitudes.next().flatten(),
                bag_weight: bag_weights.next().flatten(),
                number_of_bags: bags.next().flatten(),
                total_cup_points: points.next().flatten(),
            })
            .collect())
    }

    /// Read a column as text. Float columns go through Int64 first so an
    /// inferred `1500.0` reads as "1500".
    fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, PrepareError> {
        let column = df.column(name)?;
        let column = if column.dtype().is_float() {
            column.cast(&DataType::Int64)?
        } else {
            column.clone()
        };
        let text = column.cast(&DataType::String)?;
        Ok(text
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .collect())
    }

    fn integer_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, PrepareError> {
        let column = df.column(name)?.cast(&DataType::Int64)?;
        Ok(column.i64()?.into_iter().collect())
    }

    fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, PrepareError> {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        Ok(column.f64()?.into_iter().collect())
    }
}
