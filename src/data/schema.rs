//! Column Schema Module
//! Normalizes source column labels and drops columns the dashboard never reads.

use super::processor::PrepareError;
use polars::prelude::*;

/// Source labels (already lowercased) with their canonical names.
pub const COLUMN_RENAMES: [(&str, &str); 18] = [
    ("country of origin", "country_of_origin"),
    ("farm name", "farm_name"),
    ("lot number", "lot_number"),
    ("ico number", "ico_number"),
    ("number of bags", "number_of_bags"),
    ("bag weight", "bag_weight"),
    ("in-country partner", "in_country_partner"),
    ("harvest year", "harvest_year"),
    ("grading date", "grading_date"),
    ("processing method", "processing_method"),
    ("clean cup", "clean_cup"),
    ("total cup points", "total_cup_points"),
    ("moisture percentage", "moisture_percentage"),
    ("category one defects", "category_one_defects"),
    ("category two defects", "category_two_defects"),
    ("certification body", "certification_body"),
    ("certification address", "certification_address"),
    ("certification contact", "certification_contact"),
];

/// Canonical columns irrelevant to the dashboard.
pub const EXCLUDED_COLUMNS: [&str; 11] = [
    "mill",
    "ico_number",
    "producer",
    "in_country_partner",
    "owner",
    "status",
    "defects",
    "quakers",
    "certification_body",
    "certification_address",
    "certification_contact",
];

/// Canonical columns the cleaning pass reads.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "country_of_origin",
    "farm_name",
    "harvest_year",
    "variety",
    "altitude",
    "bag_weight",
    "number_of_bags",
    "total_cup_points",
];

/// Map a raw label to its lowercase snake_case canonical name.
pub fn canonical_name(label: &str) -> String {
    let lower = label.trim().to_lowercase();
    COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == lower)
        .map(|(_, to)| to.to_string())
        .unwrap_or_else(|| lower.replace([' ', '-'], "_"))
}

/// Spreadsheet exports carry the writer's row index as an unnamed column.
fn is_index_column(name: &str) -> bool {
    name.is_empty() || name.starts_with("unnamed")
}

/// Rename every column to its canonical name and drop excluded ones.
///
/// Fails with [`PrepareError::SchemaMismatch`] listing every required
/// column that is absent after renaming.
pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame, PrepareError> {
    let columns: Vec<Column> = df
        .get_columns()
        .iter()
        .filter_map(|column| {
            let name = canonical_name(column.name());
            if is_index_column(&name) || EXCLUDED_COLUMNS.contains(&name.as_str()) {
                return None;
            }
            Some(column.clone().with_name(name.into()))
        })
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|c| c.name().as_str() == **required))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(PrepareError::SchemaMismatch { missing });
    }

    Ok(DataFrame::new(columns)?)
}
