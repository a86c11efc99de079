//! Row Derivation Module
//! Pure per-row functions that turn raw spreadsheet text into typed values.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// ASCII digit runs only; `\d` would also match non-ASCII digits.
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("Altitude {0:?} has no usable number")]
    UnresolvableAltitude(String),
    #[error("Bag weight {0:?} has no numeric component")]
    MalformedBagWeight(String),
    #[error("Total mass overflows for {bag_weight:?} x {bags} bags")]
    MassOverflow { bag_weight: String, bags: u64 },
}

/// Extract every run of ASCII digits, in order of appearance.
///
/// Returns `None` if a run does not fit in a `u64`.
pub fn digit_runs(raw: &str) -> Option<Vec<u64>> {
    DIGIT_RUN
        .find_iter(raw)
        .map(|m| m.as_str().parse::<u64>().ok())
        .collect()
}

/// Derive an altitude in meters from the raw altitude text.
///
/// A plain integer is used as is. Otherwise the first and last digit runs
/// are averaged with truncating division ("1200-1400" -> 1300).
pub fn derive_altitude(raw: &str) -> Result<u32, DeriveError> {
    let unresolvable = || DeriveError::UnresolvableAltitude(raw.to_string());

    if let Ok(meters) = raw.trim().parse::<u32>() {
        return Ok(meters);
    }

    let runs = digit_runs(raw).ok_or_else(unresolvable)?;
    let (Some(&first), Some(&last)) = (runs.first(), runs.last()) else {
        return Err(unresolvable());
    };

    // u64 halves cannot overflow where the sum could
    let mean = first / 2 + last / 2 + (first % 2 + last % 2) / 2;
    u32::try_from(mean).map_err(|_| unresolvable())
}

/// Per-bag weight in kilograms: the first digit run of e.g. "60 kg".
pub fn bag_weight_kg(raw: &str) -> Result<u64, DeriveError> {
    DIGIT_RUN
        .find(raw)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| DeriveError::MalformedBagWeight(raw.to_string()))
}

/// Gross lot mass: per-bag weight times number of bags.
pub fn total_mass(bag_weight: &str, bags: u64) -> Result<u64, DeriveError> {
    bag_weight_kg(bag_weight)?
        .checked_mul(bags)
        .ok_or_else(|| DeriveError::MassOverflow {
            bag_weight: bag_weight.to_string(),
            bags,
        })
}
