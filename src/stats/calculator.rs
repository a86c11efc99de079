//! Statistics Calculator Module
//! Computes the dashboard KPIs and grouped aggregates for a filter selection.

use crate::data::{CoffeeDataset, CoffeeRecord, FilterSpec, FilteredView};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Varieties shown in the rating-by-variety chart.
pub const TOP_VARIETIES: [&str; 8] = [
    "Caturra",
    "Gesha",
    "Typica",
    "Bourbon",
    "Catuai",
    "unknown",
    "Catimor",
    "Ethiopian Heirlooms",
];

pub const MASS_BY_VARIETY_LIMIT: usize = 20;
pub const VARIETY_COUNT_LIMIT: usize = 8;

/// One bar of a grouped aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    pub label: String,
    pub value: T,
}

impl<T> Ranked<T> {
    pub fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Headline figures. NaN marks a statistic undefined for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    /// Kilograms.
    pub total_mass: u64,
    /// Mean cupping score, one decimal.
    pub average_rating: f64,
    /// Median lot mass in kilograms, rounded. Taken over lots, not farms.
    pub median_mass: f64,
}

impl Kpis {
    /// One star per ten rating points.
    pub fn star_count(&self) -> usize {
        if self.average_rating.is_nan() {
            return 0;
        }
        round_to(self.average_rating / 10.0, 0).max(0.0) as usize
    }

    pub fn mass_label(&self) -> String {
        format!("{} KG", with_thousands(self.total_mass))
    }

    pub fn rating_label(&self) -> String {
        if self.average_rating.is_nan() {
            return "No data".to_string();
        }
        format!(
            "{:.1} {}",
            self.average_rating,
            "⭐".repeat(self.star_count())
        )
    }

    pub fn median_label(&self) -> String {
        if self.median_mass.is_nan() {
            return "No data".to_string();
        }
        format!("{:.0} KG", self.median_mass)
    }
}

/// Everything the presentation layer draws for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub record_count: usize,
    pub kpis: Kpis,
    pub mass_by_country: Vec<Ranked<u64>>,
    pub rating_by_country: Vec<Ranked<f64>>,
    /// Over the full dataset; ignores the sidebar filters.
    pub rating_by_variety: Vec<Ranked<f64>>,
    pub mass_by_variety_top20: Vec<Ranked<u64>>,
    /// Over the full dataset; ignores the sidebar filters.
    pub variety_counts_top8: Vec<Ranked<usize>>,
}

impl DashboardSummary {
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Handles the aggregation pass over a filtered view.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Recompute the whole dashboard for a filter selection.
    pub fn recompute(dataset: &CoffeeDataset, filter: &FilterSpec) -> DashboardSummary {
        let view = filter.apply(dataset);
        if view.is_empty() {
            log::debug!("Current selection matches no lots");
        }
        log::debug!(
            "Recomputing dashboard: {} of {} records visible",
            view.len(),
            dataset.len()
        );
        Self::summarize(dataset, &view)
    }

    pub fn summarize(dataset: &CoffeeDataset, view: &FilteredView<'_>) -> DashboardSummary {
        let visible = || view.records().iter().copied();
        let full = || dataset.records().iter();

        let mass_by_variety = Self::mass_by(visible(), |r| r.variety.as_deref())
            .into_iter()
            .take(MASS_BY_VARIETY_LIMIT)
            .collect();

        DashboardSummary {
            record_count: view.len(),
            kpis: Self::compute_kpis(view),
            mass_by_country: Self::mass_by(visible(), |r| r.country_of_origin.as_deref()),
            rating_by_country: Self::rating_by(visible(), |r| r.country_of_origin.as_deref()),
            rating_by_variety: Self::rating_by(
                full().filter(|r| Self::is_top_variety(r)),
                |r| r.variety.as_deref(),
            ),
            mass_by_variety_top20: mass_by_variety,
            variety_counts_top8: Self::variety_counts(dataset, VARIETY_COUNT_LIMIT),
        }
    }

    pub fn compute_kpis(view: &FilteredView<'_>) -> Kpis {
        let masses: Vec<f64> = view.records().iter().map(|r| r.total_mass as f64).collect();
        let ratings: Vec<f64> = view
            .records()
            .iter()
            .map(|r| r.total_cup_points)
            .filter(|v| !v.is_nan())
            .collect();

        Kpis {
            total_mass: view
                .records()
                .iter()
                .fold(0, |acc: u64, r| acc.saturating_add(r.total_mass)),
            average_rating: round_to(ratings.iter().mean(), 1),
            median_mass: round_to(Self::median(&masses), 0),
        }
    }

    /// Median of unsorted values; NaN for an empty slice.
    pub fn median(values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Number of lots per variety over the full dataset, most common first.
    pub fn variety_counts(dataset: &CoffeeDataset, limit: usize) -> Vec<Ranked<usize>> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for variety in dataset.records().iter().filter_map(|r| r.variety.as_deref()) {
            *counts.entry(variety.to_string()).or_default() += 1;
        }
        let mut ranked = rank(counts, |a, b| b.cmp(a));
        ranked.truncate(limit);
        ranked
    }

    fn is_top_variety(record: &CoffeeRecord) -> bool {
        record
            .variety
            .as_deref()
            .is_some_and(|v| TOP_VARIETIES.contains(&v))
    }

    /// Summed mass per group, heaviest first. Records without a key are skipped.
    fn mass_by<'a>(
        records: impl Iterator<Item = &'a CoffeeRecord>,
        key: impl Fn(&'a CoffeeRecord) -> Option<&'a str>,
    ) -> Vec<Ranked<u64>> {
        let mut sums: BTreeMap<String, u64> = BTreeMap::new();
        for record in records {
            if let Some(group) = key(record) {
                let sum = sums.entry(group.to_string()).or_default();
                *sum = sum.saturating_add(record.total_mass);
            }
        }
        rank(sums, |a, b| b.cmp(a))
    }

    /// Mean rating per group, best first. Groups with no ratings sort last.
    fn rating_by<'a>(
        records: impl Iterator<Item = &'a CoffeeRecord>,
        key: impl Fn(&'a CoffeeRecord) -> Option<&'a str>,
    ) -> Vec<Ranked<f64>> {
        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in records {
            if let Some(group) = key(record) {
                let ratings = groups.entry(group.to_string()).or_default();
                if !record.total_cup_points.is_nan() {
                    ratings.push(record.total_cup_points);
                }
            }
        }
        let means: BTreeMap<String, f64> = groups
            .into_iter()
            .map(|(group, ratings)| (group, ratings.iter().mean()))
            .collect();
        rank(means, |a: &f64, b: &f64| descending_nan_last(*a, *b))
    }
}

/// Order groups by value; the stable sort keeps ties in label order.
fn rank<T>(groups: BTreeMap<String, T>, cmp: impl Fn(&T, &T) -> Ordering) -> Vec<Ranked<T>> {
    let mut ranked: Vec<Ranked<T>> = groups
        .into_iter()
        .map(|(label, value)| Ranked { label, value })
        .collect();
    ranked.sort_by(|a, b| cmp(&a.value, &b.value));
    ranked
}

fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Round the stored binary value to `decimals` places, ties to even:
/// 85.65 is stored just above the tie and gives 85.7. NaN stays NaN.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Format with comma thousands separators: 1234567 -> "1,234,567".
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AltitudeRange, DOMINANT_FARM};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn lot(country: &str, farm: &str, variety: Option<&str>, mass: u64, points: f64) -> CoffeeRecord {
        CoffeeRecord {
            country_of_origin: Some(country.to_string()),
            farm_name: Some(farm.to_string()),
            harvest_year: Some("2022".to_string()),
            variety: variety.map(str::to_string),
            altitude: 1500,
            bag_weight: "1 kg".to_string(),
            number_of_bags: mass,
            total_mass: mass,
            total_cup_points: points,
        }
    }

    fn dataset() -> CoffeeDataset {
        CoffeeDataset::new(
            vec![
                lot("Ethiopia", DOMINANT_FARM, Some("Ethiopian Heirlooms"), 9000, 86.0),
                lot("Ethiopia", "Guji", Some("Ethiopian Heirlooms"), 300, 87.0),
                lot("Colombia", "Finca", Some("Caturra"), 600, 84.0),
                lot("Colombia", "Finca", Some("Castillo"), 200, 83.0),
                lot("Panama", "Hacienda", Some("Gesha"), 100, 89.0),
                lot("Kenya", "Estate", None, 400, 85.0),
            ],
            0,
        )
    }

    #[test]
    fn kpis_over_full_selection() {
        let ds = dataset();
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        assert_eq!(summary.record_count, 6);
        assert_eq!(summary.kpis.total_mass, 10_600);
        // (86 + 87 + 84 + 83 + 89 + 85) / 6 = 85.666...
        assert_eq!(summary.kpis.average_rating, 85.7);
        // sorted masses 100 200 300 400 600 9000 -> (300 + 400) / 2
        assert_eq!(summary.kpis.median_mass, 350.0);
        assert_eq!(summary.kpis.star_count(), 9);
    }

    #[test]
    fn mass_and_rating_by_country_sort_descending() {
        let ds = dataset();
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        assert_eq!(
            summary.mass_by_country,
            vec![
                Ranked::new("Ethiopia", 9300),
                Ranked::new("Colombia", 800),
                Ranked::new("Kenya", 400),
                Ranked::new("Panama", 100),
            ]
        );
        let order: Vec<&str> = summary
            .rating_by_country
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(order, vec!["Panama", "Ethiopia", "Kenya", "Colombia"]);
    }

    #[test]
    fn variety_aggregates() {
        let ds = dataset();
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        // Castillo is not in the allow-list; the unnamed variety is skipped
        assert_eq!(
            summary.rating_by_variety,
            vec![
                Ranked::new("Gesha", 89.0),
                Ranked::new("Ethiopian Heirlooms", 86.5),
                Ranked::new("Caturra", 84.0),
            ]
        );
        assert_eq!(summary.mass_by_variety_top20[0], Ranked::new("Ethiopian Heirlooms", 9300));
        assert_eq!(summary.mass_by_variety_top20.len(), 4);
        assert_eq!(summary.variety_counts_top8[0], Ranked::new("Ethiopian Heirlooms", 2));
        assert_eq!(summary.variety_counts_top8.len(), 4);
    }

    #[test]
    fn variety_views_ignore_sidebar_filters() {
        let ds = dataset();
        let all = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        let mut narrow = FilterSpec::select_all(&ds);
        narrow.countries = BTreeSet::from(["Kenya".to_string()]);
        narrow.altitude = AltitudeRange::new(1400, 1600);
        narrow.exclude_dominant_farm = true;
        let filtered = StatsCalculator::recompute(&ds, &narrow);

        assert_eq!(filtered.record_count, 1);
        assert_eq!(filtered.rating_by_variety, all.rating_by_variety);
        assert_eq!(filtered.variety_counts_top8, all.variety_counts_top8);
        assert_ne!(filtered.mass_by_country, all.mass_by_country);
    }

    #[test]
    fn empty_view_degrades_to_sentinels() {
        let ds = dataset();
        let mut filter = FilterSpec::select_all(&ds);
        filter.countries = BTreeSet::from(["Atlantis".to_string()]);

        let summary = StatsCalculator::recompute(&ds, &filter);

        assert!(summary.is_empty());
        assert_eq!(summary.kpis.total_mass, 0);
        assert!(summary.kpis.average_rating.is_nan());
        assert!(summary.kpis.median_mass.is_nan());
        assert_eq!(summary.kpis.star_count(), 0);
        assert_eq!(summary.kpis.rating_label(), "No data");
        assert_eq!(summary.kpis.median_label(), "No data");
        assert!(summary.mass_by_country.is_empty());
        assert!(summary.rating_by_country.is_empty());
        assert!(summary.mass_by_variety_top20.is_empty());
    }

    #[test]
    fn excluding_dominant_farm_never_increases_mass() {
        let ds = dataset();
        let mut filter = FilterSpec::select_all(&ds);
        let with_farm = StatsCalculator::recompute(&ds, &filter).kpis.total_mass;
        filter.exclude_dominant_farm = true;
        let without_farm = StatsCalculator::recompute(&ds, &filter).kpis.total_mass;

        assert_eq!(with_farm - without_farm, 9000);

        let no_dominant = CoffeeDataset::new(ds.records()[1..].to_vec(), 0);
        let mut filter = FilterSpec::select_all(&no_dominant);
        let before = StatsCalculator::recompute(&no_dominant, &filter).kpis.total_mass;
        filter.exclude_dominant_farm = true;
        let after = StatsCalculator::recompute(&no_dominant, &filter).kpis.total_mass;
        assert_eq!(before, after);
    }

    #[test]
    fn mass_by_variety_keeps_top_twenty() {
        let records = (0..25)
            .map(|i| lot("Peru", "Coop", Some(format!("V{i:02}").as_str()), 100 + i, 84.0))
            .collect();
        let ds = CoffeeDataset::new(records, 0);
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        assert_eq!(summary.mass_by_variety_top20.len(), 20);
        assert_eq!(summary.mass_by_variety_top20[0], Ranked::new("V24", 124));
        assert_eq!(summary.mass_by_variety_top20[19], Ranked::new("V05", 105));
        assert_eq!(summary.variety_counts_top8.len(), 8);
    }

    #[test]
    fn unrated_groups_sort_last() {
        let ds = CoffeeDataset::new(
            vec![
                lot("Peru", "A", None, 10, f64::NAN),
                lot("Brazil", "B", None, 10, 82.0),
                lot("Kenya", "C", None, 10, 88.0),
            ],
            0,
        );
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        let labels: Vec<&str> = summary
            .rating_by_country
            .iter()
            .map(|r| r.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Kenya", "Brazil", "Peru"]);
        assert!(summary.rating_by_country[2].value.is_nan());
        assert_eq!(summary.kpis.average_rating, 85.0);
    }

    #[test]
    fn median_rounds_half_to_even() {
        assert_eq!(round_to(StatsCalculator::median(&[600.0, 601.0]), 0), 600.0);
        assert_eq!(round_to(StatsCalculator::median(&[601.0, 602.0]), 0), 602.0);
        assert_eq!(StatsCalculator::median(&[5.0, 1.0, 3.0]), 3.0);
        assert!(StatsCalculator::median(&[]).is_nan());
    }

    #[test]
    fn rating_rounds_the_stored_value() {
        // 85.65 is stored as 85.6500000000000057
        assert_eq!(round_to(85.65, 1), 85.7);
        assert_eq!(round_to(86.35, 1), 86.3);
        assert_eq!(round_to(83.45, 1), 83.5);
        assert!(round_to(f64::NAN, 1).is_nan());

        let ds = CoffeeDataset::new(
            vec![
                lot("Peru", "A", None, 10, 85.58),
                lot("Peru", "B", None, 10, 85.72),
            ],
            0,
        );
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));
        assert_eq!(summary.kpis.average_rating, 85.7);
    }

    #[test]
    fn rows_without_country_still_count_in_variety_views() {
        let mut stray = lot("Peru", "Nameless", Some("Gesha"), 50, 80.0);
        stray.country_of_origin = None;
        stray.harvest_year = None;
        let mut records = dataset().records().to_vec();
        records.push(stray);
        let ds = CoffeeDataset::new(records, 0);

        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        assert_eq!(summary.record_count, 6);
        assert_eq!(summary.kpis.total_mass, 10_600);
        assert_eq!(summary.variety_counts_top8[1], Ranked::new("Gesha", 2));
        assert!(summary
            .rating_by_variety
            .contains(&Ranked::new("Gesha", 84.5)));
    }

    #[test]
    fn mass_sums_saturate_instead_of_overflowing() {
        let heavy = u64::MAX / 2 + 1;
        let ds = CoffeeDataset::new(
            vec![
                lot("Peru", "A", Some("Typica"), heavy, 84.0),
                lot("Peru", "B", Some("Typica"), heavy, 84.0),
            ],
            0,
        );
        let summary = StatsCalculator::recompute(&ds, &FilterSpec::select_all(&ds));

        assert_eq!(summary.kpis.total_mass, u64::MAX);
        assert_eq!(summary.mass_by_country, vec![Ranked::new("Peru", u64::MAX)]);
        assert_eq!(summary.mass_by_variety_top20[0].value, u64::MAX);
    }

    #[test]
    fn star_count_rounds_half_to_even() {
        let kpis = |rating| Kpis {
            total_mass: 0,
            average_rating: rating,
            median_mass: 0.0,
        };
        assert_eq!(kpis(85.0).star_count(), 8);
        assert_eq!(kpis(85.1).star_count(), 9);
        assert_eq!(kpis(84.9).star_count(), 8);
        assert_eq!(kpis(85.0).rating_label(), "85.0 ⭐⭐⭐⭐⭐⭐⭐⭐");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(with_thousands(0), "0");
        assert_eq!(with_thousands(999), "999");
        assert_eq!(with_thousands(1_000), "1,000");
        assert_eq!(with_thousands(1_234_567), "1,234,567");
        let kpis = Kpis {
            total_mass: 52_560,
            average_rating: 85.0,
            median_mass: 1200.0,
        };
        assert_eq!(kpis.mass_label(), "52,560 KG");
        assert_eq!(kpis.median_label(), "1200 KG");
    }
}
