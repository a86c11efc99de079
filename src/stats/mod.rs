//! Stats module - KPIs and grouped aggregates

mod calculator;

pub use calculator::{DashboardSummary, Kpis, Ranked, StatsCalculator};
