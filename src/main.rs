//! Coffee Dashboard - Coffee Quality Review KPIs & Charts
//!
//! Loads a coffee quality review spreadsheet, cleans it once, and shows
//! filterable summary statistics and bar charts.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::Context;
use config::AppConfig;
use data::DataLoader;
use eframe::egui;
use gui::CoffeeDashboardApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env();

    // An unusable source aborts startup; there is no degraded mode
    let mut loader = DataLoader::new();
    let dataset = loader
        .load(&config.data_path)
        .with_context(|| format!("Failed to prepare {}", config.data_path.display()))?;
    if dataset.is_empty() {
        log::warn!("{} contains no usable lots", config.data_path.display());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size)
            .with_title("Coffee Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Coffee Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(CoffeeDashboardApp::new(cc, loader, dataset)))),
    )
    .map_err(|e| anyhow::anyhow!("Window error: {e}"))
}
