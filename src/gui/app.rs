//! Coffee Dashboard Main Application
//! Main window with the filter panel and the dashboard page.

use crate::charts::StaticChartRenderer;
use crate::data::{CoffeeDataset, DataLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::StatsCalculator;
use anyhow::Context;
use egui::SidePanel;
use log::error;
use std::path::Path;
use std::sync::Arc;

/// Main application window.
pub struct CoffeeDashboardApp {
    loader: DataLoader,
    dataset: Arc<CoffeeDataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl CoffeeDashboardApp {
    /// Build the window around an already prepared dataset.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        loader: DataLoader,
        dataset: Arc<CoffeeDataset>,
    ) -> Self {
        let mut app = Self {
            loader,
            dataset,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.reset_filters();
        app
    }

    fn reset_filters(&mut self) {
        let path = self.loader.get_file_path().map(Path::to_path_buf);
        self.control_panel.set_dataset(&self.dataset, path.as_deref());
        self.recompute();
    }

    /// Pull the filtered view and aggregates for the current selection.
    fn recompute(&mut self) {
        let summary = StatsCalculator::recompute(&self.dataset, &self.control_panel.filter);
        self.chart_viewer.set_summary(summary);
    }

    /// Handle CSV file selection. A failed load keeps the current dataset.
    fn handle_browse_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.loader.load(&path) {
            Ok(dataset) => {
                self.dataset = dataset;
                self.reset_filters();
                self.control_panel
                    .set_status(&format!("Loaded {} lots", self.dataset.len()));
            }
            Err(e) => {
                error!("Failed to load {}: {e}", path.display());
                self.control_panel.set_status(&format!("Error: {e}"));
            }
        }
    }

    /// Handle chart export into a user-chosen folder
    fn handle_export(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        match self.export_to(&dir) {
            Ok(count) => self
                .control_panel
                .set_status(&format!("Exported {count} files")),
            Err(e) => {
                error!("Export failed: {e:#}");
                self.control_panel.set_status(&format!("Error: {e:#}"));
            }
        }
    }

    fn export_to(&self, dir: &Path) -> anyhow::Result<usize> {
        let summary = self
            .chart_viewer
            .summary
            .as_ref()
            .context("Nothing to export")?;
        let written = StaticChartRenderer::export_dashboard(summary, dir)
            .with_context(|| format!("Exporting dashboard to {}", dir.display()))?;
        Ok(written.len())
    }
}

impl eframe::App for CoffeeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Filters
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FilterChanged => self.recompute(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
