//! Chart Viewer Widget
//! Central scrollable page: KPI row, bar charts and commentary.

use crate::charts::{ChartData, ChartPlotter};
use crate::stats::DashboardSummary;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;

const DOMINANT_FARM_NOTE: &str = "Ethiopia's production dwarfs the rest of the countries in this \
dataset, although Brazil is the largest coffee producer in the world. The dataset highlights \
coffee quality rather than world production.\n\nOne farm in particular, 'YHAENU PLC FARM', \
dominates every mass-based chart. Use the filter in the sidebar to cancel this farm out.";

const BEST_VARIETY_NOTE: &str = "Ethiopian Heirlooms are the most produced by mass and also \
among the highest rated, which is no surprise given one Ethiopian farm grows so much of them. \
With that farm removed, Gesha is nowhere near the top by mass; it is a more sensitive plant \
than the hardier strains.\n\nBesides the Ethiopian Heirlooms, Caturra, Mundo Novo and Bourbon \
are the most grown by mass: fewer farmers grow them, but at higher volume.";

const VARIETY_NOTE: &str = "The eight most reviewed varieties and their average total cup \
score across the whole dataset; the sidebar filters do not apply here. A cupping is a formal \
coffee review, and much of the score remains subjective.";

/// Scrollable dashboard page.
#[derive(Default)]
pub struct ChartViewer {
    pub summary: Option<DashboardSummary>,
    pub charts: Vec<ChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_summary(&mut self, summary: DashboardSummary) {
        self.charts = ChartData::dashboard_charts(&summary);
        self.summary = Some(summary);
    }

    fn chart(&self, id: &str) -> Option<&ChartData> {
        self.charts.iter().find(|chart| chart.id == id)
    }

    /// Draw the dashboard page
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(summary) = &self.summary else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new("☕ Coffee Dashboard").size(28.0).strong());
                ui.add_space(SECTION_SPACING);

                Self::draw_kpis(ui, summary);

                if summary.is_empty() {
                    ui.add_space(8.0);
                    ui.label(
                        RichText::new("No lots match the current filters")
                            .size(14.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }

                ui.add_space(SECTION_SPACING);
                ui.separator();

                ui.columns(2, |columns| {
                    if let Some(chart) = self.chart("mass_by_country") {
                        ChartPlotter::draw_bar_chart(&mut columns[0], chart);
                    }
                    if let Some(chart) = self.chart("rating_by_country") {
                        ChartPlotter::draw_bar_chart(&mut columns[1], chart);
                    }
                });

                ui.add_space(SECTION_SPACING);
                ui.label(RichText::new(DOMINANT_FARM_NOTE).italics());
                ui.add_space(SECTION_SPACING);
                ui.separator();

                ui.columns(2, |columns| {
                    if let Some(chart) = self.chart("rating_by_variety") {
                        ChartPlotter::draw_bar_chart(&mut columns[0], chart);
                    }
                    columns[1].label(RichText::new("Coffee Varieties").size(18.0).strong());
                    columns[1].label(VARIETY_NOTE);
                    columns[1].add_space(8.0);
                    Self::draw_variety_counts(&mut columns[1], summary);
                });

                ui.add_space(SECTION_SPACING);
                ui.separator();

                ui.label(
                    RichText::new("So what is the best variety of coffee?")
                        .size(22.0)
                        .strong(),
                );
                ui.label(BEST_VARIETY_NOTE);
                ui.add_space(SECTION_SPACING);

                if let Some(chart) = self.chart("mass_by_variety") {
                    ChartPlotter::draw_bar_chart(ui, chart);
                }
            });
    }

    fn draw_kpis(ui: &mut egui::Ui, summary: &DashboardSummary) {
        let kpis = &summary.kpis;
        let cards = [
            ("Total Mass:", kpis.mass_label()),
            ("Average Rating:", kpis.rating_label()),
            ("Average (median) mass per farm:", kpis.median_label()),
        ];

        ui.columns(3, |columns| {
            for (column, (title, value)) in columns.iter_mut().zip(cards) {
                column.label(RichText::new(title).size(16.0).strong());
                column.label(RichText::new(value).size(20.0));
            }
        });
    }

    fn draw_variety_counts(ui: &mut egui::Ui, summary: &DashboardSummary) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("variety_counts")
                    .striped(true)
                    .min_col_width(80.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Variety").strong().size(11.0));
                        ui.label(RichText::new("Lots").strong().size(11.0));
                        ui.end_row();

                        for entry in &summary.variety_counts_top8 {
                            ui.label(RichText::new(&entry.label).size(11.0));
                            ui.label(RichText::new(entry.value.to_string()).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
