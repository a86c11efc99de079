//! Chart Plotter Module
//! Creates interactive horizontal bar charts using egui_plot.

use crate::stats::{DashboardSummary, Ranked};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Plot, PlotBounds};

/// Bar colour for mass charts
pub const MASS_COLOR: [u8; 3] = [0, 131, 184];
/// Bar colour for rating and count charts
pub const RATING_COLOR: [u8; 3] = [99, 110, 250];
/// Value axis window of the rating charts; cupping scores bunch up here.
pub const RATING_AXIS: (f64, f64) = (80.0, 90.0);

/// One horizontal bar chart, bars ordered top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Stable identifier, also the export file stem.
    pub id: &'static str,
    pub title: &'static str,
    pub category_label: &'static str,
    pub value_label: &'static str,
    pub color: [u8; 3],
    /// Fixed value axis; `None` spans zero to the largest bar.
    pub value_range: Option<(f64, f64)>,
    pub bars: Vec<Ranked<f64>>,
}

impl ChartData {
    fn new(
        id: &'static str,
        title: &'static str,
        category_label: &'static str,
        value_label: &'static str,
        color: [u8; 3],
        bars: Vec<Ranked<f64>>,
    ) -> Self {
        Self {
            id,
            title,
            category_label,
            value_label,
            color,
            value_range: None,
            bars,
        }
    }

    fn with_value_range(mut self, range: (f64, f64)) -> Self {
        self.value_range = Some(range);
        self
    }

    /// The five dashboard charts in page order.
    pub fn dashboard_charts(summary: &DashboardSummary) -> Vec<ChartData> {
        vec![
            ChartData::new(
                "mass_by_country",
                "Gross Product by Country",
                "Country",
                "Amount of Coffee Exported in Kilograms",
                MASS_COLOR,
                to_bars(&summary.mass_by_country, |v| v as f64),
            ),
            ChartData::new(
                "rating_by_country",
                "Average Rating by Country",
                "Country",
                "Total Coffee Quality Rating",
                RATING_COLOR,
                to_bars(&summary.rating_by_country, |v| v),
            )
            .with_value_range(RATING_AXIS),
            ChartData::new(
                "rating_by_variety",
                "Average Rating by Variety",
                "Type of Bean",
                "Total Coffee Quality Rating",
                RATING_COLOR,
                to_bars(&summary.rating_by_variety, |v| v),
            )
            .with_value_range(RATING_AXIS),
            ChartData::new(
                "mass_by_variety",
                "Gross Product by Variety (Top 20)",
                "Type of Bean",
                "Amount of Coffee Exported in Kilograms",
                MASS_COLOR,
                to_bars(&summary.mass_by_variety_top20, |v| v as f64),
            ),
            ChartData::new(
                "variety_counts",
                "Most Common Varieties",
                "Type of Bean",
                "Number of Lots",
                RATING_COLOR,
                to_bars(&summary.variety_counts_top8, |v| v as f64),
            ),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn color32(&self) -> Color32 {
        let [r, g, b] = self.color;
        Color32::from_rgb(r, g, b)
    }
}

fn to_bars<T: Copy>(ranked: &[Ranked<T>], value: impl Fn(T) -> f64) -> Vec<Ranked<f64>> {
    ranked
        .iter()
        .map(|r| Ranked::new(r.label.clone(), value(r.value)))
        .collect()
}

/// Draws dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Row height per bar, so long charts stay readable
    const ROW_HEIGHT: f32 = 22.0;
    const MIN_HEIGHT: f32 = 180.0;

    /// Draw a horizontal bar chart. The first bar is drawn at the top.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &ChartData) {
        ui.label(RichText::new(chart.title).size(15.0).strong());

        if chart.is_empty() {
            ui.add_space(10.0);
            ui.label(RichText::new("No data for this selection").color(Color32::GRAY));
            return;
        }

        let n = chart.bars.len();
        let color = chart.color32();
        let labels: Vec<String> = chart.bars.iter().map(|b| b.label.clone()).collect();
        let height = (n as f32 * Self::ROW_HEIGHT).max(Self::MIN_HEIGHT);
        let value_range = chart.value_range;

        let bars: Vec<Bar> = chart
            .bars
            .iter()
            .enumerate()
            .map(|(i, ranked)| {
                Bar::new((n - 1 - i) as f64, ranked.value)
                    .name(&ranked.label)
                    .fill(color)
                    .width(0.7)
            })
            .collect();

        Plot::new(chart.id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid([true, false])
            .x_axis_label(chart.value_label)
            .y_axis_label(chart.category_label)
            .y_axis_min_width(110.0)
            .y_grid_spacer(move |_input| {
                (0..n)
                    .map(|i| GridMark {
                        value: i as f64,
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_axis_formatter(move |mark, _range| {
                let row = mark.value.round();
                if row < 0.0 || (mark.value - row).abs() > 1e-6 {
                    return String::new();
                }
                // rows count up from the bottom, labels from the top
                (n - 1)
                    .checked_sub(row as usize)
                    .and_then(|idx| labels.get(idx))
                    .cloned()
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().color(color));
                if let Some((low, high)) = value_range {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [low, -0.5],
                        [high, n as f64 - 0.5],
                    ));
                }
            });
    }
}
