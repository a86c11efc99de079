//! Static Chart Renderer
//! Exports the dashboard charts as PNG images with plotters, plus a JSON
//! snapshot of the summary they were drawn from.
//!
//! Layout per image:
//! 1. Title centered at the top
//! 2. Horizontal bars, largest at the top, category labels on the left
//! 3. Value axis along the bottom

use crate::charts::ChartData;
use crate::stats::DashboardSummary;
use log::{info, warn};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const EXPORT_WIDTH: u32 = 1200;
pub const EXPORT_HEIGHT: u32 = 800;
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart '{0}' has no bars")]
    EmptyChart(&'static str),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

fn drawing_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

/// Category label for a y-axis segment. Rows count up from the bottom,
/// labels are stored top first.
fn row_label(labels: &[&str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::Exact(row) | SegmentValue::CenterOf(row) => labels
            .len()
            .checked_sub(row + 1)
            .and_then(|idx| labels.get(idx))
            .map(|label| label.to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one bar chart to a PNG file.
    pub fn render_png(
        chart: &ChartData,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        if chart.is_empty() {
            return Err(RenderError::EmptyChart(chart.id));
        }

        let n = chart.bars.len();
        let [r, g, b] = chart.color;
        let color = RGBColor(r, g, b);

        let (x_min, x_max) = chart.value_range.unwrap_or_else(|| {
            let largest = chart
                .bars
                .iter()
                .map(|bar| bar.value)
                .filter(|v| v.is_finite())
                .fold(0.0, f64::max);
            (0.0, if largest > 0.0 { largest * 1.1 } else { 1.0 })
        });

        let longest_label = chart
            .bars
            .iter()
            .map(|bar| bar.label.chars().count())
            .max()
            .unwrap_or(0);
        let label_area = (longest_label as u32 * 9 + 20).clamp(60, width / 3);

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(chart.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(label_area)
            .build_cartesian_2d(x_min..x_max, (0..n).into_segmented())
            .map_err(drawing_error)?;

        let labels: Vec<&str> = chart.bars.iter().map(|bar| bar.label.as_str()).collect();
        let label_for = |value: &SegmentValue<usize>| row_label(&labels, value);

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&label_for)
            .x_desc(chart.value_label)
            .y_desc(chart.category_label)
            .label_style(("sans-serif", 15))
            .draw()
            .map_err(drawing_error)?;

        ctx.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
            let row = n - 1 - i;
            let value = if bar.value.is_finite() {
                bar.value.clamp(x_min, x_max)
            } else {
                x_min
            };
            let mut rect = Rectangle::new(
                [
                    (x_min, SegmentValue::Exact(row)),
                    (value, SegmentValue::Exact(row + 1)),
                ],
                color.filled(),
            );
            rect.set_margin(4, 4, 0, 0);
            rect
        }))
        .map_err(drawing_error)?;

        root.present().map_err(drawing_error)?;
        Ok(())
    }

    /// Write every non-empty chart as `<id>.png` and the summary as JSON
    /// into `dir`. Returns the written files.
    pub fn export_dashboard(
        summary: &DashboardSummary,
        dir: &Path,
    ) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir).map_err(|source| RenderError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for chart in ChartData::dashboard_charts(summary) {
            if chart.is_empty() {
                warn!("Skipping empty chart '{}'", chart.id);
                continue;
            }
            let path = dir.join(format!("{}.png", chart.id));
            Self::render_png(&chart, &path, EXPORT_WIDTH, EXPORT_HEIGHT)?;
            written.push(path);
        }

        let summary_path = dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&summary_path, json).map_err(|source| RenderError::Io {
            path: summary_path.clone(),
            source,
        })?;
        written.push(summary_path);

        info!("Exported {} files to {}", written.len(), dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Kpis, Ranked};

    fn empty_summary() -> DashboardSummary {
        DashboardSummary {
            record_count: 0,
            kpis: Kpis {
                total_mass: 0,
                average_rating: f64::NAN,
                median_mass: f64::NAN,
            },
            mass_by_country: Vec::new(),
            rating_by_country: Vec::new(),
            rating_by_variety: Vec::new(),
            mass_by_variety_top20: Vec::new(),
            variety_counts_top8: Vec::new(),
        }
    }

    #[test]
    fn empty_chart_is_rejected() {
        let charts = ChartData::dashboard_charts(&empty_summary());
        let dir = tempfile::tempdir().unwrap();
        let err = StaticChartRenderer::render_png(
            &charts[0],
            &dir.path().join("x.png"),
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::EmptyChart("mass_by_country")));
    }

    #[test]
    fn segment_rows_map_to_labels_top_first() {
        let labels = ["Ethiopia", "Kenya", "Peru"];
        assert_eq!(row_label(&labels, &SegmentValue::CenterOf(2)), "Ethiopia");
        assert_eq!(row_label(&labels, &SegmentValue::Exact(0)), "Peru");
        assert_eq!(row_label(&labels, &SegmentValue::CenterOf(3)), "");
        assert_eq!(row_label(&labels, &SegmentValue::Last), "");
    }

    #[test]
    fn renders_non_empty_chart_to_png() {
        let summary = DashboardSummary {
            record_count: 2,
            kpis: Kpis {
                total_mass: 900,
                average_rating: 85.0,
                median_mass: 450.0,
            },
            mass_by_country: Vec::new(),
            rating_by_country: vec![Ranked::new("Kenya", 86.5), Ranked::new("Peru", 79.0)],
            rating_by_variety: Vec::new(),
            mass_by_variety_top20: Vec::new(),
            variety_counts_top8: Vec::new(),
        };
        let chart = &ChartData::dashboard_charts(&summary)[1];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating_by_country.png");

        match StaticChartRenderer::render_png(chart, &path, 600, 400) {
            Ok(()) => {
                let bytes = fs::read(&path).unwrap();
                assert_eq!(&bytes[..4], b"\x89PNG");
            }
            // hosts without any system font cannot draw text
            Err(RenderError::Drawing(msg)) if msg.to_lowercase().contains("font") => {
                eprintln!("skipping PNG check: {msg}");
            }
            Err(e) => panic!("render failed: {e}"),
        }
    }

    #[test]
    fn empty_selection_exports_summary_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("export");

        let written = StaticChartRenderer::export_dashboard(&empty_summary(), &out).unwrap();

        assert_eq!(written, vec![out.join(SUMMARY_FILE)]);
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(SUMMARY_FILE)).unwrap()).unwrap();
        assert_eq!(json["record_count"], 0);
        assert_eq!(json["kpis"]["total_mass"], 0);
        // NaN sentinels serialize as null
        assert!(json["kpis"]["average_rating"].is_null());
        assert_eq!(json["mass_by_country"], serde_json::json!([]));
    }
}
