//! Control Panel Widget
//! Left side panel with the dataset picker and all filter inputs.

use crate::data::{AltitudeRange, CoffeeDataset, FilterSpec};
use egui::{Color32, RichText, ScrollArea};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub filter: FilterSpec,
    pub countries: Vec<String>,
    pub harvest_years: Vec<String>,
    pub data_path: Option<PathBuf>,
    pub record_count: usize,
    pub dropped_rows: usize,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            countries: Vec::new(),
            harvest_years: Vec::new(),
            data_path: None,
            record_count: 0,
            dropped_rows: 0,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset options and selections for a freshly loaded dataset.
    pub fn set_dataset(&mut self, dataset: &CoffeeDataset, path: Option<&Path>) {
        self.filter = FilterSpec::select_all(dataset);
        self.countries = self.filter.countries.iter().cloned().collect();
        self.harvest_years = self.filter.harvest_years.iter().cloned().collect();
        self.data_path = path.map(Path::to_path_buf);
        self.record_count = dataset.len();
        self.dropped_rows = dataset.dropped_rows();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("☕ Coffee Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(181, 101, 29)),
            );
            ui.label(
                RichText::new("Please filter here")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .data_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());
                    ui.label(RichText::new(path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
                ui.label(
                    RichText::new(format!(
                        "{} lots, {} dropped (unknown altitude)",
                        self.record_count, self.dropped_rows
                    ))
                    .size(11.0)
                    .color(Color32::GRAY),
                );
            });

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        let mut changed = false;

        // ===== Country Section =====
        ui.label(RichText::new("🌍 Select country").size(14.0).strong());
        ui.add_space(5.0);
        changed |= Self::multiselect(ui, "countries", &self.countries, &mut self.filter.countries);

        ui.add_space(10.0);

        // ===== Altitude Section =====
        ui.label(
            RichText::new("⛰ Altitude range (meters above sea level)")
                .size(14.0)
                .strong(),
        );
        ui.add_space(5.0);
        changed |= self.altitude_sliders(ui);

        ui.add_space(10.0);

        // ===== Harvest Year Section =====
        ui.label(RichText::new("📅 Select harvest year").size(14.0).strong());
        ui.add_space(5.0);
        changed |= Self::multiselect(
            ui,
            "harvest_years",
            &self.harvest_years,
            &mut self.filter.harvest_years,
        );

        ui.add_space(10.0);

        // ===== Farm Exclusion =====
        changed |= ui
            .checkbox(
                &mut self.filter.exclude_dominant_farm,
                "Remove Yhaenu Plc Farm?",
            )
            .changed();
        if self.filter.exclude_dominant_farm {
            ui.label(RichText::new("Okay").size(11.0).color(Color32::GRAY));
        }

        if changed {
            action = ControlPanelAction::FilterChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                .min_size(egui::vec2(150.0, 30.0));
            if ui.add(button).clicked() {
                action = ControlPanelAction::Export;
            }
        });

        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Checkbox list over `options`, mirrored into `selected`.
    fn multiselect(
        ui: &mut egui::Ui,
        id: &str,
        options: &[String],
        selected: &mut BTreeSet<String>,
    ) -> bool {
        let mut changed = false;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(id)
                    .max_height(140.0)
                    .show(ui, |ui| {
                        for option in options {
                            let mut checked = selected.contains(option);
                            if ui.checkbox(&mut checked, option).changed() {
                                if checked {
                                    selected.insert(option.clone());
                                } else {
                                    selected.remove(option);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                selected.extend(options.iter().cloned());
                changed = true;
            }
            if ui.small_button("Clear All").clicked() {
                selected.clear();
                changed = true;
            }
        });

        changed
    }

    /// Low/high sliders over the selectable range; keeps low <= high.
    fn altitude_sliders(&mut self, ui: &mut egui::Ui) -> bool {
        let bounds = AltitudeRange::SELECTABLE;
        let range = &mut self.filter.altitude;

        let low_changed = ui
            .add(egui::Slider::new(&mut range.low, bounds.low..=bounds.high).text("from"))
            .changed();
        let high_changed = ui
            .add(egui::Slider::new(&mut range.high, bounds.low..=bounds.high).text("to"))
            .changed();

        if low_changed && range.low > range.high {
            range.high = range.low;
        }
        if high_changed && range.high < range.low {
            range.low = range.high;
        }

        low_changed || high_changed
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FilterChanged,
    Export,
}
