//! Column selection and dataset preview card.

use eframe::egui::{self, RichText};

use super::value_text;
use crate::egui_app::PipelineApp;

impl PipelineApp {
    pub(in crate::egui_app) fn data_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("2. Inspect & select columns").strong());

            let Some(dataset) = self.store.state().dataset.clone() else {
                ui.label("Waiting for a dataset. Upload a CSV/XLSX to unlock column selection.");
                return;
            };

            let target = self.store.state().target_column.clone();
            let features = self.store.state().feature_columns.clone();

            // Target selection.
            let mut new_target = target.clone();
            egui::ComboBox::from_label("Target column")
                .selected_text(new_target.as_deref().unwrap_or("select"))
                .show_ui(ui, |ui| {
                    for column in &dataset.column_names {
                        ui.selectable_value(&mut new_target, Some(column.clone()), column);
                    }
                });
            if new_target != target {
                self.store.set_target(new_target);
            }

            // Feature selection; unset means "all remaining columns".
            ui.add_space(4.0);
            ui.label("Feature columns (unset = all remaining)");
            let target = self.store.state().target_column.clone();
            let mut changed = false;
            let mut selection: Vec<String> = Vec::new();
            ui.horizontal_wrapped(|ui| {
                for column in &dataset.column_names {
                    if Some(column) == target.as_ref() {
                        continue;
                    }
                    let mut checked = features
                        .as_ref()
                        .map_or(true, |cols| cols.contains(column));
                    if ui.checkbox(&mut checked, column).changed() {
                        changed = true;
                    }
                    if checked {
                        selection.push(column.clone());
                    }
                }
            });
            if changed {
                self.store.set_features(Some(selection));
            }

            // Bounded preview table.
            ui.add_space(6.0);
            ui.label(RichText::new("Preview (first rows)").small().weak());
            egui::ScrollArea::horizontal()
                .id_salt("dataset_preview")
                .show(ui, |ui| {
                    egui::Grid::new("preview_grid").striped(true).show(ui, |ui| {
                        for column in &dataset.column_names {
                            ui.label(RichText::new(column).strong());
                        }
                        ui.end_row();
                        for row in &dataset.preview {
                            for column in &dataset.column_names {
                                let text = row
                                    .get(column)
                                    .map(value_text)
                                    .unwrap_or_default();
                                ui.label(text);
                            }
                            ui.end_row();
                        }
                    });
                });
        });
    }
}
