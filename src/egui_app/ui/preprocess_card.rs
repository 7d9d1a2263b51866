//! Preprocessing step builder: pick a transform, scope it to columns,
//! manage the ordered step list.

use eframe::egui::{self, RichText};

use crate::egui_app::PipelineApp;
use crate::pipeline::types::PreprocessKind;

impl PipelineApp {
    pub(in crate::egui_app) fn preprocess_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("3. Preprocess (optional)").strong());

            let columns = self
                .store
                .state()
                .dataset
                .as_ref()
                .map(|dataset| dataset.column_names.clone())
                .unwrap_or_default();

            egui::ComboBox::from_label("Transform")
                .selected_text(self.step_draft.kind.label())
                .show_ui(ui, |ui| {
                    for kind in [PreprocessKind::Standardize, PreprocessKind::Normalize] {
                        ui.selectable_value(&mut self.step_draft.kind, kind, kind.label());
                    }
                });

            ui.checkbox(&mut self.step_draft.all_numeric, "All numeric columns");
            if !self.step_draft.all_numeric {
                ui.horizontal_wrapped(|ui| {
                    for column in &columns {
                        let mut checked = self.step_draft.selected.contains(column);
                        if ui.checkbox(&mut checked, column).changed() {
                            if checked {
                                self.step_draft.selected.insert(column.clone());
                            } else {
                                self.step_draft.selected.remove(column);
                            }
                        }
                    }
                });
            }

            if ui.button("Add step").clicked() {
                self.add_draft_step();
            }

            let steps = self.store.state().preprocess.clone();
            if steps.is_empty() {
                ui.label(RichText::new("No steps configured.").small().weak());
            } else {
                ui.add_space(4.0);
                let mut remove_at = None;
                for (index, step) in steps.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let scope = match &step.columns {
                            Some(cols) => cols.join(", "),
                            None => "all numeric".to_string(),
                        };
                        ui.label(format!("{}. {} ({scope})", index + 1, step.step.label()));
                        if ui.small_button("✖").clicked() {
                            remove_at = Some(index);
                        }
                    });
                }
                if let Some(index) = remove_at {
                    self.store.remove_step(index);
                }
            }
        });
    }
}
