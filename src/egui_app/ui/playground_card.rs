//! Prediction playground: paste JSON records, send them to the trained
//! model, show the predictions.

use eframe::egui::{self, RichText};

use super::value_text;
use crate::egui_app::PipelineApp;

impl PipelineApp {
    pub(in crate::egui_app) fn playground_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Playground").strong());
            ui.label("Paste one JSON record or an array of records.");

            ui.add(
                egui::TextEdit::multiline(&mut self.playground.input)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY)
                    .code_editor(),
            );

            let has_model = self.store.state().trained_model_id().is_some();
            ui.horizontal(|ui| {
                let button = egui::Button::new("Predict");
                let enabled = has_model && !self.jobs.predict_pending;
                if ui.add_enabled(enabled, button).clicked() {
                    self.start_predict();
                }
                if self.jobs.predict_pending {
                    ui.spinner();
                }
            });
            if !has_model {
                ui.label(
                    RichText::new("Run a pipeline first to produce a model.")
                        .small()
                        .weak(),
                );
            }

            if let Some(error) = &self.playground.error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
            if !self.playground.predictions.is_empty() {
                ui.add_space(4.0);
                ui.label(RichText::new("Predictions").strong());
                for (index, prediction) in self.playground.predictions.iter().enumerate() {
                    ui.label(format!("{}. {}", index + 1, value_text(prediction)));
                }
            }
        });
    }
}
