//! Training results: accuracy, warnings, confusion matrix, feature
//! importances.

use eframe::egui::{self, RichText};

use super::value_text;
use crate::egui_app::PipelineApp;

impl PipelineApp {
    pub(in crate::egui_app) fn results_card(&mut self, ui: &mut egui::Ui) {
        let Some(result) = self.store.state().result.clone() else {
            return;
        };
        ui.group(|ui| {
            ui.label(RichText::new("Results").strong());

            if let Some(accuracy) = result.accuracy {
                ui.label(
                    RichText::new(format!("Accuracy {:.1}%", accuracy * 100.0)).size(18.0),
                );
            }
            if let Some(message) = &result.message {
                ui.label(message);
            }
            for warning in &result.warnings {
                ui.colored_label(ui.visuals().warn_fg_color, format!("⚠ {warning}"));
            }

            if let Some(matrix) = &result.confusion_matrix {
                ui.add_space(6.0);
                ui.label(RichText::new("Confusion matrix").strong());
                egui::Grid::new("confusion_matrix")
                    .striped(true)
                    .show(ui, |ui| {
                        ui.label("");
                        for label in &matrix.labels {
                            ui.label(RichText::new(value_text(label)).strong());
                        }
                        ui.end_row();
                        for (label, row) in matrix.labels.iter().zip(&matrix.matrix) {
                            ui.label(RichText::new(value_text(label)).strong());
                            for count in row {
                                ui.label(count.to_string());
                            }
                            ui.end_row();
                        }
                    });
            }

            if let Some(importances) = &result.feature_importances {
                if !importances.is_empty() {
                    ui.add_space(6.0);
                    ui.label(RichText::new("Feature importances").strong());
                    let max = importances
                        .iter()
                        .map(|fi| fi.importance)
                        .fold(f64::EPSILON, f64::max);
                    for fi in importances {
                        ui.horizontal(|ui| {
                            ui.label(&fi.name);
                            let bar = egui::ProgressBar::new((fi.importance / max) as f32)
                                .text(format!("{:.3}", fi.importance));
                            ui.add(bar);
                        });
                    }
                }
            }
        });
    }
}
