//! Model choice card.

use eframe::egui::{self, RichText};

use crate::egui_app::PipelineApp;
use crate::pipeline::types::ModelKind;

impl PipelineApp {
    pub(in crate::egui_app) fn model_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("5. Choose a model").strong());

            let current = self.store.state().model;
            for kind in [ModelKind::LogisticRegression, ModelKind::DecisionTree] {
                let selected = current == Some(kind);
                if ui.selectable_label(selected, kind.label()).clicked() {
                    // Clicking the active choice deselects it.
                    self.store
                        .set_model(if selected { None } else { Some(kind) });
                }
            }
            if current.is_none() {
                ui.label(RichText::new("No model selected yet.").small().weak());
            }
        });
    }
}
