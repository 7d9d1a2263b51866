//! Run card: launch training, surface validation and service errors,
//! offer the rare-class retry hint.

use eframe::egui::{self, RichText};

use crate::egui_app::PipelineApp;

impl PipelineApp {
    pub(in crate::egui_app) fn run_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("6. Train").strong());

            let mut drop_rare = self.store.state().drop_rare_classes;
            if ui
                .checkbox(&mut drop_rare, "Drop rare classes before splitting")
                .changed()
            {
                self.store.set_drop_rare_classes(drop_rare);
            }

            let running = self.store.state().running;
            ui.horizontal(|ui| {
                let button = egui::Button::new("Run pipeline");
                if ui.add_enabled(!running, button).clicked() {
                    self.start_run();
                }
                if running {
                    ui.spinner();
                    ui.label("Training…");
                }
            });

            if let Some(notice) = &self.run_notice {
                ui.colored_label(ui.visuals().warn_fg_color, notice.to_string());
            }
            if let Some(error) = self.store.state().error.clone() {
                ui.horizontal(|ui| {
                    ui.colored_label(ui.visuals().error_fg_color, error.to_string());
                    if ui.small_button("Dismiss").clicked() {
                        self.store.clear_error();
                    }
                });
                if error.is_rare_class() && !self.store.state().drop_rare_classes {
                    ui.label(
                        RichText::new(
                            "Some classes have too few samples to split. Enable \
                             \"Drop rare classes\" above and run again.",
                        )
                        .small(),
                    );
                }
            }

            if let Some(result) = self.store.state().result.clone() {
                if let Some(accuracy) = result.accuracy {
                    ui.label(format!("Accuracy: {:.1}%", accuracy * 100.0));
                }
                if let Some(path) = &result.model_download_path {
                    if ui.button("Download model").clicked() {
                        match self.backend.artifact_url(path) {
                            Some(url) => {
                                if let Err(err) = open::that(url.as_str()) {
                                    tracing::warn!("failed to open model url: {err}");
                                }
                            }
                            None => tracing::warn!("bad model download path {path:?}"),
                        }
                    }
                }
            }
        });
    }
}
