//! Dataset upload card: file picker, drag-and-drop hint, upload status.

use eframe::egui::{self, RichText};

use crate::egui_app::PipelineApp;

impl PipelineApp {
    pub(in crate::egui_app) fn upload_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("1. Upload dataset").strong());
            ui.label("Upload CSV or Excel to get started.");
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                let button = egui::Button::new("Select file…");
                if ui.add_enabled(!self.jobs.upload_pending, button).clicked() {
                    let picked = rfd::FileDialog::new()
                        .add_filter("Datasets", &["csv", "xlsx"])
                        .pick_file();
                    if let Some(path) = picked {
                        self.start_upload(path);
                    }
                }
                if self.jobs.upload_pending {
                    ui.spinner();
                    ui.label("Uploading…");
                }
            });
            ui.label(
                RichText::new("or drag & drop a file anywhere in the window")
                    .small()
                    .weak(),
            );

            if let Some(error) = &self.upload_error {
                ui.colored_label(ui.visuals().error_fg_color, error);
            }
            if let Some(dataset) = &self.store.state().dataset {
                ui.add_space(4.0);
                ui.label(format!(
                    "{} rows • {} columns",
                    dataset.rows, dataset.columns
                ));
            }
        });
    }
}
