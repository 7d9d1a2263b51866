//! Train/test split configuration card.

use eframe::egui::{self, RichText};

use crate::egui_app::PipelineApp;
use crate::pipeline::types::SplitConfig;

impl PipelineApp {
    pub(in crate::egui_app) fn split_card(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("4. Train/test split").strong());

            let split = self.store.state().split;
            let mut percent = split.test_percent() as u8;
            let slider = egui::Slider::new(&mut percent, 10..=50)
                .step_by(5.0)
                .suffix("%")
                .text("Test share");
            if ui.add(slider).changed() {
                self.store.set_split(SplitConfig {
                    test_size: f64::from(percent) / 100.0,
                    ..split
                });
            }

            let split = self.store.state().split;
            ui.label(format!(
                "Train {}% • Test {}%",
                100 - split.test_percent(),
                split.test_percent()
            ));

            let mut seeded = split.random_state.is_some();
            if ui.checkbox(&mut seeded, "Fixed random seed").changed() {
                self.store.set_split(SplitConfig {
                    random_state: if seeded { Some(42) } else { None },
                    ..split
                });
            }
            if let Some(mut seed) = self.store.state().split.random_state {
                let drag = egui::DragValue::new(&mut seed).range(0..=u32::MAX);
                if ui.add(drag).changed() {
                    let split = self.store.state().split;
                    self.store.set_split(SplitConfig {
                        random_state: Some(seed),
                        ..split
                    });
                }
            }
        });
    }
}
