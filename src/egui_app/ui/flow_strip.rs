//! Horizontal five-stage progress strip projected from the session.

use eframe::egui::{self, Color32, RichText, Stroke};

use crate::egui_app::PipelineApp;
use crate::pipeline::flow;

const ACTIVE_COLOR: Color32 = Color32::from_rgb(16, 185, 129);
const INACTIVE_COLOR: Color32 = Color32::from_rgb(148, 163, 184);

impl PipelineApp {
    pub(in crate::egui_app) fn flow_strip(&mut self, ui: &mut egui::Ui) {
        let graph = flow::project(self.store.state());
        ui.horizontal(|ui| {
            for (index, node) in graph.nodes.iter().enumerate() {
                if index > 0 {
                    ui.label(RichText::new("→").color(INACTIVE_COLOR).size(18.0));
                }
                let color = if node.active {
                    ACTIVE_COLOR
                } else {
                    INACTIVE_COLOR
                };
                egui::Frame::group(ui.style())
                    .stroke(Stroke::new(2.0, color))
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            ui.label(RichText::new(node.stage.title()).strong());
                            ui.label(RichText::new(&node.status).small().color(color));
                        });
                    });
            }
        });
    }
}
