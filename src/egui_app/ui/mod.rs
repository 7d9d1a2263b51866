//! Card-based layout for the guided workflow.

mod data_card;
mod flow_strip;
mod model_card;
mod playground_card;
mod preprocess_card;
mod results_card;
mod run_card;
mod split_card;
mod upload_card;

use eframe::egui;
use serde_json::Value;

use super::PipelineApp;

impl PipelineApp {
    pub(super) fn workspace(&mut self, ui: &mut egui::Ui) {
        ui.heading("Pipewright");
        ui.label("Assemble a training pipeline without code.");
        ui.add_space(8.0);

        self.flow_strip(ui);
        ui.add_space(8.0);

        ui.columns(2, |columns| {
            self.upload_card(&mut columns[0]);
            self.data_card(&mut columns[1]);
        });
        ui.columns(2, |columns| {
            self.preprocess_card(&mut columns[0]);
            self.split_card(&mut columns[1]);
        });
        ui.columns(2, |columns| {
            self.model_card(&mut columns[0]);
            self.run_card(&mut columns[1]);
        });
        self.results_card(ui);
        self.playground_card(ui);
    }
}

/// Render a JSON value as table/preview text.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_renders_scalars_plainly() {
        assert_eq!(value_text(&json!(null)), "");
        assert_eq!(value_text(&json!("setosa")), "setosa");
        assert_eq!(value_text(&json!(1.4)), "1.4");
        assert_eq!(value_text(&json!(true)), "true");
    }
}
