#![deny(missing_docs)]

//! Entry point for the egui-based Pipewright UI.
use eframe::egui;
use pipewright::egui_app::PipelineApp;
use pipewright::logging;
use pipewright::pipeline::store::PipelineStore;
use pipewright::settings;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let settings = settings::load_or_default();
    let store = PipelineStore::load_or_default();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1100.0, 780.0])
        .with_min_inner_size([760.0, 520.0])
        .with_drag_and_drop(true);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Pipewright",
        native_options,
        Box::new(move |_cc| Ok(Box::new(PipelineApp::new(&settings, store)))),
    )?;
    Ok(())
}
