//! egui application shell for the guided pipeline workflow.

mod jobs;
mod ui;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use serde_json::Value;

use crate::backend::{HttpBackend, TrainingBackend};
use crate::pipeline::runner::{self, RunError};
use crate::pipeline::store::PipelineStore;
use crate::pipeline::types::PreprocessKind;
use crate::pipeline::{predict, types::PreprocessStep};
use crate::settings::Settings;

use jobs::{JobMessage, JobRuntime};

const SAMPLE_PLAYGROUND_INPUT: &str = "{\n  \"feature1\": 1,\n  \"feature2\": 0.2\n}";

/// Transient playground state, local to the UI like the rest of the
/// validation feedback.
struct PlaygroundState {
    input: String,
    predictions: Vec<Value>,
    error: Option<String>,
}

/// In-progress preprocessing step the user is assembling.
struct StepDraft {
    kind: PreprocessKind,
    all_numeric: bool,
    selected: BTreeSet<String>,
}

impl Default for StepDraft {
    fn default() -> Self {
        Self {
            kind: PreprocessKind::Standardize,
            all_numeric: true,
            selected: BTreeSet::new(),
        }
    }
}

/// Top-level application: owns the session store and the worker channel.
pub struct PipelineApp {
    store: PipelineStore,
    backend: Arc<HttpBackend>,
    jobs: JobRuntime,
    upload_error: Option<String>,
    /// Validation feedback from the last run attempt; service failures live
    /// in the session state instead.
    run_notice: Option<RunError>,
    playground: PlaygroundState,
    step_draft: StepDraft,
}

impl PipelineApp {
    pub fn new(settings: &Settings, store: PipelineStore) -> Self {
        Self {
            store,
            backend: Arc::new(HttpBackend::new(settings)),
            jobs: JobRuntime::new(),
            upload_error: None,
            run_notice: None,
            playground: PlaygroundState {
                input: SAMPLE_PLAYGROUND_INPUT.to_string(),
                predictions: Vec::new(),
                error: None,
            },
            step_draft: StepDraft::default(),
        }
    }

    fn poll_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv() {
                Ok(message) => message,
                Err(_) => break,
            };
            match message {
                JobMessage::DatasetUploaded(result) => {
                    self.jobs.upload_pending = false;
                    match result {
                        Ok(dataset) => {
                            self.upload_error = None;
                            self.run_notice = None;
                            self.playground.predictions.clear();
                            self.store.set_dataset(dataset);
                        }
                        Err(err) => self.upload_error = Some(err.to_string()),
                    }
                }
                JobMessage::RunFinished(outcome) => {
                    // complete_run records the result or classified error in
                    // the session; the run card renders from there.
                    let _ = runner::complete_run(&mut self.store, outcome);
                }
                JobMessage::Predicted(outcome) => {
                    self.jobs.predict_pending = false;
                    match predict::interpret(outcome) {
                        Ok(predictions) => {
                            self.playground.predictions = predictions;
                            self.playground.error = None;
                        }
                        Err(err) => {
                            self.playground.predictions.clear();
                            self.playground.error = Some(err.to_string());
                        }
                    }
                }
            }
        }
    }

    fn start_upload(&mut self, path: PathBuf) {
        if self.jobs.upload_pending {
            return;
        }
        self.jobs.upload_pending = true;
        self.upload_error = None;
        let backend = Arc::clone(&self.backend);
        let sender = self.jobs.sender();
        std::thread::spawn(move || {
            let result = backend.upload_dataset(&path);
            let _ = sender.send(JobMessage::DatasetUploaded(result));
        });
    }

    fn start_run(&mut self) {
        self.run_notice = None;
        // begin_run sets the running flag before the worker exists, so a
        // second click cannot start a second request.
        match runner::begin_run(&mut self.store) {
            Ok(request) => {
                let backend = Arc::clone(&self.backend);
                let sender = self.jobs.sender();
                std::thread::spawn(move || {
                    let outcome = backend.run_pipeline(&request);
                    let _ = sender.send(JobMessage::RunFinished(outcome));
                });
            }
            Err(err) => self.run_notice = Some(err),
        }
    }

    fn start_predict(&mut self) {
        self.playground.error = None;
        self.playground.predictions.clear();
        let model_id = self.store.state().trained_model_id().map(str::to_string);
        match predict::prepare_request(model_id.as_deref(), &self.playground.input) {
            Ok(request) => {
                self.jobs.predict_pending = true;
                let backend = Arc::clone(&self.backend);
                let sender = self.jobs.sender();
                std::thread::spawn(move || {
                    let outcome = backend.predict(&request);
                    let _ = sender.send(JobMessage::Predicted(outcome));
                });
            }
            Err(err) => self.playground.error = Some(err.to_string()),
        }
    }

    fn add_draft_step(&mut self) {
        let columns = if self.step_draft.all_numeric || self.step_draft.selected.is_empty() {
            None
        } else {
            Some(self.step_draft.selected.iter().cloned().collect())
        };
        self.store.add_step(PreprocessStep {
            step: self.step_draft.kind,
            columns,
        });
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|input| {
            input
                .raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            self.start_upload(path);
        }
    }
}

impl eframe::App for PipelineApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_jobs();
        self.handle_dropped_files(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.workspace(ui);
            });
        });

        if self.store.state().running || self.jobs.any_pending() {
            ctx.request_repaint_after(Duration::from_millis(150));
        }
    }
}
