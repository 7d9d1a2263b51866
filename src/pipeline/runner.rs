//! Run orchestration: validation, request snapshot, failure classification.
//!
//! Preconditions are checked in a fixed order (running guard, dataset,
//! target, model) and short-circuit before any network activity. The
//! running flag is set synchronously in [`begin_run`], before any dispatch,
//! which makes it the sole mutual-exclusion mechanism for runs.

use thiserror::Error;

use super::store::PipelineStore;
use super::types::{RunOutcome, RunRequest};
use crate::backend::{ServiceError, TrainingBackend};

/// Fallback message when the service supplies no failure detail.
pub const GENERIC_RUN_FAILURE: &str = "Pipeline failed";

/// Substring (matched case-insensitively) in the service detail that marks a
/// stratified-split failure caused by under-populated target classes.
const RARE_CLASS_MARKER: &str = "least populated class";

/// Everything that can go wrong with a run, validation and service alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("Upload a dataset first")]
    MissingDataset,
    #[error("Select a target column")]
    MissingTarget,
    #[error("Choose a model to train")]
    MissingModel,
    #[error("A pipeline run is already in progress")]
    AlreadyRunning,
    /// The target has classes with too few samples for the configured
    /// split; the UI should suggest enabling drop-rare-classes and retrying.
    #[error("{detail}")]
    RareClasses { detail: String },
    /// Any other service-side failure, surfaced for the user to act on.
    #[error("{detail}")]
    Service { detail: String },
}

impl RunError {
    /// True for errors raised locally, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingDataset | Self::MissingTarget | Self::MissingModel | Self::AlreadyRunning
        )
    }

    /// True when the failure is the rare-class refinement, which has a
    /// dedicated remediation (drop rare classes and retry).
    pub fn is_rare_class(&self) -> bool {
        matches!(self, Self::RareClasses { .. })
    }
}

/// Validate the session and enter the running state.
///
/// On success the store is running with previous result/error cleared, and
/// the returned request snapshot is decoupled from any further store
/// mutation. On failure nothing is mutated and no request may be sent.
pub fn begin_run(store: &mut PipelineStore) -> Result<RunRequest, RunError> {
    let state = store.state();
    if state.running {
        return Err(RunError::AlreadyRunning);
    }
    let dataset = state.dataset.as_ref().ok_or(RunError::MissingDataset)?;
    let target_column = state
        .target_column
        .clone()
        .ok_or(RunError::MissingTarget)?;
    let model = state.model.ok_or(RunError::MissingModel)?;

    let request = RunRequest {
        dataset_id: dataset.dataset_id.clone(),
        target_column,
        feature_columns: state.feature_columns.clone(),
        preprocess: state.preprocess.clone(),
        split: state.split,
        model,
        drop_rare_classes: state.drop_rare_classes,
    };
    store.mark_running();
    Ok(request)
}

/// Record the service's answer, classifying failures.
pub fn complete_run(
    store: &mut PipelineStore,
    outcome: Result<RunOutcome, ServiceError>,
) -> Result<RunOutcome, RunError> {
    match outcome {
        Ok(result) => {
            tracing::info!(
                accuracy = result.accuracy,
                model_id = result.model_id.as_deref(),
                "Pipeline run succeeded"
            );
            store.finish_with_result(result.clone());
            Ok(result)
        }
        Err(error) => {
            tracing::warn!("Pipeline run failed: {error}");
            let classified = classify_failure(&error);
            store.finish_with_error(classified.clone());
            Err(classified)
        }
    }
}

/// Run the pipeline synchronously: validate, dispatch, record.
///
/// The UI dispatches the service call on a worker thread instead, using
/// [`begin_run`] and [`complete_run`] around it; the semantics are the same.
pub fn run(
    store: &mut PipelineStore,
    backend: &dyn TrainingBackend,
) -> Result<RunOutcome, RunError> {
    let request = begin_run(store)?;
    let outcome = backend.run_pipeline(&request);
    complete_run(store, outcome)
}

fn classify_failure(error: &ServiceError) -> RunError {
    let detail = error
        .detail()
        .map(str::to_string)
        .unwrap_or_else(|| GENERIC_RUN_FAILURE.to_string());
    if detail.to_ascii_lowercase().contains(RARE_CLASS_MARKER) {
        RunError::RareClasses { detail }
    } else {
        RunError::Service { detail }
    }
}
