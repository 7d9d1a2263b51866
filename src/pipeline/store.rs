//! Owned session state and its controlled mutation operations.
//!
//! All mutation goes through named operations so the target/feature
//! invariant (the target column never appears in the feature set) is
//! enforced in one place. Every mutation persists a whitelisted snapshot;
//! persistence failures are logged and never surfaced to the caller.

use std::path::PathBuf;

use super::runner::RunError;
use super::snapshot::{self, SessionSnapshot};
use super::types::{DatasetSummary, ModelKind, PreprocessStep, RunOutcome, SplitConfig};

/// Complete in-memory session: one pipeline config plus derived run state.
///
/// `result` and `error` are mutually exclusive at all times; `running` and
/// `error` are transient and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub dataset: Option<DatasetSummary>,
    pub target_column: Option<String>,
    /// `None` means "all columns except the target".
    pub feature_columns: Option<Vec<String>>,
    pub preprocess: Vec<PreprocessStep>,
    pub split: SplitConfig,
    pub model: Option<ModelKind>,
    pub drop_rare_classes: bool,
    pub running: bool,
    pub result: Option<RunOutcome>,
    pub error: Option<RunError>,
}

impl SessionState {
    /// The trained-model reference from the last successful run, if any.
    pub fn trained_model_id(&self) -> Option<&str> {
        self.result.as_ref()?.model_id.as_deref()
    }

    fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            dataset: snapshot.dataset,
            target_column: snapshot.target_column,
            feature_columns: snapshot.feature_columns,
            preprocess: snapshot.preprocess,
            split: snapshot.split.unwrap_or_default(),
            model: snapshot.model,
            drop_rare_classes: snapshot.drop_rare_classes,
            running: false,
            result: snapshot.result,
            error: None,
        }
    }

    fn to_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            dataset: self.dataset.clone(),
            target_column: self.target_column.clone(),
            feature_columns: self.feature_columns.clone(),
            preprocess: self.preprocess.clone(),
            split: Some(self.split),
            model: self.model,
            drop_rare_classes: self.drop_rare_classes,
            result: self.result.clone(),
        }
    }
}

/// Owner of the session state, persisting after every mutation.
#[derive(Debug)]
pub struct PipelineStore {
    state: SessionState,
    storage: Option<PathBuf>,
}

impl PipelineStore {
    /// Rehydrate from the default snapshot location, or start fresh when the
    /// app directory cannot be resolved.
    pub fn load_or_default() -> Self {
        match snapshot::snapshot_path() {
            Ok(path) => Self::with_storage_path(path),
            Err(err) => {
                tracing::warn!("Session persistence disabled: {err}");
                Self::in_memory()
            }
        }
    }

    /// Rehydrate from (and keep persisting to) a specific snapshot path.
    pub fn with_storage_path(path: PathBuf) -> Self {
        let state = SessionState::from_snapshot(snapshot::load_from_path(&path));
        Self {
            state,
            storage: Some(path),
        }
    }

    /// A store that never touches disk, for tests and headless use.
    pub fn in_memory() -> Self {
        Self {
            state: SessionState::default(),
            storage: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replace the dataset and derive a fresh default selection: first
    /// column becomes the target, the remaining columns the features.
    /// Clears steps, model, and any previous result or error.
    pub fn set_dataset(&mut self, dataset: DatasetSummary) {
        let columns = dataset.column_names.clone();
        self.state.dataset = Some(dataset);
        self.state.target_column = columns.first().cloned();
        self.state.feature_columns = if columns.len() > 1 {
            Some(columns[1..].to_vec())
        } else {
            None
        };
        self.state.preprocess.clear();
        self.state.split = SplitConfig::default();
        self.state.model = None;
        self.state.result = None;
        self.state.error = None;
        self.state.running = false;
        self.persist();
    }

    /// Set the target column, removing it from the feature set if present.
    pub fn set_target(&mut self, column: Option<String>) {
        self.state.target_column = column;
        if let Some(target) = self.state.target_column.clone() {
            if let Some(features) = self.state.feature_columns.take() {
                self.state.feature_columns =
                    normalize_features(features, Some(target.as_str()));
            }
        }
        self.persist();
    }

    /// Set the feature columns verbatim, except that the current target is
    /// silently filtered out and an empty selection normalizes to `None`
    /// ("all remaining columns").
    pub fn set_features(&mut self, columns: Option<Vec<String>>) {
        self.state.feature_columns = columns
            .and_then(|cols| normalize_features(cols, self.state.target_column.as_deref()));
        self.persist();
    }

    /// Append a preprocessing step. Duplicates are legal; order is kept.
    pub fn add_step(&mut self, step: PreprocessStep) {
        self.state.preprocess.push(step);
        self.persist();
    }

    /// Remove the step at `index`; out-of-range indices are a no-op.
    pub fn remove_step(&mut self, index: usize) {
        if index < self.state.preprocess.len() {
            self.state.preprocess.remove(index);
            self.persist();
        }
    }

    /// Replace the split config, clamping the test fraction into the
    /// supported range. A non-finite fraction falls back to the default.
    pub fn set_split(&mut self, split: SplitConfig) {
        let test_size = if split.test_size.is_finite() {
            split
                .test_size
                .clamp(SplitConfig::MIN_TEST_SIZE, SplitConfig::MAX_TEST_SIZE)
        } else {
            SplitConfig::default().test_size
        };
        self.state.split = SplitConfig { test_size, ..split };
        self.persist();
    }

    pub fn set_model(&mut self, model: Option<ModelKind>) {
        self.state.model = model;
        self.persist();
    }

    pub fn set_drop_rare_classes(&mut self, drop: bool) {
        self.state.drop_rare_classes = drop;
        self.persist();
    }

    /// Restore the initial defaults, clearing everything.
    pub fn reset(&mut self) {
        self.state = SessionState::default();
        self.persist();
    }

    /// Orchestrator hook: enter the running state, clearing any previous
    /// result or error before the request is dispatched.
    pub fn mark_running(&mut self) {
        self.state.running = true;
        self.state.result = None;
        self.state.error = None;
        self.persist();
    }

    /// Orchestrator hook: record a successful run.
    pub fn finish_with_result(&mut self, result: RunOutcome) {
        self.state.result = Some(result);
        self.state.error = None;
        self.state.running = false;
        self.persist();
    }

    /// Orchestrator hook: record a classified failure.
    pub fn finish_with_error(&mut self, error: RunError) {
        self.state.error = Some(error);
        self.state.result = None;
        self.state.running = false;
        self.persist();
    }

    /// Clear a surfaced error without touching the rest of the session.
    pub fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.persist();
        }
    }

    fn persist(&self) {
        let Some(path) = &self.storage else {
            return;
        };
        if let Err(err) = snapshot::save_to_path(&self.state.to_snapshot(), path) {
            tracing::warn!("Failed to persist session snapshot: {err}");
        }
    }
}

fn normalize_features(columns: Vec<String>, target: Option<&str>) -> Option<Vec<String>> {
    let filtered: Vec<String> = columns
        .into_iter()
        .filter(|col| Some(col.as_str()) != target)
        .collect();
    if filtered.is_empty() {
        None
    } else {
        Some(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::PreprocessKind;
    use tempfile::tempdir;

    fn dataset(columns: &[&str]) -> DatasetSummary {
        DatasetSummary {
            dataset_id: "ds-1".to_string(),
            rows: 100,
            columns: columns.len() as u64,
            column_names: columns.iter().map(|c| c.to_string()).collect(),
            dtypes: Default::default(),
            preview: Vec::new(),
        }
    }

    fn invariant_holds(state: &SessionState) -> bool {
        match (&state.target_column, &state.feature_columns) {
            (Some(target), Some(features)) => !features.contains(target),
            _ => true,
        }
    }

    #[test]
    fn upload_defaults_target_to_first_column_and_features_to_rest() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b", "c"]));
        assert_eq!(store.state().target_column.as_deref(), Some("a"));
        assert_eq!(
            store.state().feature_columns,
            Some(vec!["b".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn single_column_dataset_leaves_features_unset() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["only"]));
        assert_eq!(store.state().target_column.as_deref(), Some("only"));
        assert_eq!(store.state().feature_columns, None);
    }

    #[test]
    fn upload_resets_steps_split_model_and_result() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b"]));
        store.add_step(PreprocessStep::all_numeric(PreprocessKind::Standardize));
        store.set_split(SplitConfig {
            test_size: 0.4,
            random_state: None,
        });
        store.set_model(Some(ModelKind::DecisionTree));
        store.finish_with_result(RunOutcome {
            status: "success".to_string(),
            accuracy: Some(0.9),
            confusion_matrix: None,
            feature_importances: None,
            message: None,
            warnings: Vec::new(),
            model_type: None,
            model_id: Some("m-1".to_string()),
            model_download_path: None,
        });

        store.set_dataset(dataset(&["x", "y", "z"]));
        let state = store.state();
        assert!(state.preprocess.is_empty());
        assert_eq!(state.split, SplitConfig::default());
        assert_eq!(state.model, None);
        assert_eq!(state.result, None);
        assert_eq!(state.error, None);
        assert!(!state.running);
    }

    #[test]
    fn changing_target_removes_it_from_features() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b", "c"]));
        store.set_target(Some("b".to_string()));
        assert_eq!(store.state().target_column.as_deref(), Some("b"));
        assert_eq!(store.state().feature_columns, Some(vec!["c".to_string()]));
        assert!(invariant_holds(store.state()));
    }

    #[test]
    fn feature_selection_cannot_include_target() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b", "c"]));
        store.set_features(Some(vec![
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
        ]));
        assert_eq!(
            store.state().feature_columns,
            Some(vec!["b".to_string(), "c".to_string()])
        );
        assert!(invariant_holds(store.state()));
    }

    #[test]
    fn invariant_survives_any_target_feature_sequence() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b", "c", "d"]));
        store.set_features(Some(vec!["b".to_string(), "c".to_string()]));
        store.set_target(Some("c".to_string()));
        assert!(invariant_holds(store.state()));
        store.set_target(Some("b".to_string()));
        assert!(invariant_holds(store.state()));
        store.set_features(Some(vec!["b".to_string(), "d".to_string()]));
        assert!(invariant_holds(store.state()));
        assert_eq!(store.state().feature_columns, Some(vec!["d".to_string()]));
    }

    #[test]
    fn empty_feature_selection_normalizes_to_all_remaining() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b"]));
        store.set_features(Some(Vec::new()));
        assert_eq!(store.state().feature_columns, None);
        // Selecting only the target also collapses to "all remaining".
        store.set_features(Some(vec!["a".to_string()]));
        assert_eq!(store.state().feature_columns, None);
    }

    #[test]
    fn steps_keep_order_and_allow_duplicates() {
        let mut store = PipelineStore::in_memory();
        let standardize = PreprocessStep::all_numeric(PreprocessKind::Standardize);
        let normalize = PreprocessStep::all_numeric(PreprocessKind::Normalize);
        store.add_step(standardize.clone());
        store.add_step(normalize.clone());
        store.add_step(standardize.clone());
        assert_eq!(
            store.state().preprocess,
            vec![standardize.clone(), normalize, standardize]
        );
        store.remove_step(1);
        assert_eq!(store.state().preprocess.len(), 2);
        assert_eq!(store.state().preprocess[1].step, PreprocessKind::Standardize);
        store.remove_step(10); // out of range: no-op
        assert_eq!(store.state().preprocess.len(), 2);
    }

    #[test]
    fn split_is_clamped_into_supported_range() {
        let mut store = PipelineStore::in_memory();
        store.set_split(SplitConfig {
            test_size: 0.05,
            random_state: Some(42),
        });
        assert!((store.state().split.test_size - 0.10).abs() < f64::EPSILON);
        store.set_split(SplitConfig {
            test_size: 0.9,
            random_state: Some(42),
        });
        assert!((store.state().split.test_size - 0.50).abs() < f64::EPSILON);
        store.set_split(SplitConfig {
            test_size: 0.3,
            random_state: Some(7),
        });
        assert!((store.state().split.test_size - 0.3).abs() < f64::EPSILON);
        assert_eq!(store.state().split.random_state, Some(7));
    }

    #[test]
    fn reset_restores_initial_defaults() {
        let mut store = PipelineStore::in_memory();
        store.set_dataset(dataset(&["a", "b"]));
        store.add_step(PreprocessStep::all_numeric(PreprocessKind::Normalize));
        store.set_model(Some(ModelKind::LogisticRegression));
        store.set_drop_rare_classes(true);
        store.set_split(SplitConfig {
            test_size: 0.45,
            random_state: None,
        });

        store.reset();
        let state = store.state();
        assert_eq!(state.dataset, None);
        assert_eq!(state.target_column, None);
        assert_eq!(state.feature_columns, None);
        assert!(state.preprocess.is_empty());
        assert!((state.split.test_size - 0.2).abs() < f64::EPSILON);
        assert_eq!(state.split.random_state, Some(42));
        assert_eq!(state.model, None);
        assert!(!state.drop_rare_classes);
        assert_eq!(state.result, None);
    }

    #[test]
    fn mutations_persist_and_rehydrate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        {
            let mut store = PipelineStore::with_storage_path(path.clone());
            store.set_dataset(dataset(&["a", "b", "c"]));
            store.set_model(Some(ModelKind::DecisionTree));
            store.set_drop_rare_classes(true);
        }
        let restored = PipelineStore::with_storage_path(path);
        let state = restored.state();
        assert_eq!(state.target_column.as_deref(), Some("a"));
        assert_eq!(state.model, Some(ModelKind::DecisionTree));
        assert!(state.drop_rare_classes);
        assert!(!state.running);
        assert_eq!(state.error, None);
    }

    #[test]
    fn running_flag_is_not_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        {
            let mut store = PipelineStore::with_storage_path(path.clone());
            store.set_dataset(dataset(&["a", "b"]));
            store.mark_running();
        }
        let restored = PipelineStore::with_storage_path(path);
        assert!(!restored.state().running);
    }

    #[test]
    fn corrupt_storage_yields_default_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"garbage").unwrap();
        let store = PipelineStore::with_storage_path(path);
        assert_eq!(store.state(), &SessionState::default());
    }
}
