//! Value types describing one training attempt and its outcome.
//!
//! All wire-facing types serialize with snake_case tags matching the
//! training service's JSON contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the dataset preview, keyed by column name.
pub type Record = serde_json::Map<String, Value>;

/// Summary of an uploaded dataset as returned by the service.
///
/// Immutable once received; a new upload replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataset_id: String,
    pub rows: u64,
    pub columns: u64,
    /// Column names in dataset order.
    pub column_names: Vec<String>,
    /// Declared dtype per column, as reported by the service.
    #[serde(default)]
    pub dtypes: BTreeMap<String, String>,
    /// Bounded preview of the first rows.
    #[serde(default)]
    pub preview: Vec<Record>,
}

/// The two supported column scaling operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreprocessKind {
    Standardize,
    Normalize,
}

impl PreprocessKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Standardize => "Standardize (z-score)",
            Self::Normalize => "Normalize (min-max)",
        }
    }
}

/// One ordered preprocessing step.
///
/// `columns: None` means "apply to all numeric columns". Duplicate steps are
/// legal; order is significant and preserved as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprocessStep {
    pub step: PreprocessKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
}

impl PreprocessStep {
    pub fn all_numeric(kind: PreprocessKind) -> Self {
        Self {
            step: kind,
            columns: None,
        }
    }
}

/// Train/test split configuration. Train fraction is always `1 - test_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub test_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub random_state: Option<u32>,
}

impl SplitConfig {
    /// Smallest selectable test fraction.
    pub const MIN_TEST_SIZE: f64 = 0.10;
    /// Largest selectable test fraction.
    pub const MAX_TEST_SIZE: f64 = 0.50;

    /// Test fraction as a whole percentage for display.
    pub fn test_percent(&self) -> u32 {
        (self.test_size * 100.0).round() as u32
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: Some(42),
        }
    }
}

/// The supported model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    LogisticRegression,
    DecisionTree,
}

impl ModelKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::LogisticRegression => "Logistic regression",
            Self::DecisionTree => "Decision tree",
        }
    }
}

/// Confusion matrix over the target labels (square count matrix).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<Value>,
    pub matrix: Vec<Vec<u64>>,
}

/// A single feature's importance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub name: String,
    pub importance: f64,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub status: String,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub confusion_matrix: Option<ConfusionMatrix>,
    #[serde(default)]
    pub feature_importances: Option<Vec<FeatureImportance>>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub model_type: Option<ModelKind>,
    /// Opaque trained-model reference used for ad-hoc predictions.
    #[serde(default)]
    pub model_id: Option<String>,
    /// Downloadable artifact location, relative to the service origin.
    #[serde(default)]
    pub model_download_path: Option<String>,
}

/// Immutable request snapshot submitted to the training service.
///
/// Built once when a run starts; further store mutations do not affect an
/// in-flight request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRequest {
    pub dataset_id: String,
    pub target_column: String,
    /// `None` means "all columns except the target".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_columns: Option<Vec<String>>,
    pub preprocess: Vec<PreprocessStep>,
    pub split: SplitConfig,
    pub model: ModelKind,
    pub drop_rare_classes: bool,
}

/// Ad-hoc prediction request against a trained model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictRequest {
    pub model_id: String,
    pub records: Vec<Record>,
}

/// Predictions aligned with the input record order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictResponse {
    pub predictions: Vec<Value>,
}
