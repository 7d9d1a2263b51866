//! Durable session snapshot, written after every store mutation.
//!
//! The snapshot is an explicit field whitelist: transient state (the running
//! flag, surfaced errors) is never persisted. Corrupt or missing data
//! degrades to the default session, never to an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{DatasetSummary, ModelKind, PreprocessStep, RunOutcome, SplitConfig};
use crate::app_dirs;

/// Default filename used to store the session snapshot.
pub const SNAPSHOT_FILE_NAME: &str = "session.json";

/// Persistable subset of the session: the pipeline config and last result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub dataset: Option<DatasetSummary>,
    #[serde(default)]
    pub target_column: Option<String>,
    #[serde(default)]
    pub feature_columns: Option<Vec<String>>,
    #[serde(default)]
    pub preprocess: Vec<PreprocessStep>,
    #[serde(default)]
    pub split: Option<SplitConfig>,
    #[serde(default)]
    pub model: Option<ModelKind>,
    #[serde(default)]
    pub drop_rare_classes: bool,
    #[serde(default)]
    pub result: Option<RunOutcome>,
}

/// Errors that may occur while writing the snapshot.
///
/// Reads never fail; see [`load_from_path`].
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("No suitable snapshot directory found")]
    NoSnapshotDir,
    #[error("Unable to create snapshot directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize session snapshot: {0}")]
    Serialize(serde_json::Error),
}

/// Resolve the snapshot file path inside the app directory.
pub fn snapshot_path() -> Result<PathBuf, SnapshotError> {
    let dir = app_dirs::app_root_dir().map_err(|error| match error {
        app_dirs::AppDirError::NoBaseDir => SnapshotError::NoSnapshotDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            SnapshotError::CreateDir { path, source }
        }
    })?;
    Ok(dir.join(SNAPSHOT_FILE_NAME))
}

/// Load a snapshot, returning the default session on absent or corrupt data.
pub fn load_from_path(path: &Path) -> SessionSnapshot {
    let Ok(bytes) = std::fs::read(path) else {
        return SessionSnapshot::default();
    };
    match serde_json::from_slice(&bytes) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!(
                "Ignoring corrupt session snapshot at {}: {err}",
                path.display()
            );
            SessionSnapshot::default()
        }
    }
}

/// Persist a snapshot, creating parent directories as needed.
pub fn save_to_path(snapshot: &SessionSnapshot, path: &Path) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SnapshotError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = serde_json::to_vec_pretty(snapshot).map_err(SnapshotError::Serialize)?;
    std::fs::write(path, data).map_err(|source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    })
}
