//! Service endpoint settings persisted as `settings.toml` in the app dir.
//!
//! Missing or corrupt settings degrade to defaults so the app can always
//! start; environment variables override the file for ad-hoc setups.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Default filename used to store the service settings.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
const DEFAULT_API_KEY: &str = "default-insecure-key";

/// Connection settings for the remote training service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the training service API, including the `/api` prefix.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Value sent in the `X-API-Key` header on every request.
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key: default_api_key(),
        }
    }
}

/// Errors that may occur while saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("No suitable settings directory found")]
    NoSettingsDir,
    #[error("Unable to create settings directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize settings to TOML at {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Resolve the settings file path inside the app directory.
pub fn settings_path() -> Result<PathBuf, SettingsError> {
    let dir = app_dirs::app_root_dir().map_err(map_app_dir_error)?;
    Ok(dir.join(SETTINGS_FILE_NAME))
}

/// Load settings from disk, falling back to defaults on missing or corrupt
/// data, then apply environment overrides.
pub fn load_or_default() -> Settings {
    let from_disk = settings_path()
        .ok()
        .map(|path| load_from_path(&path))
        .unwrap_or_default();
    apply_env_overrides(from_disk)
}

fn load_from_path(path: &Path) -> Settings {
    let Ok(text) = std::fs::read_to_string(path) else {
        return Settings::default();
    };
    match toml::from_str(&text) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Ignoring corrupt settings at {}: {err}", path.display());
            Settings::default()
        }
    }
}

fn apply_env_overrides(mut settings: Settings) -> Settings {
    if let Ok(base) = std::env::var("PIPEWRIGHT_API_BASE") {
        if !base.trim().is_empty() {
            settings.api_base = base;
        }
    }
    if let Ok(key) = std::env::var("PIPEWRIGHT_API_KEY") {
        if !key.trim().is_empty() {
            settings.api_key = key;
        }
    }
    settings
}

/// Persist settings to disk, overwriting any previous contents.
pub fn save(settings: &Settings) -> Result<(), SettingsError> {
    let path = settings_path()?;
    save_to_path(settings, &path)
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &Settings, path: &Path) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| SettingsError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_key() -> String {
    DEFAULT_API_KEY.to_string()
}

fn map_app_dir_error(error: app_dirs::AppDirError) -> SettingsError {
    match error {
        app_dirs::AppDirError::NoBaseDir => SettingsError::NoSettingsDir,
        app_dirs::AppDirError::CreateDir { path, source } => {
            SettingsError::CreateDir { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn settings_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = Settings {
            api_base: "http://ml.example.test/api".to_string(),
            api_key: "secret".to_string(),
        };
        save_to_path(&settings, &path).unwrap();
        let loaded = load_from_path(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "api_base = [not toml").unwrap();
        let loaded = load_from_path(&path);
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let loaded = load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(loaded.api_base, DEFAULT_API_BASE);
        assert_eq!(loaded.api_key, DEFAULT_API_KEY);
    }
}
