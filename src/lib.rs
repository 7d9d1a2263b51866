//! Library exports for reuse in tests.
/// Per-user application directories.
pub mod app_dirs;
/// HTTP client for the training service.
pub mod backend;
/// Shared egui UI modules.
pub mod egui_app;
mod http_client;
/// Tracing setup with per-launch log files.
pub mod logging;
/// Pipeline session state, orchestration and persistence.
pub mod pipeline;
/// User-editable application settings.
pub mod settings;
