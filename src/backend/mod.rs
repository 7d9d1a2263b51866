//! Boundary to the remote training service.
//!
//! The orchestrator and the prediction client talk to the service through
//! the [`TrainingBackend`] trait so tests can substitute counting stubs;
//! [`api::HttpBackend`] is the real ureq-based client.

pub mod api;

pub use api::HttpBackend;

use crate::pipeline::types::{PredictRequest, PredictResponse, RunOutcome, RunRequest};

/// A failure reported at the service boundary, before any domain
/// classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with an application-level failure.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request failed"))]
    Api { status: u16, detail: Option<String> },
    /// The request never completed (DNS, connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Transport(String),
    /// The service answered but the payload was not understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ServiceError {
    /// The human-readable detail the service supplied, when it supplied one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Api { detail, .. } => detail.as_deref(),
            Self::Transport(_) | Self::InvalidResponse(_) => None,
        }
    }
}

/// The operations the pipeline core needs from the training service.
pub trait TrainingBackend: Send + Sync {
    /// Train a model from the request snapshot.
    fn run_pipeline(&self, request: &RunRequest) -> Result<RunOutcome, ServiceError>;
    /// Send ad-hoc records to a trained model.
    fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, ServiceError>;
}
