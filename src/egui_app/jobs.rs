//! Background job plumbing for the UI.
//!
//! Network work runs on short-lived worker threads that report back over an
//! mpsc channel polled once per frame. The session store is only ever
//! touched on the UI thread.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};

use crate::backend::ServiceError;
use crate::backend::api::UploadError;
use crate::pipeline::types::{DatasetSummary, PredictResponse, RunOutcome};

/// Messages sent back from worker threads.
pub(crate) enum JobMessage {
    DatasetUploaded(Result<DatasetSummary, UploadError>),
    RunFinished(Result<RunOutcome, ServiceError>),
    Predicted(Result<PredictResponse, ServiceError>),
}

/// Channel endpoints plus pending flags for jobs the store does not track.
pub(crate) struct JobRuntime {
    sender: Sender<JobMessage>,
    receiver: Receiver<JobMessage>,
    pub upload_pending: bool,
    pub predict_pending: bool,
}

impl JobRuntime {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            sender,
            receiver,
            upload_pending: false,
            predict_pending: false,
        }
    }

    /// Sender handle for a newly spawned worker.
    pub fn sender(&self) -> Sender<JobMessage> {
        self.sender.clone()
    }

    pub fn try_recv(&self) -> Result<JobMessage, TryRecvError> {
        self.receiver.try_recv()
    }

    /// True while any worker may still report back.
    pub fn any_pending(&self) -> bool {
        self.upload_pending || self.predict_pending
    }
}
