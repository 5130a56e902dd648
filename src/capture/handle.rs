//! Owned in-flight capture handles
//!
//! A capture request is split into two halves. [`CaptureCompletion`] moves
//! into the camera framework's completion callback and keeps the processor
//! alive until the callback fires; [`PendingCapture`] stays with the caller's
//! task and resolves to the result.

use super::processor::PhotoProcessor;
use super::CapturedPhoto;
use crate::errors::CaptureError;
use crate::types::PhotoCaptureResult;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;

type CaptureOutcome = Result<PhotoCaptureResult, CaptureError>;

pub(crate) fn channel(processor: Arc<PhotoProcessor>) -> (CaptureCompletion, PendingCapture) {
    let (sender, receiver) = oneshot::channel();
    let id = Uuid::new_v4();
    let requested_at = Utc::now();

    log::debug!("Capture {} requested", id);

    (
        CaptureCompletion {
            id,
            requested_at,
            processor,
            sender,
        },
        PendingCapture {
            id,
            requested_at,
            receiver,
        },
    )
}

/// Framework-facing half of an in-flight capture
#[derive(Debug)]
pub struct CaptureCompletion {
    id: Uuid,
    requested_at: DateTime<Utc>,
    processor: Arc<PhotoProcessor>,
    sender: oneshot::Sender<CaptureOutcome>,
}

impl CaptureCompletion {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Process the finished photo and deliver the outcome
    pub fn complete<P: CapturedPhoto + ?Sized>(self, photo: &P) {
        let outcome = self.processor.process(photo);
        if let Err(e) = &outcome {
            log::error!("Capture {} failed during processing: {}", self.id, e);
        }
        self.deliver(outcome);
    }

    /// Report a framework-side failure
    pub fn fail(self, error: CaptureError) {
        log::error!("Capture {} failed: {}", self.id, error);
        self.deliver(Err(error));
    }

    fn deliver(self, outcome: CaptureOutcome) {
        let elapsed = Utc::now() - self.requested_at;
        log::debug!(
            "Capture {} finished after {} ms",
            self.id,
            elapsed.num_milliseconds()
        );

        if self.sender.send(outcome).is_err() {
            log::warn!("Capture {} finished but nobody is waiting for it", self.id);
        }
    }
}

/// Caller-facing half of an in-flight capture
#[derive(Debug)]
pub struct PendingCapture {
    id: Uuid,
    requested_at: DateTime<Utc>,
    receiver: oneshot::Receiver<CaptureOutcome>,
}

impl PendingCapture {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// Wait for the framework callback.
    ///
    /// Resolves to [`CaptureError::Cancelled`] if the completion half is
    /// dropped without reporting.
    pub async fn wait(self) -> CaptureOutcome {
        match self.receiver.await {
            Ok(outcome) => outcome,
            Err(_) => {
                log::warn!("Capture {} was dropped before completing", self.id);
                Err(CaptureError::Cancelled)
            }
        }
    }
}
