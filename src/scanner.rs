//! Async driver for a scan session.
//!
//! [`ScanDriver`] owns the session behind a mutex and performs the one
//! suspension point of the workflow: the recognizer call. The lock is never
//! held across that await, so the presentation layer can read
//! [`view`](ScanDriver::view) or [`cancel`](ScanDriver::cancel) while an
//! upload is in flight. The session's attempt check decides whether the
//! result is applied when it finally arrives.
//!
//! The driver is a cheap `Clone` handle; clones share the same session,
//! recognizer, and collection.

use crate::capture::{CaptureOutcome, CaptureSource};
use crate::collection::CollectionStore;
use crate::recognition::Recognizer;
use crate::session::{Completion, ScanSession, ScanState, SessionError, SessionView, UploadTicket};
use crate::types::ImageBlob;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone)]
pub struct ScanDriver {
    session: Arc<Mutex<ScanSession>>,
    recognizer: Arc<dyn Recognizer>,
    collection: CollectionStore,
}

impl ScanDriver {
    pub fn new(recognizer: Arc<dyn Recognizer>, collection: CollectionStore) -> Self {
        Self {
            session: Arc::new(Mutex::new(ScanSession::new())),
            recognizer,
            collection,
        }
    }

    pub fn collection(&self) -> &CollectionStore {
        &self.collection
    }

    pub fn state(&self) -> ScanState {
        self.with_session(|s| s.state())
    }

    pub fn view(&self) -> SessionView {
        self.with_session(|s| s.view())
    }

    pub fn start_capture(&self) -> Result<(), SessionError> {
        self.with_session(|s| s.start_capture())
    }

    /// Present `source` and upload whatever it captures.
    ///
    /// The capture runs on the blocking pool. A cancelled capture, or a
    /// source that fails to produce a photo, leaves the session `Idle`.
    pub async fn capture_and_submit(
        &self,
        source: Arc<dyn CaptureSource>,
    ) -> Result<ScanState, SessionError> {
        self.start_capture()?;
        let name = source.name();
        let captured = tokio::task::spawn_blocking(move || source.capture())
            .await
            .map_err(|e| e.to_string())
            .and_then(|result| result.map_err(|e| e.to_string()));

        match captured {
            Ok(CaptureOutcome::Captured(image)) => self.submit_captured(image).await,
            Ok(CaptureOutcome::Cancelled) => {
                tracing::debug!(source = name, "capture cancelled");
                self.with_session(|s| s.cancel_capture())?;
                Ok(ScanState::Idle)
            }
            Err(error) => {
                tracing::warn!(source = name, %error, "capture failed");
                self.with_session(|s| s.cancel_capture())?;
                Ok(ScanState::Idle)
            }
        }
    }

    /// Upload a captured photo and wait for the outcome.
    ///
    /// Returns the session state after the upload resolves. If the attempt
    /// was cancelled or superseded meanwhile, that is whatever state the
    /// session is in now.
    pub async fn submit_captured(&self, image: ImageBlob) -> Result<ScanState, SessionError> {
        let ticket = self.with_session(|s| s.submit_captured(image))?;
        Ok(self.run(ticket).await)
    }

    /// Upload the same photo again.
    pub async fn retry(&self) -> Result<ScanState, SessionError> {
        let ticket = self.with_session(|s| s.retry())?;
        Ok(self.run(ticket).await)
    }

    /// Abandon the in-flight upload; its result will be discarded.
    pub fn cancel(&self) -> Result<(), SessionError> {
        self.with_session(|s| s.cancel_upload())
    }

    /// Drop the current photo and outcome (user left the scan screen).
    pub fn reset(&self) {
        self.with_session(|s| s.reset())
    }

    /// Add the recognized card to the collection; returns the new count.
    pub fn confirm_add_to_collection(&self) -> Result<usize, SessionError> {
        self.with_session(|s| s.confirm_add_to_collection(&self.collection))?;
        Ok(self.collection.count())
    }

    async fn run(&self, ticket: UploadTicket) -> ScanState {
        let result = self.recognizer.submit(ticket.image()).await;
        self.with_session(|s| match s.complete(&ticket, result) {
            Completion::Applied(state) => state,
            Completion::Stale => s.state(),
        })
    }

    fn with_session<R>(&self, f: impl FnOnce(&mut ScanSession) -> R) -> R {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}
