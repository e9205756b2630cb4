//! Scan session: the state machine behind the scan screen.
//!
//! ```text
//!            start_capture            submit_captured
//!   Idle ─────────────────▶ Capturing ───────────────▶ Uploading ──┬─▶ Recognized
//!    ▲                         │                          │  ▲     └─▶ Failed
//!    └──── cancel_capture ─────┘          cancel / reset  │  └── retry ──┘
//!    └────────────────────────────────────────────────────┘
//! ```
//!
//! Any state except `Uploading` may go back to `Capturing` (scan a new card).
//! The session is never terminal; one session serves the scan screen for as
//! long as it is open.
//!
//! # Attempts and stale completions
//!
//! The network call happens outside the session. Starting an upload hands
//! out an [`UploadTicket`] stamped with a fresh [`AttemptId`]; the caller
//! performs the upload and reports back through [`ScanSession::complete`].
//! A completion is applied only if the session is still `Uploading` the same
//! attempt. Results for cancelled or superseded attempts are discarded and
//! never touch the current result or error.
//!
//! # Exactly one outcome
//!
//! The result and error live inside the phase itself, so `Recognized` always
//! carries a record, `Failed` always carries an error, and no other state can
//! hold either.

use crate::collection::CollectionStore;
use crate::recognition::RecognitionError;
use crate::types::{CardRecord, ImageBlob};
use std::fmt;
use thiserror::Error;

/// Observable state of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    Idle,
    Capturing,
    Uploading,
    Recognized,
    Failed,
}

impl ScanState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Uploading => "uploading",
            Self::Recognized => "recognized",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User actions the session can reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    StartCapture,
    CancelCapture,
    SubmitCaptured,
    Retry,
    CancelUpload,
    Confirm,
}

impl fmt::Display for ScanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StartCapture => "start capture",
            Self::CancelCapture => "cancel capture",
            Self::SubmitCaptured => "submit captured image",
            Self::Retry => "retry",
            Self::CancelUpload => "cancel upload",
            Self::Confirm => "add to collection",
        })
    }
}

/// A rejected transition. The session is unchanged whenever one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("an upload is already in progress")]
    UploadInProgress,
    #[error("no captured image to upload")]
    NoPendingImage,
    #[error("no recognized card to add")]
    NotRecognized,
    #[error("card already added to the collection")]
    AlreadyConfirmed,
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: ScanState, action: ScanAction },
}

/// Identifies one upload attempt within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Permission to run one upload, and the bytes to upload.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    attempt: AttemptId,
    image: ImageBlob,
}

impl UploadTicket {
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn image(&self) -> &ImageBlob {
        &self.image
    }
}

/// What [`ScanSession::complete`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result belonged to the current attempt; the session moved to
    /// the contained state.
    Applied(ScanState),
    /// The attempt was cancelled or superseded; the result was dropped.
    Stale,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Capturing,
    Uploading { attempt: AttemptId },
    Recognized { record: CardRecord, confirmed: bool },
    Failed { error: RecognitionError },
}

/// State machine for one scan screen.
#[derive(Debug, Clone)]
pub struct ScanSession {
    phase: Phase,
    pending_image: Option<ImageBlob>,
    next_attempt: u64,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            pending_image: None,
            next_attempt: 1,
        }
    }

    pub fn state(&self) -> ScanState {
        match self.phase {
            Phase::Idle => ScanState::Idle,
            Phase::Capturing => ScanState::Capturing,
            Phase::Uploading { .. } => ScanState::Uploading,
            Phase::Recognized { .. } => ScanState::Recognized,
            Phase::Failed { .. } => ScanState::Failed,
        }
    }

    /// The photo the current (or last) upload used.
    pub fn pending_image(&self) -> Option<&ImageBlob> {
        self.pending_image.as_ref()
    }

    pub fn result(&self) -> Option<&CardRecord> {
        match &self.phase {
            Phase::Recognized { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RecognitionError> {
        match &self.phase {
            Phase::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Attempt currently in flight, if any.
    pub fn in_flight(&self) -> Option<AttemptId> {
        match self.phase {
            Phase::Uploading { attempt } => Some(attempt),
            _ => None,
        }
    }

    /// Whether the recognized card was already added to the collection.
    pub fn is_confirmed(&self) -> bool {
        matches!(self.phase, Phase::Recognized { confirmed: true, .. })
    }

    /// Open the capture source for a new card. Clears any previous photo,
    /// result, or error.
    pub fn start_capture(&mut self) -> Result<(), SessionError> {
        self.ensure_not_uploading()?;
        self.phase = Phase::Capturing;
        self.pending_image = None;
        Ok(())
    }

    /// The capture source was dismissed without a photo.
    pub fn cancel_capture(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Capturing => {
                self.phase = Phase::Idle;
                Ok(())
            }
            _ => Err(self.invalid(ScanAction::CancelCapture)),
        }
    }

    /// A capture produced `image`; start uploading it.
    ///
    /// Accepted from any state except `Uploading`. From `Idle`, `Recognized`,
    /// or `Failed` this acts as an implicit new capture.
    pub fn submit_captured(&mut self, image: ImageBlob) -> Result<UploadTicket, SessionError> {
        self.ensure_not_uploading()?;
        self.pending_image = Some(image.clone());
        Ok(self.begin_upload(image))
    }

    /// Upload the same photo again after a result or failure.
    ///
    /// A photo that could not be encoded fails the same way every time, so
    /// `ImageEncodingFailed` needs a new capture instead.
    pub fn retry(&mut self) -> Result<UploadTicket, SessionError> {
        match self.phase {
            Phase::Uploading { .. } => Err(SessionError::UploadInProgress),
            Phase::Failed { ref error } if !error.is_retryable() => {
                tracing::debug!(kind = error.kind(), "rejected: retry needs a new capture");
                Err(self.invalid(ScanAction::Retry))
            }
            Phase::Recognized { .. } | Phase::Failed { .. } => {
                let image = self
                    .pending_image
                    .clone()
                    .ok_or(SessionError::NoPendingImage)?;
                Ok(self.begin_upload(image))
            }
            Phase::Idle | Phase::Capturing => Err(self.invalid(ScanAction::Retry)),
        }
    }

    /// Abandon the in-flight upload. Its result is discarded when it arrives.
    pub fn cancel_upload(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Uploading { attempt } => {
                tracing::debug!(%attempt, "upload cancelled");
                self.phase = Phase::Idle;
                self.pending_image = None;
                Ok(())
            }
            _ => Err(self.invalid(ScanAction::CancelUpload)),
        }
    }

    /// Return to `Idle` from any state, dropping the photo and any outcome.
    /// An in-flight upload becomes stale.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.pending_image = None;
    }

    /// Report the outcome of the upload described by `ticket`.
    pub fn complete(
        &mut self,
        ticket: &UploadTicket,
        result: Result<CardRecord, RecognitionError>,
    ) -> Completion {
        if self.in_flight() != Some(ticket.attempt) {
            tracing::debug!(
                attempt = %ticket.attempt,
                state = %self.state(),
                "discarding stale recognition result"
            );
            return Completion::Stale;
        }

        self.phase = match result {
            Ok(record) => {
                tracing::info!(
                    attempt = %ticket.attempt,
                    player = record.player_name(),
                    "card recognized"
                );
                Phase::Recognized {
                    record,
                    confirmed: false,
                }
            }
            Err(error) => {
                tracing::info!(
                    attempt = %ticket.attempt,
                    kind = error.kind(),
                    %error,
                    "recognition failed"
                );
                Phase::Failed { error }
            }
        };
        Completion::Applied(self.state())
    }

    /// Add the recognized card to `collection`. Each recognition can be
    /// added once; retrying produces a new recognition that can be added
    /// again.
    pub fn confirm_add_to_collection(
        &mut self,
        collection: &CollectionStore,
    ) -> Result<(), SessionError> {
        match &mut self.phase {
            Phase::Recognized { confirmed: true, .. } => Err(SessionError::AlreadyConfirmed),
            Phase::Recognized { record, confirmed } => {
                collection.append(record.clone());
                *confirmed = true;
                Ok(())
            }
            Phase::Uploading { .. } => Err(SessionError::UploadInProgress),
            _ => Err(SessionError::NotRecognized),
        }
    }

    /// Read-only projection for the presentation layer.
    pub fn view(&self) -> SessionView {
        let state = self.state();
        SessionView {
            state,
            record: self.result().cloned(),
            error: self.error().cloned(),
            image: self.pending_image.clone(),
            can_retry: matches!(state, ScanState::Recognized | ScanState::Failed)
                && self.pending_image.is_some()
                && self.error().is_none_or(RecognitionError::is_retryable),
            can_confirm: matches!(self.phase, Phase::Recognized { confirmed: false, .. }),
        }
    }

    fn begin_upload(&mut self, image: ImageBlob) -> UploadTicket {
        let attempt = AttemptId(self.next_attempt);
        self.next_attempt += 1;
        self.phase = Phase::Uploading { attempt };
        tracing::debug!(%attempt, image = ?image, "upload started");
        UploadTicket { attempt, image }
    }

    fn ensure_not_uploading(&self) -> Result<(), SessionError> {
        if let Phase::Uploading { attempt } = self.phase {
            tracing::debug!(%attempt, "rejected: upload in progress");
            return Err(SessionError::UploadInProgress);
        }
        Ok(())
    }

    fn invalid(&self, action: ScanAction) -> SessionError {
        SessionError::InvalidTransition {
            from: self.state(),
            action,
        }
    }
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub state: ScanState,
    pub record: Option<CardRecord>,
    pub error: Option<RecognitionError>,
    pub image: Option<ImageBlob>,
    pub can_retry: bool,
    pub can_confirm: bool,
}
