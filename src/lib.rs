//! # Card Scan
//!
//! Scan trading cards into a personal collection. A card photo comes from a
//! camera shot or a document scan, is uploaded to a recognition server, and
//! comes back as player, team, set, and card number. Confirmed cards are
//! kept in an in-memory collection shown as a grid or one card per page.
//!
//! # Architecture: One Scan Attempt
//!
//! ```text
//! capture      CaptureSource      →  ImageBlob          (camera or document scan)
//! session      ScanSession        →  UploadTicket       (Uploading, attempt #n)
//! recognition  RecognitionClient  →  CardRecord | err   (JPEG + multipart POST)
//! session      complete(ticket)   →  Recognized | Failed | stale (dropped)
//! collection   confirm            →  CollectionStore    (append-only)
//! ```
//!
//! The session is a plain synchronous state machine; the only await is the
//! recognizer call, run by [`scanner::ScanDriver`] without holding the
//! session lock. That split keeps every transition unit-testable with no
//! runtime, and lets a cancel or a new scan land while an upload is in
//! flight.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`capture`] | Capture sources (single photo, multi-page document scan) and path discovery |
//! | [`session`] | Scan state machine: transitions, attempt ids, stale-result handling |
//! | [`scanner`] | Async driver tying a session to a recognizer and the collection |
//! | [`recognition`] | HTTP client for the recognition endpoint, response parsing, error taxonomy |
//! | [`imaging`] | Decode, optional downscale, JPEG encode before upload |
//! | [`collection`] | Shared, append-only, in-memory card collection |
//! | [`config`] | `config.toml` loading, stock defaults, validation |
//! | [`output`] | CLI formatting for scan attempts and the collection views |
//! | [`types`] | Shared value types: [`types::ImageBlob`], [`types::CardRecord`] |
//!
//! # Design Decisions
//!
//! ## Latest Attempt Wins
//!
//! Every upload is stamped with an attempt id. A result is applied only if
//! the session is still uploading that same attempt; anything else (the user
//! cancelled, reset, or scanned another card) drops the result silently.
//! A slow server can never overwrite a newer scan.
//!
//! ## Placeholders Over Failures
//!
//! A server reply that is a JSON object but lacks some fields still yields a
//! card: missing fields read `Unknown Player`, `Unknown Team`, `Unknown Set`,
//! `Unknown Number`. Only a reply that is not a JSON object at all is an
//! error, and it is reported distinctly so the user can report it instead
//! of retrying.
//!
//! ## No Automatic Retry
//!
//! Neither the client nor the session retries. Retry is a user action and
//! re-sends the exact bytes of the previous attempt.

pub mod capture;
pub mod collection;
pub mod config;
pub mod imaging;
pub mod output;
pub mod recognition;
pub mod scanner;
pub mod session;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
