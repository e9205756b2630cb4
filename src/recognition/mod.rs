//! Card recognition: turning a photo into card metadata.
//!
//! The actual inference runs on a remote server; this module owns the
//! contract with it:
//!
//! - **Client**: [`RecognitionClient`]: JPEG encode, multipart upload, timeout
//! - **Response**: JSON → [`CardDetails`](crate::types::CardDetails) with placeholders
//! - **Error**: [`RecognitionError`]: the three failure kinds the UI distinguishes
//!
//! The scan session only sees the [`Recognizer`] trait, so tests drive it
//! with an in-memory recognizer instead of a server.

pub mod client;
pub mod error;
pub mod response;

pub use client::{ClientBuildError, RecognitionClient};
pub use error::RecognitionError;

use crate::types::{CardRecord, ImageBlob};
use async_trait::async_trait;

/// Anything that can turn a captured photo into a card record.
///
/// Implementations must not retry internally and must either return a
/// record with all four fields populated or an error.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn submit(&self, image: &ImageBlob) -> Result<CardRecord, RecognitionError>;
}
