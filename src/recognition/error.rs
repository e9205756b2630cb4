//! Failure taxonomy for a recognition attempt.

use thiserror::Error;

/// Why a photo did not produce a [`CardRecord`](crate::types::CardRecord).
///
/// `Display` renders the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// The photo could not be turned into an upload. Local; retrying the same
    /// bytes fails the same way, so the user needs a new capture.
    #[error("Failed to process image")]
    ImageEncodingFailed,
    /// Transport-level failure: connect, timeout, or an error status whose
    /// body is not a JSON object.
    #[error("Network error: {detail}")]
    NetworkFailure { detail: String },
    /// The server answered, but not with a JSON object of card fields.
    #[error("Invalid response format")]
    InvalidResponseFormat,
}

impl RecognitionError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::NetworkFailure {
            detail: detail.into(),
        }
    }

    /// Whether re-sending the same photo could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::ImageEncodingFailed)
    }

    /// Short machine-readable label, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ImageEncodingFailed => "image_encoding_failed",
            Self::NetworkFailure { .. } => "network_failure",
            Self::InvalidResponseFormat => "invalid_response_format",
        }
    }
}

impl From<reqwest::Error> for RecognitionError {
    fn from(err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("could not connect: {err}")
        } else {
            err.to_string()
        };
        Self::NetworkFailure { detail }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_user_messages() {
        assert_eq!(
            RecognitionError::ImageEncodingFailed.to_string(),
            "Failed to process image"
        );
        assert_eq!(
            RecognitionError::network("connection refused").to_string(),
            "Network error: connection refused"
        );
        assert_eq!(
            RecognitionError::InvalidResponseFormat.to_string(),
            "Invalid response format"
        );
    }

    #[test]
    fn only_encoding_failure_is_not_retryable() {
        assert!(!RecognitionError::ImageEncodingFailed.is_retryable());
        assert!(RecognitionError::network("x").is_retryable());
        assert!(RecognitionError::InvalidResponseFormat.is_retryable());
    }
}
