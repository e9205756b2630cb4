//! HTTP client for the card recognition endpoint.
//!
//! One call to [`RecognitionClient::submit`] is one upload: the photo is
//! re-encoded as JPEG, posted as a single multipart part named `image`, and
//! the JSON answer is parsed into a [`CardRecord`]. The client never retries;
//! retry is an explicit user action handled by the scan session.

use super::error::RecognitionError;
use super::response::parse_card_response;
use super::Recognizer;
use crate::config::ScannerConfig;
use crate::imaging::{EncodeParams, encode_jpeg};
use crate::types::{CardRecord, ImageBlob};
use async_trait::async_trait;
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Multipart part name the endpoint reads the photo from.
pub const IMAGE_PART_NAME: &str = "image";
/// File name sent with the photo part.
pub const IMAGE_FILE_NAME: &str = "scan.jpg";
const IMAGE_MIME: &str = "image/jpeg";

/// Recognition endpoint client.
pub struct RecognitionClient {
    http: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
    encode: EncodeParams,
}

impl RecognitionClient {
    /// Create a client for `endpoint` with a custom timeout.
    pub fn with_timeout(
        endpoint: Url,
        timeout: Duration,
        encode: EncodeParams,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            timeout,
            encode,
        })
    }

    /// Create a client from validated scanner config.
    pub fn from_config(config: &ScannerConfig) -> Result<Self, ClientBuildError> {
        let endpoint = Url::parse(&config.endpoint.url)
            .map_err(|e| ClientBuildError::InvalidEndpoint(e.to_string()))?;
        Ok(Self::with_timeout(
            endpoint,
            config.endpoint.timeout(),
            EncodeParams::from_upload_config(&config.upload),
        )?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check whether the recognition server answers at its origin.
    ///
    /// The server exposes a plain-text liveness route at `/`. Any transport
    /// error counts as unhealthy.
    pub async fn health_check(&self) -> bool {
        let Ok(url) = self.endpoint.join("/") else {
            return false;
        };
        match self.http.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "health check failed");
                false
            }
        }
    }

    /// Encode on the blocking pool; large captures take long enough to stall
    /// the runtime otherwise.
    async fn encode_upload(&self, image: &ImageBlob) -> Result<Vec<u8>, RecognitionError> {
        if image.is_empty() {
            return Err(RecognitionError::ImageEncodingFailed);
        }
        let image = image.clone();
        let params = self.encode;
        let encoded = tokio::task::spawn_blocking(move || encode_jpeg(image.as_bytes(), &params))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "encode task did not complete");
                RecognitionError::ImageEncodingFailed
            })?;
        encoded.map_err(|e| {
            tracing::warn!(error = %e, "could not encode card photo");
            RecognitionError::ImageEncodingFailed
        })
    }
}

#[async_trait]
impl Recognizer for RecognitionClient {
    async fn submit(&self, image: &ImageBlob) -> Result<CardRecord, RecognitionError> {
        let jpeg = self.encode_upload(image).await?;
        tracing::debug!(
            endpoint = %self.endpoint,
            image = %image.fingerprint(),
            upload_bytes = jpeg.len(),
            "uploading card photo"
        );

        let part = Part::bytes(jpeg)
            .file_name(IMAGE_FILE_NAME)
            .mime_str(IMAGE_MIME)?;
        let form = Form::new().part(IMAGE_PART_NAME, part);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await?;

        // Error statuses with a JSON object body ("no match") still parse
        let status = resp.status();
        let body = resp.bytes().await?;
        match parse_card_response(&body) {
            Ok(details) => {
                if !status.is_success() {
                    tracing::debug!(%status, "card fields read from error response");
                }
                Ok(CardRecord::new(details, image.clone()))
            }
            Err(_) if !status.is_success() => {
                Err(RecognitionError::network(format!("HTTP {status}")))
            }
            Err(e) => {
                tracing::warn!(body_bytes = body.len(), "response is not a JSON object");
                Err(e)
            }
        }
    }
}

/// Errors building a client from config.
#[derive(thiserror::Error, Debug)]
pub enum ClientBuildError {
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}
