//! Parameter types for upload encoding.
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 80). Clamped on construction.
//! - [`EncodeParams`]: Everything the encoder needs: quality and optional size cap.

use crate::config::UploadConfig;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// The value as the JPEG encoder takes it; lossless since it is at most 100.
    pub(crate) fn as_u8(self) -> u8 {
        self.0 as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

/// Parameters for encoding a captured photo into the upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams {
    pub quality: Quality,
    /// Longer-edge limit; `None` keeps capture resolution.
    pub max_edge: Option<u32>,
}

impl EncodeParams {
    pub fn from_upload_config(config: &UploadConfig) -> Self {
        Self {
            quality: Quality::new(config.jpeg_quality),
            max_edge: config.max_edge,
        }
    }
}
