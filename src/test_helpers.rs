//! Shared test utilities for the card-scan test suite.
//!
//! - Synthetic photos built in memory (no fixture files).
//! - Record/detail builders.
//! - [`MockRecognizer`]: records every submission and answers from a queue,
//!   optionally holding each answer until the test releases it.

use crate::recognition::{RecognitionError, Recognizer};
use crate::types::{CardDetails, CardRecord, ImageBlob};
use async_trait::async_trait;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::Semaphore;

// =========================================================================
// Synthetic images
// =========================================================================

/// A small valid JPEG with a gradient pattern.
pub fn synthetic_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// A small valid PNG with a translucent alpha channel.
pub fn synthetic_rgba_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 200, 96])
    });
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .unwrap();
    out
}

// =========================================================================
// Builders
// =========================================================================

pub fn details(player: &str, team: &str, set: &str, number: &str) -> CardDetails {
    CardDetails {
        player_name: player.to_string(),
        team_name: team.to_string(),
        set_name: set.to_string(),
        card_number: number.to_string(),
    }
}

/// A record for `player` with placeholder team/set/number.
pub fn record(player: &str, image: &[u8]) -> CardRecord {
    CardRecord::new(
        details(player, "Test Team", "Test Set", "1"),
        ImageBlob::from(image),
    )
}

// =========================================================================
// Mock recognizer
// =========================================================================

/// Recognizer that records submissions and pops queued answers.
///
/// When gated, each call waits for a permit from [`release`](Self::release)
/// before answering. Answers are dequeued at call time, so the n-th call
/// gets the n-th queued answer regardless of release order.
#[derive(Default)]
pub struct MockRecognizer {
    results: Mutex<VecDeque<Result<CardDetails, RecognitionError>>>,
    submitted: Mutex<Vec<ImageBlob>>,
    gate: Option<Semaphore>,
}

impl MockRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<Result<CardDetails, RecognitionError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn gated(results: Vec<Result<CardDetails, RecognitionError>>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::with_results(results)
        }
    }

    /// Let `n` waiting calls answer, in call order.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn submitted(&self) -> Vec<ImageBlob> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    async fn submit(&self, image: &ImageBlob) -> Result<CardRecord, RecognitionError> {
        self.submitted.lock().unwrap().push(image.clone());
        let result = self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RecognitionError::network("no mock result queued")));

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        result.map(|details| CardRecord::new(details, image.clone()))
    }
}
