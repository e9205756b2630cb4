//! Capture sources: where card photos come from.
//!
//! A capture source produces one photo or reports that the user backed out.
//! Two sources exist and the rest of the crate never branches on which one
//! was used:
//!
//! - [`PhotoCapture`]: a single camera shot (here: one image file).
//! - [`DocumentScan`]: a multi-page document scan. Only the first page is
//!   used; later pages are discarded. A scan with no pages counts as
//!   cancelled.
//!
//! [`find_card_images`] expands command-line paths (files or directories)
//! into the photos to scan, in the same spirit as the scanner's photo roll.

use crate::imaging::is_supported_image;
use crate::types::ImageBlob;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Result of presenting a capture source to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(ImageBlob),
    Cancelled,
}

/// Anything that can produce a single card photo.
pub trait CaptureSource: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn capture(&self) -> Result<CaptureOutcome, CaptureError>;
}

/// Single-shot capture from one image file.
#[derive(Debug, Clone)]
pub struct PhotoCapture {
    path: PathBuf,
}

impl PhotoCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CaptureSource for PhotoCapture {
    fn name(&self) -> &'static str {
        "camera"
    }

    fn capture(&self) -> Result<CaptureOutcome, CaptureError> {
        read_image(&self.path).map(CaptureOutcome::Captured)
    }
}

/// Multi-page document scan; the first page is the card photo.
#[derive(Debug, Clone, Default)]
pub struct DocumentScan {
    pages: Vec<PathBuf>,
}

impl DocumentScan {
    pub fn new(pages: Vec<PathBuf>) -> Self {
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl CaptureSource for DocumentScan {
    fn name(&self) -> &'static str {
        "document scanner"
    }

    fn capture(&self) -> Result<CaptureOutcome, CaptureError> {
        let Some(first) = self.pages.first() else {
            return Ok(CaptureOutcome::Cancelled);
        };
        if self.pages.len() > 1 {
            tracing::debug!(
                discarded = self.pages.len() - 1,
                "using first scanned page only"
            );
        }
        read_image(first).map(CaptureOutcome::Captured)
    }
}

fn read_image(path: &Path) -> Result<ImageBlob, CaptureError> {
    std::fs::read(path)
        .map(ImageBlob::from)
        .map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Expand paths into the card photos to scan.
///
/// Files are taken as given, whatever their extension. Directories are
/// walked recursively for supported image files, sorted by path. Hidden
/// entries (dot-files) inside directories are skipped.
pub fn find_card_images(paths: &[PathBuf]) -> Result<Vec<PathBuf>, CaptureError> {
    let mut found = Vec::new();
    for path in paths {
        if !path.is_dir() {
            found.push(path.clone());
            continue;
        }
        let mut in_dir = Vec::new();
        let walker = WalkDir::new(path)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && is_supported_image(entry.path()) {
                in_dir.push(entry.into_path());
            }
        }
        in_dir.sort();
        found.extend(in_dir);
    }
    Ok(found)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}
