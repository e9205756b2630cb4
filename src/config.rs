//! Scanner configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [endpoint]
//! url = "http://127.0.0.1:5000/process_scan"  # Recognition endpoint (multipart POST)
//! timeout_secs = 30                           # Whole-request timeout
//!
//! [upload]
//! jpeg_quality = 80         # JPEG quality for the uploaded photo (1-100)
//! # max_edge = 2048         # Downscale longer edge before upload (omit = full size)
//!
//! [collection]
//! grid_columns = 3          # Cards per row in the grid view
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Scanner configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Where photos are sent for recognition.
    pub endpoint: EndpointConfig,
    /// How photos are encoded before upload.
    pub upload: UploadConfig,
    /// Collection display settings.
    pub collection: CollectionConfig,
}

impl ScannerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint.url).map_err(|e| {
            ConfigError::Validation(format!("endpoint.url is not a valid URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "endpoint.url must use http or https".into(),
            ));
        }
        if self.endpoint.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "endpoint.timeout_secs must be non-zero".into(),
            ));
        }
        if self.upload.jpeg_quality == 0 || self.upload.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "upload.jpeg_quality must be 1-100".into(),
            ));
        }
        if self.upload.max_edge == Some(0) {
            return Err(ConfigError::Validation(
                "upload.max_edge must be non-zero when set".into(),
            ));
        }
        if self.collection.grid_columns == 0 {
            return Err(ConfigError::Validation(
                "collection.grid_columns must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Recognition endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    /// Full URL of the multipart upload route.
    pub url: String,
    /// Request timeout in seconds, covering connect, upload, and response.
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:5000/process_scan".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Photo encoding settings applied before upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
    /// Longer-edge pixel limit. `None` uploads at capture resolution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_edge: Option<u32>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 80,
            max_edge: None,
        }
    }
}

/// Collection display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// Cards per row in the grid view.
    pub grid_columns: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { grid_columns: 3 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ScannerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ScannerConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ScannerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when it
/// does not exist.
pub fn load_config(path: &Path) -> Result<ScannerConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Card Scan Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Recognition endpoint
# ---------------------------------------------------------------------------
[endpoint]
# Route that accepts a multipart POST with one `image` part (image/jpeg)
# and answers with a JSON object of card fields.
url = "http://127.0.0.1:5000/process_scan"

# Seconds before an upload is abandoned and reported as a network error.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Upload encoding
# ---------------------------------------------------------------------------
[upload]
# JPEG quality for the uploaded photo (1-100).
jpeg_quality = 80

# Downscale so the longer edge is at most this many pixels.
# Omit to upload at capture resolution.
# max_edge = 2048

# ---------------------------------------------------------------------------
# Collection display
# ---------------------------------------------------------------------------
[collection]
# Cards per row in the grid view.
grid_columns = 3
"##
}
